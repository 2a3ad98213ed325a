// Serializes round output once per frame for the drawing collaborator.

use crate::interface_adapters::protocol::{FrameDto, RoundStateDto, ServerMessage};
use crate::use_cases::{Frame, RoundState};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, watch};
use tracing::{error, warn};

/// Encodes a message as one JSON line (without the trailing newline).
pub fn encode(msg: &ServerMessage) -> Option<String> {
    match serde_json::to_string(msg) {
        Ok(txt) => Some(txt),
        Err(e) => {
            error!(error = ?e, "failed to serialize server message");
            None
        }
    }
}

async fn write_line<W>(sink: &mut Option<W>, txt: &str)
where
    W: AsyncWrite + Unpin,
{
    let Some(writer) = sink.as_mut() else {
        return;
    };
    let result = async {
        writer.write_all(format!("{txt}\n").as_bytes()).await?;
        writer.flush().await
    }
    .await;
    if let Err(e) = result {
        // Reader went away; keep draining frames without the sink.
        warn!(error = %e, "frame sink closed");
        *sink = None;
    }
}

/// Serializes each frame once and writes it to `sink` as a JSON line.
/// Returns how many frames were serialized once the round task drops its sender.
pub async fn frame_serializer<W>(mut frame_rx: broadcast::Receiver<Frame>, mut sink: Option<W>) -> u64
where
    W: AsyncWrite + Unpin,
{
    let mut serialized = 0;
    loop {
        match frame_rx.recv().await {
            Ok(frame) => {
                let msg = ServerMessage::Frame(FrameDto::from(frame));
                let Some(txt) = encode(&msg) else {
                    continue;
                };
                write_line(&mut sink, &txt).await;
                serialized += 1;
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                warn!(missed = n, "frame serializer lagged; skipping to latest frame");
            }
            Err(broadcast::error::RecvError::Closed) => {
                break;
            }
        }
    }
    serialized
}

/// Forwards round state transitions as JSON lines until the round task is gone.
pub async fn state_serializer<W>(mut state_rx: watch::Receiver<RoundState>, mut sink: Option<W>)
where
    W: AsyncWrite + Unpin,
{
    loop {
        let state = state_rx.borrow_and_update().clone();
        let msg = ServerMessage::RoundState(RoundStateDto::from(state));
        if let Some(txt) = encode(&msg) {
            write_line(&mut sink, &txt).await;
        }
        if state_rx.changed().await.is_err() {
            break;
        }
    }
}
