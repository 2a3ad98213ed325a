// Line-delimited JSON input feeding the round task.

use crate::domain::PlayerId;
use crate::interface_adapters::protocol::ClientMessage;
use crate::use_cases::{GameEvent, HeroAction};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

const LOG_THROTTLE: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum InputError {
    #[error("malformed input line: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unknown player {0}")]
    UnknownPlayer(u8),
}

/// Decodes one input line into a round event.
pub fn parse_line(line: &str) -> Result<GameEvent, InputError> {
    let event = match serde_json::from_str::<ClientMessage>(line)? {
        ClientMessage::Move { player, dx, dy } => GameEvent::Action {
            player: player_id(player)?,
            action: HeroAction::Move { dx, dy },
        },
        ClientMessage::PlantBomb { player } => GameEvent::Action {
            player: player_id(player)?,
            action: HeroAction::PlantBomb,
        },
        ClientMessage::TogglePause => GameEvent::TogglePause,
        ClientMessage::Reset => GameEvent::Reset,
    };
    Ok(event)
}

fn player_id(number: u8) -> Result<PlayerId, InputError> {
    PlayerId::from_number(number).ok_or(InputError::UnknownPlayer(number))
}

fn should_log(last: &mut Option<Instant>) -> bool {
    match last {
        Some(at) if at.elapsed() < LOG_THROTTLE => false,
        _ => {
            *last = Some(Instant::now());
            true
        }
    }
}

/// Reads events until EOF or until the round task drops its receiver.
/// Bad lines are logged and skipped; a full queue drops the event.
pub async fn input_reader<R>(reader: R, input_tx: mpsc::Sender<GameEvent>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut last_full_log = None;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match parse_line(line) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "dropping input line");
                continue;
            }
        };

        match input_tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                if should_log(&mut last_full_log) {
                    warn!("input channel full; dropping input");
                }
            }
            Err(TrySendError::Closed(_)) => {
                debug!("round task gone; input reader exiting");
                return Ok(());
            }
        }
    }

    debug!("input closed");
    Ok(())
}
