// Framework bootstrap for the arena runtime.

use crate::frameworks::config::{self, AppConfig};
use crate::interface_adapters::frames::{encode, frame_serializer, state_serializer};
use crate::interface_adapters::input::input_reader;
use crate::interface_adapters::protocol::{ServerMessage, SummaryDto};
use crate::use_cases::{Arena, RoundController, RoundState, RoundSummary, round_task};

use std::io::Result;
use std::sync::Arc;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    // Stdout may carry JSON frames, so every layer writes to stderr.
    // Each arm builds its own base layer: the two sit at different depths of
    // the subscriber stack, so they cannot share one inferred layer type.
    fn stderr<S>() -> fmt::Layer<S, fmt::format::DefaultFields, fmt::format::Format, fn() -> std::io::Stderr> {
        fmt::layer().with_target(false).with_writer(std::io::stderr)
    }
    let (json, compact) = match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => (Some(stderr().json().with_current_span(true)), None),
        _ => (None, Some(stderr().compact())),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(compact)
        .init();

    std::panic::set_hook(Box::new(|info| {
        let location = info.location().map(ToString::to_string);
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?location, %backtrace, "arena panicked");
    }));
}

/// Runs one round to completion: until it ends, or until ctrl-c.
pub async fn run(cfg: AppConfig) -> Result<Option<RoundSummary>> {
    let arena = Arena::new(cfg.board_width, cfg.board_height, cfg.tuning.clone());
    let controller = RoundController::new(arena, cfg.round.clone());

    let (input_tx, input_rx) = mpsc::channel(config::INPUT_CHANNEL_CAPACITY);
    let (frame_tx, _) = broadcast::channel(config::FRAME_BROADCAST_CAPACITY);
    let (state_tx, mut state_rx) = watch::channel(RoundState::Preparing);
    let shutdown = Arc::new(Notify::new());

    let sink = || cfg.emit_frames.then(tokio::io::stdout);
    let frames = tokio::spawn(frame_serializer(frame_tx.subscribe(), sink()));
    tokio::spawn(state_serializer(state_tx.subscribe(), sink()));
    tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        if let Err(e) = input_reader(stdin, input_tx).await {
            tracing::warn!(error = %e, "input reader failed");
        }
    });

    let round = tokio::spawn(round_task(
        controller,
        input_rx,
        frame_tx,
        state_tx,
        Arc::clone(&shutdown),
    ));

    tracing::info!(
        board_width = cfg.board_width,
        board_height = cfg.board_height,
        game_time_secs = cfg.round.game_time_secs,
        emit_frames = cfg.emit_frames,
        "arena running"
    );

    tokio::select! {
        res = state_rx.wait_for(|s| matches!(s, RoundState::Ended(_))) => {
            if res.is_err() {
                tracing::warn!("round task exited early");
            }
        }
        res = tokio::signal::ctrl_c() => {
            res?;
            tracing::info!("interrupted; stopping round");
        }
    }

    shutdown.notify_one();
    let summary = round
        .await
        .map_err(|e| std::io::Error::other(format!("round task failed: {e}")))?;
    // The round task owned the last frame sender, so the serializer drains and exits.
    if let Ok(serialized) = frames.await {
        tracing::debug!(serialized, "frame serializer finished");
    }

    if let Some(summary) = &summary {
        tracing::info!(
            reason = summary.end.headline(),
            p1 = summary.players[0].points,
            p2 = summary.players[1].points,
            "final score"
        );
        let msg = ServerMessage::Summary(SummaryDto::from(summary));
        if let Some(txt) = cfg.emit_frames.then(|| encode(&msg)).flatten() {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(format!("{txt}\n").as_bytes()).await?;
            stdout.flush().await?;
        }
    }

    Ok(summary)
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let cfg = AppConfig::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
    });
    let cfg = cfg.map_err(std::io::Error::other)?;

    run(cfg).await.map(|_| ())
}
