use crate::domain::tuning::ArenaTuning;
use crate::use_cases::RoundSettings;
use std::{env, str::FromStr, time::Duration};
use thiserror::Error;

// Runtime constants (not gameplay tuning).

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const FRAME_BROADCAST_CAPACITY: usize = 128;

const DEFAULT_BOARD_WIDTH: u32 = 1200;
const DEFAULT_BOARD_HEIGHT: u32 = 600;
const DEFAULT_GAME_TIME_SECS: u32 = 80;
const DEFAULT_TICK_RATE_HZ: u32 = 60;
const DEFAULT_SPAWN_INTERVAL_MS: u64 = 5000;
const DEFAULT_PREPARE_MIN: u32 = 200;
const DEFAULT_PREPARE_MAX: u32 = 350;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name}={value:?} is not a valid {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("invalid configuration: {0}")]
    Inconsistent(&'static str),
}

/// Everything the binary needs to build and run one arena.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub board_width: u32,
    pub board_height: u32,
    pub tuning: ArenaTuning,
    pub round: RoundSettings,
    /// Write frames and state changes to stdout as JSON lines.
    pub emit_frames: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &'static str, default| parse_var(&lookup, name, default);

        let board_width = get("ARENA_BOARD_WIDTH", DEFAULT_BOARD_WIDTH)?;
        let board_height = get("ARENA_BOARD_HEIGHT", DEFAULT_BOARD_HEIGHT)?;
        let game_time_secs = get("ARENA_GAME_TIME_SECS", DEFAULT_GAME_TIME_SECS)?;
        let tick_rate = get("ARENA_TICK_RATE_HZ", DEFAULT_TICK_RATE_HZ)?;
        let prepare_min = get("ARENA_PREPARE_MIN", DEFAULT_PREPARE_MIN)?;
        let prepare_max = get("ARENA_PREPARE_MAX", DEFAULT_PREPARE_MAX)?;
        let spawn_interval_ms: u64 = parse_var(&lookup, "ARENA_SPAWN_INTERVAL_MS", DEFAULT_SPAWN_INTERVAL_MS)?;
        let seed: Option<u64> = match lookup("ARENA_SEED") {
            Some(raw) => Some(parse_value("ARENA_SEED", &raw)?),
            None => None,
        };
        let emit_frames = parse_var(&lookup, "ARENA_EMIT_FRAMES", false)?;

        if board_width == 0 || board_height == 0 {
            return Err(ConfigError::Inconsistent("board size must be non-zero"));
        }
        if tick_rate == 0 || tick_rate > 1000 {
            return Err(ConfigError::Inconsistent("tick rate must be within 1..=1000 Hz"));
        }
        if spawn_interval_ms == 0 {
            return Err(ConfigError::Inconsistent("spawn interval must be non-zero"));
        }
        if prepare_min > prepare_max {
            return Err(ConfigError::Inconsistent("ARENA_PREPARE_MIN exceeds ARENA_PREPARE_MAX"));
        }

        let mut tuning = ArenaTuning::default();
        tuning.spawn.interval = Duration::from_millis(spawn_interval_ms);
        tuning.spawn.prepare_attempts = prepare_min..=prepare_max;

        Ok(Self {
            board_width,
            board_height,
            tuning,
            round: RoundSettings {
                tick_interval: Duration::from_millis(1000 / u64::from(tick_rate)),
                game_time_secs,
                seed,
            },
            emit_frames,
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
        expected: std::any::type_name::<T>(),
    })
}
