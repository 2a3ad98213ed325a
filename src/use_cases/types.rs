// Use-case level inputs/outputs for the round loop.

use crate::domain::{
    BombSnapshot, HeroSnapshot, ItemSnapshot, ObstacleSnapshot, PlayerId, ResolutionEvent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeroAction {
    Move { dx: i32, dy: i32 },
    PlantBomb,
}

/// What a hero action did. Contention is an outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Moved,
    Stayed,
    BombPlanted,
    // Cell taken or off the lattice; the bomb flag was handed back.
    PlantBlocked,
    // The hero's single bomb is still ticking.
    NoBombAvailable,
    // Paused or ended rounds ignore input.
    Ignored,
}

#[derive(Debug, Clone)]
pub enum GameEvent {
    Action { player: PlayerId, action: HeroAction },
    TogglePause,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEnd {
    TimeUp,
    PlayerDied { player: PlayerId },
}

impl RoundEnd {
    pub fn headline(&self) -> &'static str {
        match self {
            RoundEnd::TimeUp => "Time's up!",
            RoundEnd::PlayerDied { .. } => "Player died",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundState {
    Preparing,
    Running,
    Paused,
    Ended(RoundEnd),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerResult {
    pub player: PlayerId,
    pub name: String,
    pub points: u32,
    pub lives: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSummary {
    pub end: RoundEnd,
    pub players: Vec<PlayerResult>,
}

/// Everything the drawing collaborator needs for one tick.
#[derive(Debug, Clone)]
pub struct Frame {
    pub tick: u64,
    /// Remaining seconds; `None` until a round controller stamps its clock.
    pub time_left: Option<u32>,
    pub paused: bool,
    pub heroes: Vec<HeroSnapshot>,
    pub bombs: Vec<BombSnapshot>,
    pub items: Vec<ItemSnapshot>,
    pub obstacles: Vec<ObstacleSnapshot>,
    pub events: Vec<ResolutionEvent>,
}

/// Remaining round time as `MM:SS`.
pub fn clock_label(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
