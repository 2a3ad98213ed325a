// Use cases layer: the shared arena handle and the round workflow around it.

pub mod arena;
pub mod generation;
pub mod round;
pub mod spawner;
pub mod types;

pub use arena::{Arena, ArenaState};
pub use generation::{RoundGeneration, RoundToken};
pub use round::{RoundController, RoundSettings, round_task};
pub use types::{
    ActionOutcome, Frame, GameEvent, HeroAction, PlayerResult, RoundEnd, RoundState, RoundSummary,
};
