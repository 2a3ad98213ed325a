/// Gameplay tuning for player-controlled heroes.
///
/// Keep this separate from runtime configuration (tick rates, board size, etc.).

#[derive(Debug, Clone, Copy)]
pub struct HeroTuning {
    /// Collision box width in pixels.
    pub width: i32,

    /// Collision box height in pixels.
    pub height: i32,

    /// Lives at round start; also the cap for heart pickups.
    pub max_lives: u8,

    /// Largest per-axis pixel step a single move action may take.
    pub step: i32,
}

impl Default for HeroTuning {
    fn default() -> Self {
        Self {
            width: 30,
            height: 30,
            max_lives: 3,
            step: 1,
        }
    }
}
