/// Gameplay tuning for bombs.

#[derive(Debug, Clone, Copy)]
pub struct BombTuning {
    /// Countdown in simulation ticks from plant to detonation.
    pub fuse_ticks: u32,

    /// Countdown value at which the warning marks are computed.
    pub mark_threshold: u32,

    /// Points awarded to the opponent of a hero that loses a life.
    pub hit_score: u32,
}

impl Default for BombTuning {
    fn default() -> Self {
        Self {
            fuse_ticks: 250,
            mark_threshold: 50,
            hit_score: 10,
        }
    }
}
