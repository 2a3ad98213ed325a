use crate::domain::state::ItemKind;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Cadence and content of the background spawners.
#[derive(Debug, Clone)]
pub struct SpawnTuning {
    /// Sleep between item attempts and between obstacle trickle attempts.
    pub interval: Duration,

    /// Number of obstacle placement attempts in the preparation burst is drawn from here.
    pub prepare_attempts: RangeInclusive<u32>,

    /// Item kinds the item spawner picks from, uniformly.
    pub item_kinds: Vec<ItemKind>,

    /// Number of cosmetic obstacle variants.
    pub obstacle_variants: u8,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(5000),
            prepare_attempts: 200..=350,
            item_kinds: vec![ItemKind::Heart, ItemKind::Shield],
            obstacle_variants: 4,
        }
    }
}
