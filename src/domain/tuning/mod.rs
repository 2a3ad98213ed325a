// Gameplay tuning, grouped per concern.

pub mod bomb;
pub mod hero;
pub mod spawn;

use crate::domain::grid::{Cell, Grid};

pub use bomb::BombTuning;
pub use hero::HeroTuning;
pub use spawn::SpawnTuning;

/// Lattice size and the cells claimed before any entity exists.
#[derive(Debug, Clone)]
pub struct GridLayout {
    pub rows: u16,
    pub cols: u16,
    pub reserved: Vec<Cell>,
}

impl GridLayout {
    /// Layout with the two hero start cells reserved.
    pub fn with_corner_anchors(rows: u16, cols: u16) -> Self {
        Self {
            rows,
            cols,
            reserved: vec![Cell::new(0, 0), Cell::new(0, cols.saturating_sub(1))],
        }
    }

    pub fn build(&self) -> Grid {
        Grid::with_reserved(self.rows, self.cols, &self.reserved)
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::with_corner_anchors(16, 20)
    }
}

/// Everything gameplay-related an arena is built from.
#[derive(Debug, Clone, Default)]
pub struct ArenaTuning {
    pub grid: GridLayout,
    pub hero: HeroTuning,
    pub bomb: BombTuning,
    pub spawn: SpawnTuning,
}
