// Discrete occupancy lattice shared by obstacles, items and bombs.

/// One lattice cell addressed by row `i` and column `j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: u16,
    pub col: u16,
}

impl Cell {
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }

    pub fn manhattan(&self, other: Cell) -> u32 {
        u32::from(self.row.abs_diff(other.row)) + u32::from(self.col.abs_diff(other.col))
    }

    /// True for the four orthogonal neighbours (distance exactly 1).
    pub fn is_adjacent(&self, other: Cell) -> bool {
        self.manhattan(other) == 1
    }
}

const NEIGHBOUR_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Occupancy flags for a fixed `rows x cols` lattice.
///
/// A set flag means exactly one live entity (or a pre-reserved anchor) owns
/// the cell. The grid itself is not synchronized; the arena keeps it behind
/// its lock together with the entity registry.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: u16,
    cols: u16,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates an all-free grid.
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; usize::from(rows) * usize::from(cols)],
        }
    }

    /// Creates a grid with the given cells pre-claimed. Out-of-range cells are ignored.
    pub fn with_reserved(rows: u16, cols: u16, reserved: &[Cell]) -> Self {
        let mut grid = Self::new(rows, cols);
        for &cell in reserved {
            grid.try_claim(cell);
        }
        grid
    }

    pub fn dimensions(&self) -> (u16, u16) {
        (self.rows, self.cols)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Out-of-range cells are never free.
    pub fn is_free(&self, cell: Cell) -> bool {
        self.contains(cell) && !self.cells[self.index(cell)]
    }

    /// Marks the cell occupied if it was free. Returns whether the claim succeeded.
    pub fn try_claim(&mut self, cell: Cell) -> bool {
        if !self.is_free(cell) {
            return false;
        }
        let idx = self.index(cell);
        self.cells[idx] = true;
        true
    }

    /// Claims a cell for an obstacle, honoring the spawn fairness policy:
    /// never inside a start-corner safe zone and never on or next to a hero.
    pub fn try_claim_obstacle(&mut self, cell: Cell, hero_cells: &[Cell]) -> bool {
        if self.in_safe_zone(cell) {
            return false;
        }
        if hero_cells.iter().any(|hero| hero.manhattan(cell) <= 1) {
            return false;
        }
        self.try_claim(cell)
    }

    /// Marks the cell free unconditionally.
    pub fn release(&mut self, cell: Cell) {
        if self.contains(cell) {
            let idx = self.index(cell);
            self.cells[idx] = false;
        }
    }

    /// The start corners and the cells touching them, kept obstacle-free so
    /// both heroes can move on the first tick.
    pub fn in_safe_zone(&self, cell: Cell) -> bool {
        let last = self.cols.saturating_sub(1);
        let (i, j) = (cell.row, cell.col);
        (i == 0 && (j <= 1 || j + 2 >= self.cols)) || (i == 1 && (j == 0 || j == last))
    }

    /// Cell shifted by a signed offset, if it stays on the lattice.
    pub fn offset(&self, cell: Cell, d_row: i32, d_col: i32) -> Option<Cell> {
        let row = i32::from(cell.row) + d_row;
        let col = i32::from(cell.col) + d_col;
        if row < 0 || col < 0 || row >= i32::from(self.rows) || col >= i32::from(self.cols) {
            return None;
        }
        Some(Cell::new(row as u16, col as u16))
    }

    /// In-bounds orthogonal neighbours of `cell`.
    pub fn neighbours(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        NEIGHBOUR_OFFSETS
            .iter()
            .filter_map(move |&(dr, dc)| self.offset(cell, dr, dc))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&taken| taken).count()
    }

    fn index(&self, cell: Cell) -> usize {
        usize::from(cell.row) * usize::from(self.cols) + usize::from(cell.col)
    }
}
