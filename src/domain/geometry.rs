// Pixel-space geometry: rectangles and the board <-> cell mapping.

use crate::domain::grid::Cell;
use crate::domain::state::PlayerId;

// Play field placement as fractions of the board size.
const FIELD_LEFT: f64 = 0.25;
const FIELD_TOP: f64 = 0.04;
const FIELD_WIDTH: f64 = 0.7;
const FIELD_HEIGHT: f64 = 0.9265;
const FIELD_RIGHT_MARGIN: f64 = 0.0484;
const FIELD_BOTTOM_MARGIN: f64 = 0.032;
const PLAYER_TWO_START_INSET: f64 = 0.0734;

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Interiors intersect; rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}

/// Anything that takes part in rectangle-overlap collision.
pub trait HasCollisionRect {
    fn collision_rect(&self) -> Rect;

    fn collides_with(&self, other: &impl HasCollisionRect) -> bool {
        self.collision_rect().overlaps(&other.collision_rect())
    }
}

/// Inclusive-exclusive pixel limits a hero's top-left corner may move within.
#[derive(Debug, Clone, Copy)]
pub struct MoveBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

/// Affine mapping between board pixels and lattice cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGeometry {
    width: u32,
    height: u32,
    rows: u16,
    cols: u16,
}

impl BoardGeometry {
    pub fn new(width: u32, height: u32, rows: u16, cols: u16) -> Self {
        Self {
            width,
            height,
            rows,
            cols,
        }
    }

    pub fn dimensions(&self) -> (u16, u16) {
        (self.rows, self.cols)
    }

    fn origin(&self) -> (f64, f64) {
        (self.width as f64 * FIELD_LEFT, self.height as f64 * FIELD_TOP)
    }

    fn cell_extent(&self) -> (f64, f64) {
        (
            self.width as f64 * FIELD_WIDTH / f64::from(self.cols),
            self.height as f64 * FIELD_HEIGHT / f64::from(self.rows),
        )
    }

    /// Cell containing the pixel, or `None` when it falls outside the lattice.
    pub fn cell_at(&self, x: i32, y: i32) -> Option<Cell> {
        let (ox, oy) = self.origin();
        let (cw, ch) = self.cell_extent();
        let col = ((x as f64 - ox) / cw).floor();
        let row = ((y as f64 - oy) / ch).floor();
        if row < 0.0 || col < 0.0 || row >= f64::from(self.rows) || col >= f64::from(self.cols) {
            return None;
        }
        Some(Cell::new(row as u16, col as u16))
    }

    /// Top-left pixel of a cell.
    pub fn cell_origin(&self, cell: Cell) -> (i32, i32) {
        let (ox, oy) = self.origin();
        let (cw, ch) = self.cell_extent();
        let x = (ox + (cw * f64::from(cell.col)).ceil()).ceil();
        let y = (oy + (ch * f64::from(cell.row)).ceil()).ceil();
        (x as i32, y as i32)
    }

    /// Pixel size of an entity drawn inside one cell.
    pub fn cell_size(&self) -> (i32, i32) {
        let (cw, ch) = self.cell_extent();
        (cw.floor() as i32, ch.floor() as i32)
    }

    pub fn cell_rect(&self, cell: Cell) -> Rect {
        let (x, y) = self.cell_origin(cell);
        let (w, h) = self.cell_size();
        Rect::new(x, y, w, h)
    }

    /// Movement limits for a hero of the given size.
    pub fn hero_bounds(&self, hero_w: i32, hero_h: i32) -> MoveBounds {
        let (w, h) = (self.width as f64, self.height as f64);
        MoveBounds {
            min_x: w * FIELD_LEFT,
            max_x: w - hero_w as f64 - w * FIELD_RIGHT_MARGIN,
            min_y: h * FIELD_TOP,
            max_y: h - hero_h as f64 - h * FIELD_BOTTOM_MARGIN,
        }
    }

    /// Starting top-left pixel for each player (top-left and top-right corners).
    pub fn spawn_point(&self, player: PlayerId) -> (i32, i32) {
        let (w, h) = (self.width as f64, self.height as f64);
        let x = match player {
            PlayerId::One => w * FIELD_LEFT,
            PlayerId::Two => w - w * PLAYER_TWO_START_INSET,
        };
        (x as i32, (h * FIELD_TOP) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> BoardGeometry {
        BoardGeometry::new(1200, 600, 16, 20)
    }

    #[test]
    fn spawn_points_map_to_top_corners() {
        let geo = board();
        let (x1, y1) = geo.spawn_point(PlayerId::One);
        let (x2, y2) = geo.spawn_point(PlayerId::Two);

        assert_eq!((x1, y1), (300, 24));
        assert_eq!(geo.cell_at(x1, y1), Some(Cell::new(0, 0)));
        assert_eq!(geo.cell_at(x2, y2), Some(Cell::new(0, 19)));
    }

    #[test]
    fn cell_origin_maps_back_to_the_same_cell() {
        let geo = board();
        for cell in [Cell::new(0, 0), Cell::new(5, 5), Cell::new(15, 19), Cell::new(7, 12)] {
            let (x, y) = geo.cell_origin(cell);
            assert_eq!(geo.cell_at(x, y), Some(cell));
        }
    }

    #[test]
    fn pixels_outside_the_field_have_no_cell() {
        let geo = board();
        assert_eq!(geo.cell_at(299, 30), None);
        assert_eq!(geo.cell_at(400, 10), None);
        assert_eq!(geo.cell_at(1140, 30), None);
        assert_eq!(geo.cell_at(400, 590), None);
    }

    #[test]
    fn cell_size_floors_the_cell_extent() {
        assert_eq!(board().cell_size(), (42, 34));
    }

    #[test]
    fn hero_bounds_match_field_margins() {
        let bounds = board().hero_bounds(30, 30);
        assert_eq!(bounds.min_x, 300.0);
        assert_eq!(bounds.min_y, 24.0);
        assert!((bounds.max_x - 1111.92).abs() < 0.01);
        assert!((bounds.max_y - 550.8).abs() < 0.01);
    }

    #[test]
    fn rect_overlap_excludes_shared_edges() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.overlaps(&Rect::new(5, 5, 10, 10)));
        assert!(!a.overlaps(&Rect::new(10, 0, 10, 10)));
        assert!(!a.overlaps(&Rect::new(0, 10, 10, 10)));
        assert!(a.overlaps(&a.translated(9, 9)));
    }
}
