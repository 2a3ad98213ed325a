// Domain-level entities, per-player state and snapshot types.

use crate::domain::geometry::{HasCollisionRect, Rect};
use crate::domain::grid::Cell;

pub type EntityId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    pub fn opponent(self) -> PlayerId {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// 1-based number used on the wire and in names.
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn from_number(number: u8) -> Option<PlayerId> {
        match number {
            1 => Some(PlayerId::One),
            2 => Some(PlayerId::Two),
            _ => None,
        }
    }
}

pub struct Hero {
    pub player: PlayerId,
    pub name: String,
    pub rect: Rect,

    lives: u8,
    max_lives: u8,
    shield: bool,
    // One unexploded bomb per hero.
    bomb_available: bool,
}

impl Hero {
    pub fn new(player: PlayerId, rect: Rect, max_lives: u8) -> Self {
        Self {
            player,
            name: format!("Player {}", player.number()),
            rect,
            lives: max_lives,
            max_lives,
            shield: false,
            bomb_available: true,
        }
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    pub fn has_shield(&self) -> bool {
        self.shield
    }

    pub fn bomb_available(&self) -> bool {
        self.bomb_available
    }

    /// Returns false when there was no life left to lose.
    pub fn remove_life(&mut self) -> bool {
        if self.lives == 0 {
            return false;
        }
        self.lives -= 1;
        true
    }

    /// Returns false when already at the cap.
    pub fn add_life(&mut self) -> bool {
        if self.lives >= self.max_lives {
            return false;
        }
        self.lives += 1;
        true
    }

    pub fn activate_shield(&mut self) {
        self.shield = true;
    }

    /// Drops an active shield. Returns whether one was consumed.
    pub fn consume_shield(&mut self) -> bool {
        std::mem::replace(&mut self.shield, false)
    }

    /// Takes the hero's bomb for planting, if it has one.
    pub fn take_bomb(&mut self) -> bool {
        std::mem::replace(&mut self.bomb_available, false)
    }

    pub fn restore_bomb(&mut self) {
        self.bomb_available = true;
    }
}

impl HasCollisionRect for Hero {
    fn collision_rect(&self) -> Rect {
        self.rect
    }
}

/// Destructible block.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: EntityId,
    pub cell: Cell,
    pub rect: Rect,
    // Cosmetic only.
    pub variant: u8,
}

impl HasCollisionRect for Obstacle {
    fn collision_rect(&self) -> Rect {
        self.rect
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Heart,
    Shield,
}

/// Power-up waiting to be picked up.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: EntityId,
    pub cell: Cell,
    pub rect: Rect,
    pub kind: ItemKind,
}

impl HasCollisionRect for Item {
    fn collision_rect(&self) -> Rect {
        self.rect
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BombPhase {
    Armed,
    Marking,
    Detonated,
}

pub struct Bomb {
    pub id: EntityId,
    pub owner: PlayerId,
    pub cell: Cell,
    pub rect: Rect,

    timer: u32,
    // Warning cells, computed once; owned by this bomb alone.
    marks: Vec<Cell>,
}

impl Bomb {
    pub fn new(id: EntityId, owner: PlayerId, cell: Cell, rect: Rect, fuse_ticks: u32) -> Self {
        Self {
            id,
            owner,
            cell,
            rect,
            timer: fuse_ticks,
            marks: Vec::new(),
        }
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn marks(&self) -> &[Cell] {
        &self.marks
    }

    pub fn phase(&self, mark_threshold: u32) -> BombPhase {
        if self.timer == 0 {
            BombPhase::Detonated
        } else if self.timer <= mark_threshold {
            BombPhase::Marking
        } else {
            BombPhase::Armed
        }
    }

    /// True until the marks have been set once the countdown hits the threshold.
    pub fn needs_marks(&self, mark_threshold: u32) -> bool {
        self.marks.is_empty() && self.timer <= mark_threshold
    }

    pub fn set_marks(&mut self, marks: Vec<Cell>) {
        if self.marks.is_empty() {
            self.marks = marks;
        }
    }

    /// One tick of fuse. Never goes below zero.
    pub fn countdown(&mut self) {
        self.timer = self.timer.saturating_sub(1);
    }
}

impl HasCollisionRect for Bomb {
    fn collision_rect(&self) -> Rect {
        self.rect
    }
}

/// Per-player points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    points: [u32; 2],
}

impl Scoreboard {
    pub fn award(&mut self, player: PlayerId, points: u32) {
        let slot = &mut self.points[player.index()];
        *slot = slot.saturating_add(points);
    }

    pub fn points(&self, player: PlayerId) -> u32 {
        self.points[player.index()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeroSnapshot {
    pub player: PlayerId,
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub cell: Option<Cell>,
    pub lives: u8,
    pub shield: bool,
    pub bomb_available: bool,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BombSnapshot {
    pub id: EntityId,
    pub owner: PlayerId,
    pub cell: Cell,
    pub timer: u32,
    pub marks: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemSnapshot {
    pub id: EntityId,
    pub cell: Cell,
    pub kind: ItemKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleSnapshot {
    pub id: EntityId,
    pub cell: Cell,
    pub variant: u8,
}

impl From<&Bomb> for BombSnapshot {
    fn from(b: &Bomb) -> Self {
        Self {
            id: b.id,
            owner: b.owner,
            cell: b.cell,
            timer: b.timer,
            marks: b.marks.clone(),
        }
    }
}

impl From<&Item> for ItemSnapshot {
    fn from(i: &Item) -> Self {
        Self {
            id: i.id,
            cell: i.cell,
            kind: i.kind,
        }
    }
}

impl From<&Obstacle> for ObstacleSnapshot {
    fn from(o: &Obstacle) -> Self {
        Self {
            id: o.id,
            cell: o.cell,
            variant: o.variant,
        }
    }
}
