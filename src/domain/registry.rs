// Per-kind collections of live entities for one round.

use crate::domain::geometry::Rect;
use crate::domain::grid::Cell;
use crate::domain::state::{Bomb, EntityId, Item, ItemKind, Obstacle, PlayerId};

/// Live obstacles, items and bombs, each kept in insertion order.
///
/// The registry does not touch the grid; callers claim a cell before adding
/// and release it after removing, inside the same critical section.
#[derive(Default)]
pub struct EntityRegistry {
    obstacles: Vec<Obstacle>,
    items: Vec<Item>,
    bombs: Vec<Bomb>,
    next_id: EntityId,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> EntityId {
        self.next_id = self.next_id.wrapping_add(1);
        self.next_id
    }

    pub fn add_obstacle(&mut self, cell: Cell, rect: Rect, variant: u8) -> EntityId {
        let id = self.allocate_id();
        self.obstacles.push(Obstacle {
            id,
            cell,
            rect,
            variant,
        });
        id
    }

    pub fn add_item(&mut self, cell: Cell, rect: Rect, kind: ItemKind) -> EntityId {
        let id = self.allocate_id();
        self.items.push(Item {
            id,
            cell,
            rect,
            kind,
        });
        id
    }

    pub fn add_bomb(&mut self, owner: PlayerId, cell: Cell, rect: Rect, fuse_ticks: u32) -> EntityId {
        let id = self.allocate_id();
        self.bombs.push(Bomb::new(id, owner, cell, rect, fuse_ticks));
        id
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    pub fn bombs_mut(&mut self) -> &mut [Bomb] {
        &mut self.bombs
    }

    pub fn remove_obstacle_at(&mut self, cell: Cell) -> Option<Obstacle> {
        let idx = self.obstacles.iter().position(|o| o.cell == cell)?;
        Some(self.obstacles.remove(idx))
    }

    pub fn remove_item(&mut self, id: EntityId) -> Option<Item> {
        let idx = self.items.iter().position(|i| i.id == id)?;
        Some(self.items.remove(idx))
    }

    pub fn remove_bomb(&mut self, id: EntityId) -> Option<Bomb> {
        let idx = self.bombs.iter().position(|b| b.id == id)?;
        Some(self.bombs.remove(idx))
    }

    /// Cells claimed by live entities, in no particular order.
    pub fn claimed_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.obstacles
            .iter()
            .map(|o| o.cell)
            .chain(self.items.iter().map(|i| i.cell))
            .chain(self.bombs.iter().map(|b| b.cell))
    }

    pub fn len(&self) -> usize {
        self.obstacles.len() + self.items.len() + self.bombs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
