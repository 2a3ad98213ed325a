// State changes produced by a simulation tick, reported for redraw.

use crate::domain::grid::Cell;
use crate::domain::state::{EntityId, ItemKind, PlayerId};

#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionEvent {
    BombPlanted {
        bomb_id: EntityId,
        owner: PlayerId,
        cell: Cell,
    },
    MarksPlaced {
        bomb_id: EntityId,
        cells: Vec<Cell>,
    },
    BombDetonated {
        bomb_id: EntityId,
        owner: PlayerId,
        cell: Cell,
    },
    HeroHit {
        victim: PlayerId,
        lives_left: u8,
        scorer: PlayerId,
        points: u32,
    },
    ShieldConsumed {
        player: PlayerId,
    },
    ShieldGained {
        player: PlayerId,
    },
    ObstacleDestroyed {
        obstacle_id: EntityId,
        cell: Cell,
    },
    ItemPicked {
        player: PlayerId,
        item_id: EntityId,
        kind: ItemKind,
        cell: Cell,
    },
}
