// Domain layer: grid occupancy, entities and the per-tick rules.

pub mod events;
pub mod geometry;
pub mod grid;
pub mod registry;
pub mod state;
pub mod systems;
pub mod tuning;

pub use events::ResolutionEvent;
pub use geometry::{BoardGeometry, HasCollisionRect, Rect};
pub use grid::{Cell, Grid};
pub use registry::EntityRegistry;
pub use state::{
    BombSnapshot, EntityId, Hero, HeroSnapshot, ItemKind, ItemSnapshot, ObstacleSnapshot, PlayerId,
    Scoreboard,
};
