// Random placement of items and obstacles, plus the per-round background loops.

use crate::domain::grid::Cell;
use crate::domain::state::EntityId;
use crate::use_cases::arena::Arena;
use crate::use_cases::generation::RoundToken;
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::{debug, info};

/// Uniformly random cell of a `rows x cols` lattice. Both dimensions must be non-zero.
pub fn random_cell(dimensions: (u16, u16), rng: &mut impl Rng) -> Cell {
    let (rows, cols) = dimensions;
    Cell::new(rng.gen_range(0..rows), rng.gen_range(0..cols))
}

/// One item attempt: random cell, random enabled kind. Contention is silently dropped.
pub fn spawn_item_once(arena: &Arena, rng: &mut impl Rng) -> Option<EntityId> {
    let kind = *arena.tuning().spawn.item_kinds.choose(rng)?;
    let cell = random_cell(arena.dimensions(), rng);
    let id = arena.spawn_item(cell, kind)?;
    debug!(item_id = id, ?kind, row = cell.row, col = cell.col, "item spawned");
    Some(id)
}

/// One obstacle attempt under the placement fairness policy.
pub fn spawn_obstacle_once(arena: &Arena, rng: &mut impl Rng) -> Option<EntityId> {
    let variants = arena.tuning().spawn.obstacle_variants.max(1);
    let variant = rng.gen_range(0..variants);
    let cell = random_cell(arena.dimensions(), rng);
    let id = arena.spawn_obstacle(cell, variant)?;
    debug!(obstacle_id = id, row = cell.row, col = cell.col, "obstacle spawned");
    Some(id)
}

/// Runs `attempts` obstacle placements back to back and returns how many landed.
pub fn prepare_obstacles(arena: &Arena, attempts: u32, rng: &mut impl Rng) -> usize {
    (0..attempts)
        .filter_map(|_| spawn_obstacle_once(arena, rng))
        .count()
}

/// Preparation burst: draws the attempt count from `attempts` and fills the grid.
pub fn prepare_round(arena: &Arena, attempts: RangeInclusive<u32>, rng: &mut impl Rng) -> usize {
    if attempts.is_empty() {
        return 0;
    }
    let attempts = rng.gen_range(attempts);
    let placed = prepare_obstacles(arena, attempts, rng);
    info!(attempts, placed, "obstacle burst placed");
    placed
}

/// Drops an item every `interval` until the round generation changes.
pub async fn item_spawn_loop(arena: Arena, token: RoundToken, interval: Duration, mut rng: StdRng) {
    run_periodic(&token, interval, || {
        spawn_item_once(&arena, &mut rng);
    })
    .await;
    debug!(generation = token.generation(), "item spawner stopped");
}

/// Trickle obstacle placement for the rest of the round.
pub async fn obstacle_spawn_loop(arena: Arena, token: RoundToken, interval: Duration, mut rng: StdRng) {
    run_periodic(&token, interval, || {
        spawn_obstacle_once(&arena, &mut rng);
    })
    .await;
    debug!(generation = token.generation(), "obstacle spawner stopped");
}

async fn run_periodic(token: &RoundToken, interval: Duration, mut job: impl FnMut()) {
    loop {
        tokio::select! {
            _ = token.invalidated() => return,
            _ = tokio::time::sleep(interval) => {}
        }
        if !token.is_current() {
            return;
        }
        job();
    }
}
