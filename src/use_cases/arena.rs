// Shared arena handle: one lock over the grid, the entity registry and the heroes.

use crate::domain::geometry::{BoardGeometry, Rect};
use crate::domain::grid::{Cell, Grid};
use crate::domain::registry::EntityRegistry;
use crate::domain::state::{EntityId, Hero, HeroSnapshot, ItemKind, PlayerId, Scoreboard};
use crate::domain::systems::bombs::{BlastContext, tick_bombs};
use crate::domain::systems::items::resolve_pickups;
use crate::domain::systems::movement::{MovementConfig, move_hero};
use crate::domain::tuning::ArenaTuning;
use crate::domain::ResolutionEvent;
use crate::use_cases::types::{ActionOutcome, Frame, HeroAction};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Everything guarded by the arena lock. Read access only from outside.
pub struct ArenaState {
    grid: Grid,
    registry: EntityRegistry,
    heroes: [Hero; 2],
    scores: Scoreboard,
    tick: u64,
    paused: bool,
    // Events raised by actions between ticks, flushed into the next frame.
    pending: Vec<ResolutionEvent>,
}

impl ArenaState {
    fn new(geometry: &BoardGeometry, tuning: &ArenaTuning) -> Self {
        let hero = |player| {
            let (x, y) = geometry.spawn_point(player);
            Hero::new(
                player,
                Rect::new(x, y, tuning.hero.width, tuning.hero.height),
                tuning.hero.max_lives,
            )
        };
        Self {
            grid: tuning.grid.build(),
            registry: EntityRegistry::new(),
            heroes: [hero(PlayerId::One), hero(PlayerId::Two)],
            scores: Scoreboard::default(),
            tick: 0,
            paused: false,
            pending: Vec::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn hero(&self, player: PlayerId) -> &Hero {
        &self.heroes[player.index()]
    }

    pub fn scores(&self) -> &Scoreboard {
        &self.scores
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    fn hero_cells(&self, geometry: &BoardGeometry) -> Vec<Cell> {
        self.heroes
            .iter()
            .filter_map(|h| geometry.cell_at(h.rect.x, h.rect.y))
            .collect()
    }

    fn hero_snapshot(&self, player: PlayerId, geometry: &BoardGeometry) -> HeroSnapshot {
        let hero = self.hero(player);
        HeroSnapshot {
            player,
            name: hero.name.clone(),
            x: hero.rect.x,
            y: hero.rect.y,
            cell: geometry.cell_at(hero.rect.x, hero.rect.y),
            lives: hero.lives(),
            shield: hero.has_shield(),
            bomb_available: hero.bomb_available(),
            score: self.scores.points(player),
        }
    }

    fn frame(&self, geometry: &BoardGeometry, events: Vec<ResolutionEvent>) -> Frame {
        Frame {
            tick: self.tick,
            time_left: None,
            paused: self.paused,
            heroes: PlayerId::ALL
                .iter()
                .map(|&p| self.hero_snapshot(p, geometry))
                .collect(),
            bombs: self.registry.bombs().iter().map(Into::into).collect(),
            items: self.registry.items().iter().map(Into::into).collect(),
            obstacles: self.registry.obstacles().iter().map(Into::into).collect(),
            events,
        }
    }
}

/// Cloneable handle shared by the round loop and the spawner tasks.
///
/// Every read-modify-write of the grid, and every registry insert paired
/// with a grid claim, happens inside one critical section of this lock.
#[derive(Clone)]
pub struct Arena {
    state: Arc<Mutex<ArenaState>>,
    geometry: BoardGeometry,
    tuning: Arc<ArenaTuning>,
}

impl Arena {
    pub fn new(board_width: u32, board_height: u32, tuning: ArenaTuning) -> Self {
        let geometry = BoardGeometry::new(board_width, board_height, tuning.grid.rows, tuning.grid.cols);
        let state = ArenaState::new(&geometry, &tuning);
        Self {
            state: Arc::new(Mutex::new(state)),
            geometry,
            tuning: Arc::new(tuning),
        }
    }

    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    pub fn tuning(&self) -> &ArenaTuning {
        &self.tuning
    }

    // Each mutation completes inside one critical section, so a poisoned
    // lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, ArenaState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` against a consistent view of the arena.
    pub fn inspect<R>(&self, f: impl FnOnce(&ArenaState) -> R) -> R {
        f(&self.lock())
    }

    pub fn dimensions(&self) -> (u16, u16) {
        self.geometry.dimensions()
    }

    pub fn is_free(&self, cell: Cell) -> bool {
        self.lock().grid.is_free(cell)
    }

    /// Claims `cell` under the obstacle placement policy and registers the obstacle.
    pub fn spawn_obstacle(&self, cell: Cell, variant: u8) -> Option<EntityId> {
        let mut guard = self.lock();
        let state = &mut *guard;

        let rect = self.geometry.cell_rect(cell);
        let hero_cells = state.hero_cells(&self.geometry);
        // A hero straddling into a diagonal cell would otherwise be boxed in.
        if state.heroes.iter().any(|h| h.rect.overlaps(&rect)) {
            return None;
        }
        if !state.grid.try_claim_obstacle(cell, &hero_cells) {
            return None;
        }
        Some(state.registry.add_obstacle(cell, rect, variant))
    }

    /// Claims a free `cell` and registers an item there.
    pub fn spawn_item(&self, cell: Cell, kind: ItemKind) -> Option<EntityId> {
        let mut guard = self.lock();
        let state = &mut *guard;

        if !state.grid.try_claim(cell) {
            return None;
        }
        Some(state.registry.add_item(cell, self.geometry.cell_rect(cell), kind))
    }

    pub fn hero_action(&self, player: PlayerId, action: HeroAction) -> ActionOutcome {
        let mut guard = self.lock();
        let state = &mut *guard;
        if state.paused {
            return ActionOutcome::Ignored;
        }

        match action {
            HeroAction::Move { dx, dy } => {
                let cfg = MovementConfig {
                    bounds: self
                        .geometry
                        .hero_bounds(self.tuning.hero.width, self.tuning.hero.height),
                    step: self.tuning.hero.step,
                };
                let hero = &mut state.heroes[player.index()];
                if move_hero(hero, dx, dy, state.registry.obstacles(), cfg) {
                    ActionOutcome::Moved
                } else {
                    ActionOutcome::Stayed
                }
            }
            HeroAction::PlantBomb => self.plant_bomb(state, player),
        }
    }

    fn plant_bomb(&self, state: &mut ArenaState, player: PlayerId) -> ActionOutcome {
        let hero = &mut state.heroes[player.index()];
        if !hero.take_bomb() {
            return ActionOutcome::NoBombAvailable;
        }

        let cell = self.geometry.cell_at(hero.rect.x, hero.rect.y);
        match cell {
            Some(cell) if state.grid.try_claim(cell) => {
                let bomb_id = state.registry.add_bomb(
                    player,
                    cell,
                    self.geometry.cell_rect(cell),
                    self.tuning.bomb.fuse_ticks,
                );
                debug!(player = player.number(), bomb_id, row = cell.row, col = cell.col, "bomb planted");
                state.pending.push(ResolutionEvent::BombPlanted {
                    bomb_id,
                    owner: player,
                    cell,
                });
                ActionOutcome::BombPlanted
            }
            _ => {
                // Hand the bomb straight back so the key press is not lost.
                hero.restore_bomb();
                debug!(player = player.number(), ?cell, "bomb plant blocked");
                ActionOutcome::PlantBlocked
            }
        }
    }

    /// Advances one simulation step (bombs, then items) and returns the frame to draw.
    /// A paused arena only reports its current state.
    pub fn tick(&self) -> Frame {
        let mut guard = self.lock();
        let state = &mut *guard;
        let mut events = std::mem::take(&mut state.pending);

        if !state.paused {
            state.tick += 1;
            let mut ctx = BlastContext {
                grid: &mut state.grid,
                registry: &mut state.registry,
                heroes: &mut state.heroes,
                scores: &mut state.scores,
                geometry: &self.geometry,
                events: &mut events,
            };
            tick_bombs(&mut ctx, self.tuning.bomb);
            resolve_pickups(&mut state.grid, &mut state.registry, &mut state.heroes, &mut events);
        }

        state.frame(&self.geometry, events)
    }

    /// Current state without advancing the simulation.
    pub fn frame(&self) -> Frame {
        let guard = self.lock();
        guard.frame(&self.geometry, Vec::new())
    }

    pub fn set_paused(&self, paused: bool) {
        self.lock().paused = paused;
    }

    /// Flips the pause flag and returns the new value.
    pub fn toggle_pause(&self) -> bool {
        let mut guard = self.lock();
        guard.paused = !guard.paused;
        guard.paused
    }

    pub fn lives(&self) -> [u8; 2] {
        let guard = self.lock();
        [guard.heroes[0].lives(), guard.heroes[1].lives()]
    }

    pub fn hero_snapshot(&self, player: PlayerId) -> HeroSnapshot {
        self.lock().hero_snapshot(player, &self.geometry)
    }

    /// Back to the initial layout: reserved cells only, fresh heroes, zero scores.
    pub fn reset(&self) {
        *self.lock() = ArenaState::new(&self.geometry, &self.tuning);
    }

    /// True when every live entity owns a distinct occupied cell and nothing else is occupied.
    pub fn claims_consistent(&self) -> bool {
        let guard = self.lock();
        let mut seen = HashSet::new();
        let claims = guard
            .registry
            .claimed_cells()
            .chain(self.tuning.grid.reserved.iter().copied());
        for cell in claims {
            if !seen.insert(cell) || guard.grid.is_free(cell) {
                return false;
            }
        }
        seen.len() == guard.grid.occupied_count()
    }
}
