use crate::domain::events::ResolutionEvent;
use crate::domain::geometry::BoardGeometry;
use crate::domain::grid::{Cell, Grid};
use crate::domain::registry::EntityRegistry;
use crate::domain::state::{Bomb, BombPhase, Hero, PlayerId, Scoreboard};
use crate::domain::tuning::BombTuning;
use tracing::{debug, info};

/// Mutable slices of arena state a bomb pass touches.
pub struct BlastContext<'a> {
    pub grid: &'a mut Grid,
    pub registry: &'a mut EntityRegistry,
    pub heroes: &'a mut [Hero; 2],
    pub scores: &'a mut Scoreboard,
    pub geometry: &'a BoardGeometry,
    pub events: &'a mut Vec<ResolutionEvent>,
}

/// Warning cells drawn before detonation: the bomb's cell plus its in-bounds
/// orthogonal neighbours. Cosmetic only; damage uses its own adjacency tests.
pub fn blast_marks(grid: &Grid, cell: Cell) -> Vec<Cell> {
    std::iter::once(cell).chain(grid.neighbours(cell)).collect()
}

/// Hero damage test: same cell or Manhattan distance 1.
pub fn hero_in_blast(bomb_cell: Cell, hero_cell: Cell) -> bool {
    bomb_cell.manhattan(hero_cell) <= 1
}

/// Runs one tick of every bomb: marking, detonation of expired fuses, then
/// the countdown of the survivors. Bombs are handled in plant order.
pub fn tick_bombs(ctx: &mut BlastContext<'_>, cfg: BombTuning) {
    let mut expired = Vec::new();

    for bomb in ctx.registry.bombs_mut() {
        if bomb.needs_marks(cfg.mark_threshold) {
            let marks = blast_marks(ctx.grid, bomb.cell);
            ctx.events.push(ResolutionEvent::MarksPlaced {
                bomb_id: bomb.id,
                cells: marks.clone(),
            });
            bomb.set_marks(marks);
        }
        if bomb.phase(cfg.mark_threshold) == BombPhase::Detonated {
            expired.push(bomb.id);
        }
    }

    for id in expired {
        if let Some(bomb) = ctx.registry.remove_bomb(id) {
            detonate(ctx, &bomb, cfg);
        }
    }

    // Bombs resolved above are gone, so nothing is decremented past zero.
    for bomb in ctx.registry.bombs_mut() {
        bomb.countdown();
    }
}

fn detonate(ctx: &mut BlastContext<'_>, bomb: &Bomb, cfg: BombTuning) {
    damage_first_hero(ctx, bomb, cfg);

    // Obstacles are destroyed on the four neighbours only, never on the bomb's own cell.
    let neighbours: Vec<Cell> = ctx.grid.neighbours(bomb.cell).collect();
    for cell in neighbours {
        if let Some(obstacle) = ctx.registry.remove_obstacle_at(cell) {
            ctx.grid.release(cell);
            debug!(obstacle_id = obstacle.id, row = cell.row, col = cell.col, "obstacle destroyed");
            ctx.events.push(ResolutionEvent::ObstacleDestroyed {
                obstacle_id: obstacle.id,
                cell,
            });
        }
    }

    ctx.grid.release(bomb.cell);
    ctx.heroes[bomb.owner.index()].restore_bomb();
    ctx.events.push(ResolutionEvent::BombDetonated {
        bomb_id: bomb.id,
        owner: bomb.owner,
        cell: bomb.cell,
    });
}

// At most one hero is credited per bomb: player one is tested first.
fn damage_first_hero(ctx: &mut BlastContext<'_>, bomb: &Bomb, cfg: BombTuning) {
    let geometry = ctx.geometry;
    let victim = PlayerId::ALL.into_iter().find(|p| {
        let rect = ctx.heroes[p.index()].rect;
        geometry
            .cell_at(rect.x, rect.y)
            .is_some_and(|cell| hero_in_blast(bomb.cell, cell))
    });
    let Some(victim) = victim else {
        return;
    };

    let hero = &mut ctx.heroes[victim.index()];
    if hero.consume_shield() {
        info!(victim = victim.number(), bomb_id = bomb.id, "shield absorbed blast");
        ctx.events.push(ResolutionEvent::ShieldConsumed { player: victim });
        return;
    }
    if !hero.remove_life() {
        return;
    }

    let lives_left = hero.lives();
    let scorer = victim.opponent();
    ctx.scores.award(scorer, cfg.hit_score);
    info!(
        victim = victim.number(),
        scorer = scorer.number(),
        bomb_owner = bomb.owner.number(),
        lives_left,
        "hero hit"
    );
    ctx.events.push(ResolutionEvent::HeroHit {
        victim,
        lives_left,
        scorer,
        points: cfg.hit_score,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geometry::Rect;
    use crate::domain::state::Hero;

    struct Fixture {
        grid: Grid,
        registry: EntityRegistry,
        heroes: [Hero; 2],
        scores: Scoreboard,
        geometry: BoardGeometry,
        events: Vec<ResolutionEvent>,
    }

    impl Fixture {
        fn new() -> Self {
            let geometry = BoardGeometry::new(1200, 600, 16, 20);
            let hero_at = |player, cell: Cell| {
                let (x, y) = geometry.cell_origin(cell);
                Hero::new(player, Rect::new(x, y, 30, 30), 3)
            };
            Self {
                grid: Grid::new(16, 20),
                registry: EntityRegistry::new(),
                heroes: [
                    hero_at(PlayerId::One, Cell::new(10, 2)),
                    hero_at(PlayerId::Two, Cell::new(10, 17)),
                ],
                scores: Scoreboard::default(),
                geometry,
                events: Vec::new(),
            }
        }

        fn place_hero(&mut self, player: PlayerId, cell: Cell) {
            let (x, y) = self.geometry.cell_origin(cell);
            self.heroes[player.index()].rect = Rect::new(x, y, 30, 30);
        }

        fn plant(&mut self, owner: PlayerId, cell: Cell, fuse: u32) {
            assert!(self.grid.try_claim(cell));
            assert!(self.heroes[owner.index()].take_bomb());
            let rect = self.geometry.cell_rect(cell);
            self.registry.add_bomb(owner, cell, rect, fuse);
        }

        fn obstacle(&mut self, cell: Cell) {
            assert!(self.grid.try_claim(cell));
            let rect = self.geometry.cell_rect(cell);
            self.registry.add_obstacle(cell, rect, 0);
        }

        fn tick(&mut self) {
            let mut ctx = BlastContext {
                grid: &mut self.grid,
                registry: &mut self.registry,
                heroes: &mut self.heroes,
                scores: &mut self.scores,
                geometry: &self.geometry,
                events: &mut self.events,
            };
            tick_bombs(&mut ctx, BombTuning::default());
        }

        fn hero(&self, player: PlayerId) -> &Hero {
            &self.heroes[player.index()]
        }
    }

    #[test]
    fn bomb_destroys_neighbouring_obstacle_and_frees_cells() {
        let mut fx = Fixture::new();
        fx.plant(PlayerId::One, Cell::new(5, 5), 250);
        fx.obstacle(Cell::new(5, 6));

        for _ in 0..250 {
            fx.tick();
            assert_eq!(fx.registry.bombs().len(), 1);
        }
        assert_eq!(fx.registry.bombs()[0].timer(), 0);
        fx.tick();

        assert!(fx.registry.bombs().is_empty());
        assert!(fx.registry.obstacles().is_empty());
        assert!(fx.grid.is_free(Cell::new(5, 6)));
        assert!(fx.grid.is_free(Cell::new(5, 5)));
        assert!(fx.hero(PlayerId::One).bomb_available());
        assert_eq!(fx.grid.occupied_count(), 0);
    }

    #[test]
    fn timer_decrements_by_one_per_tick_and_resolves_once() {
        let mut fx = Fixture::new();
        fx.plant(PlayerId::Two, Cell::new(8, 8), 5);

        let mut seen = Vec::new();
        for _ in 0..5 {
            fx.tick();
            seen.push(fx.registry.bombs()[0].timer());
        }
        assert_eq!(seen, vec![4, 3, 2, 1, 0]);

        fx.tick();
        fx.tick();
        let detonations = fx
            .events
            .iter()
            .filter(|e| matches!(e, ResolutionEvent::BombDetonated { .. }))
            .count();
        assert_eq!(detonations, 1);
    }

    #[test]
    fn marks_are_computed_once_at_the_threshold_and_clipped() {
        let mut fx = Fixture::new();
        fx.plant(PlayerId::One, Cell::new(15, 0), 52);

        fx.tick();
        fx.tick();
        assert!(fx.registry.bombs()[0].marks().is_empty());
        fx.tick();

        let mut marks = fx.registry.bombs()[0].marks().to_vec();
        marks.sort();
        assert_eq!(marks, vec![Cell::new(14, 0), Cell::new(15, 0), Cell::new(15, 1)]);

        fx.tick();
        let mark_events = fx
            .events
            .iter()
            .filter(|e| matches!(e, ResolutionEvent::MarksPlaced { .. }))
            .count();
        assert_eq!(mark_events, 1);
    }

    #[test]
    fn unshielded_hero_loses_a_life_and_opponent_scores() {
        let mut fx = Fixture::new();
        fx.place_hero(PlayerId::Two, Cell::new(6, 5));
        fx.plant(PlayerId::One, Cell::new(5, 5), 0);

        fx.tick();

        assert_eq!(fx.hero(PlayerId::Two).lives(), 2);
        assert_eq!(fx.scores.points(PlayerId::One), 10);
        assert_eq!(fx.scores.points(PlayerId::Two), 0);
    }

    #[test]
    fn own_bomb_credits_the_opponent() {
        let mut fx = Fixture::new();
        fx.place_hero(PlayerId::One, Cell::new(5, 5));
        fx.plant(PlayerId::One, Cell::new(5, 5), 0);

        fx.tick();

        assert_eq!(fx.hero(PlayerId::One).lives(), 2);
        assert_eq!(fx.scores.points(PlayerId::Two), 10);
    }

    #[test]
    fn shield_absorbs_exactly_one_hit() {
        let mut fx = Fixture::new();
        fx.place_hero(PlayerId::Two, Cell::new(5, 4));
        fx.heroes[PlayerId::Two.index()].activate_shield();

        fx.plant(PlayerId::One, Cell::new(5, 5), 0);
        fx.tick();
        assert_eq!(fx.hero(PlayerId::Two).lives(), 3);
        assert!(!fx.hero(PlayerId::Two).has_shield());
        assert_eq!(fx.scores.points(PlayerId::One), 0);

        fx.plant(PlayerId::One, Cell::new(5, 5), 0);
        fx.tick();
        assert_eq!(fx.hero(PlayerId::Two).lives(), 2);
        assert_eq!(fx.scores.points(PlayerId::One), 10);
    }

    #[test]
    fn only_the_first_hero_in_range_is_credited() {
        let mut fx = Fixture::new();
        fx.place_hero(PlayerId::One, Cell::new(5, 4));
        fx.place_hero(PlayerId::Two, Cell::new(5, 6));
        fx.plant(PlayerId::Two, Cell::new(5, 5), 0);

        fx.tick();

        assert_eq!(fx.hero(PlayerId::One).lives(), 2);
        assert_eq!(fx.hero(PlayerId::Two).lives(), 3);
        assert_eq!(fx.scores.points(PlayerId::Two), 10);
    }

    #[test]
    fn diagonal_hero_is_not_hit() {
        let mut fx = Fixture::new();
        fx.place_hero(PlayerId::Two, Cell::new(6, 6));
        fx.plant(PlayerId::One, Cell::new(5, 5), 0);

        fx.tick();

        assert_eq!(fx.hero(PlayerId::Two).lives(), 3);
        assert!(fx.hero(PlayerId::One).bomb_available());
    }

    #[test]
    fn obstacle_on_diagonal_survives() {
        let mut fx = Fixture::new();
        fx.obstacle(Cell::new(4, 4));
        fx.obstacle(Cell::new(4, 5));
        fx.obstacle(Cell::new(6, 5));
        fx.plant(PlayerId::One, Cell::new(5, 5), 0);

        fx.tick();

        let left: Vec<Cell> = fx.registry.obstacles().iter().map(|o| o.cell).collect();
        assert_eq!(left, vec![Cell::new(4, 4)]);
        assert_eq!(fx.grid.occupied_count(), 1);
    }

    #[test]
    fn each_life_lost_is_matched_by_ten_points() {
        let mut fx = Fixture::new();
        fx.place_hero(PlayerId::One, Cell::new(3, 3));
        for _ in 0..4 {
            fx.plant(PlayerId::Two, Cell::new(3, 4), 0);
            fx.tick();
        }
        let lost = 3 - u32::from(fx.hero(PlayerId::One).lives());
        assert_eq!(lost, 3);
        // The fourth blast finds no life left and awards nothing.
        assert_eq!(fx.scores.points(PlayerId::Two), lost * 10);
    }
}
