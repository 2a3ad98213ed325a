// Shared arena builders and hero helpers for integration tests.
#![allow(dead_code)]

use kaboom_arena::domain::tuning::ArenaTuning;
use kaboom_arena::domain::{Cell, PlayerId};
use kaboom_arena::use_cases::{
    ActionOutcome, Arena, Frame, HeroAction, RoundController, RoundSettings,
};
use std::time::Duration;

// Classic board size every scenario runs on.
pub const BOARD_WIDTH: u32 = 1200;
pub const BOARD_HEIGHT: u32 = 600;

// Ticks from planting until the detonation pass runs (fuse + the resolving tick).
pub const TICKS_TO_DETONATION: usize = 251;

// Fresh arena with default tuning and no random obstacles.
pub fn arena() -> Arena {
    Arena::new(BOARD_WIDTH, BOARD_HEIGHT, ArenaTuning::default())
}

// Controller over a fresh arena with a fixed seed so spawns are reproducible.
pub fn controller(game_time_secs: u32) -> RoundController {
    RoundController::new(
        arena(),
        RoundSettings {
            tick_interval: Duration::from_millis(100),
            game_time_secs,
            seed: Some(1234),
        },
    )
}

// Step a hero one pixel at a time; returns the number of steps that actually moved.
pub fn walk(arena: &Arena, player: PlayerId, dx: i32, dy: i32, steps: usize) -> usize {
    (0..steps)
        .filter(|_| arena.hero_action(player, HeroAction::Move { dx, dy }) == ActionOutcome::Moved)
        .count()
}

// Walk player one from its start corner onto `cell` (empty arena assumed).
pub fn walk_to(arena: &Arena, player: PlayerId, cell: Cell) {
    let (target_x, target_y) = arena.geometry().cell_origin(cell);
    let hero = arena.hero_snapshot(player);
    // Aim a few pixels inside the cell so rounding never lands on the border.
    let dx = target_x + 4 - hero.x;
    let dy = target_y + 2 - hero.y;
    walk(arena, player, dx.signum(), 0, dx.unsigned_abs() as usize);
    walk(arena, player, 0, dy.signum(), dy.unsigned_abs() as usize);
    assert_eq!(arena.hero_snapshot(player).cell, Some(cell), "hero should stand on {cell:?}");
}

// Run `n` simulation ticks and return the last frame.
pub fn run_ticks(arena: &Arena, n: usize) -> Frame {
    let mut last = arena.frame();
    for _ in 0..n {
        last = arena.tick();
    }
    last
}

// Run ticks and collect every frame, for event assertions.
pub fn collect_ticks(arena: &Arena, n: usize) -> Vec<Frame> {
    (0..n).map(|_| arena.tick()).collect()
}
