mod support;

use kaboom_arena::domain::tuning::ArenaTuning;
use kaboom_arena::domain::{Cell, ItemKind, PlayerId, ResolutionEvent};
use kaboom_arena::use_cases::spawner::{item_spawn_loop, obstacle_spawn_loop};
use kaboom_arena::use_cases::{
    ActionOutcome, Arena, Frame, GameEvent, HeroAction, RoundEnd, RoundGeneration, RoundState,
    round_task,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use support::{
    BOARD_HEIGHT, BOARD_WIDTH, TICKS_TO_DETONATION, arena, collect_ticks, controller, run_ticks,
    walk, walk_to,
};
use tokio::sync::{Notify, broadcast, mpsc, watch};

fn plant(arena: &Arena, player: PlayerId) -> ActionOutcome {
    arena.hero_action(player, HeroAction::PlantBomb)
}

fn events(frames: &[Frame]) -> Vec<ResolutionEvent> {
    frames.iter().flat_map(|f| f.events.iter().cloned()).collect()
}

#[test]
fn bomb_destroys_adjacent_obstacle_and_frees_its_cell() {
    let arena = arena();
    walk_to(&arena, PlayerId::One, Cell::new(5, 5));
    assert_eq!(plant(&arena, PlayerId::One), ActionOutcome::BombPlanted);

    // Step well clear of the blast before the obstacle appears.
    walk(&arena, PlayerId::One, 0, 1, 150);
    assert!(arena.spawn_obstacle(Cell::new(5, 6), 0).is_some());
    assert!(arena.claims_consistent());

    let frames = collect_ticks(&arena, TICKS_TO_DETONATION);

    assert!(arena.is_free(Cell::new(5, 6)));
    assert!(arena.is_free(Cell::new(5, 5)));
    let hero = arena.hero_snapshot(PlayerId::One);
    assert!(hero.bomb_available);
    assert_eq!(hero.lives, 3);
    assert!(events(&frames).iter().any(|e| matches!(
        e,
        ResolutionEvent::ObstacleDestroyed { cell, .. } if *cell == Cell::new(5, 6)
    )));
    assert!(arena.claims_consistent());
}

#[test]
fn bomb_timer_counts_down_once_per_tick_and_resolves_once() {
    let arena = arena();
    walk_to(&arena, PlayerId::One, Cell::new(3, 4));
    plant(&arena, PlayerId::One);

    let mut previous = 250;
    for _ in 0..250 {
        let frame = arena.tick();
        let timer = frame.bombs[0].timer;
        assert_eq!(timer, previous - 1);
        previous = timer;
    }
    assert_eq!(previous, 0);

    // Marks are computed once, when the timer passes the threshold.
    let marked = arena.frame();
    assert_eq!(marked.bombs[0].marks.len(), 5);

    let frames = collect_ticks(&arena, 3);
    assert!(frames[0].bombs.is_empty());
    let detonations = events(&frames)
        .into_iter()
        .filter(|e| matches!(e, ResolutionEvent::BombDetonated { .. }))
        .count();
    assert_eq!(detonations, 1);
}

#[test]
fn marks_near_the_border_are_clipped() {
    let arena = arena();
    walk_to(&arena, PlayerId::Two, Cell::new(4, 19));
    plant(&arena, PlayerId::Two);

    let frame = run_ticks(&arena, 201);
    let marks = &frame.bombs[0].marks;
    assert_eq!(marks.len(), 4);
    assert!(marks.iter().all(|c| c.col <= 19));
}

#[test]
fn shield_absorbs_exactly_one_hit() {
    let arena = arena();
    walk_to(&arena, PlayerId::One, Cell::new(0, 1));
    assert!(arena.spawn_item(Cell::new(0, 1), ItemKind::Shield).is_some());
    arena.tick();
    assert!(arena.hero_snapshot(PlayerId::One).shield);

    assert_eq!(plant(&arena, PlayerId::One), ActionOutcome::BombPlanted);
    let frames = collect_ticks(&arena, TICKS_TO_DETONATION);
    let hero = arena.hero_snapshot(PlayerId::One);
    assert!(!hero.shield);
    assert_eq!(hero.lives, 3);
    assert_eq!(arena.hero_snapshot(PlayerId::Two).score, 0);
    assert!(events(&frames).contains(&ResolutionEvent::ShieldConsumed { player: PlayerId::One }));

    assert_eq!(plant(&arena, PlayerId::One), ActionOutcome::BombPlanted);
    run_ticks(&arena, TICKS_TO_DETONATION);
    assert_eq!(arena.hero_snapshot(PlayerId::One).lives, 2);
    assert_eq!(arena.hero_snapshot(PlayerId::Two).score, 10);
}

#[test]
fn three_self_hits_end_the_round_with_player_died() {
    let mut controller = controller(80);
    let arena = controller.arena().clone();
    walk_to(&arena, PlayerId::One, Cell::new(0, 1));

    for expected_lives in [2, 1, 0] {
        assert_eq!(plant(&arena, PlayerId::One), ActionOutcome::BombPlanted);
        for _ in 0..TICKS_TO_DETONATION {
            controller.tick();
        }
        assert_eq!(arena.hero_snapshot(PlayerId::One).lives, expected_lives);
    }

    let end = controller.check_end().expect("round over");
    assert_eq!(end, RoundEnd::PlayerDied { player: PlayerId::One });
    let summary = controller.summary(end);
    assert_eq!(summary.players[1].points, 30);
    assert_eq!(summary.players[0].points, 0);
}

#[test]
fn heart_restores_a_lost_life() {
    let arena = arena();
    walk_to(&arena, PlayerId::One, Cell::new(0, 1));
    plant(&arena, PlayerId::One);
    run_ticks(&arena, TICKS_TO_DETONATION);
    assert_eq!(arena.hero_snapshot(PlayerId::One).lives, 2);

    arena.spawn_item(Cell::new(0, 1), ItemKind::Heart);
    let frame = arena.tick();

    assert_eq!(frame.heroes[0].lives, 3);
    assert!(frame.items.is_empty());
    assert!(arena.is_free(Cell::new(0, 1)));
}

#[tokio::test(start_paused = true)]
async fn inputs_through_the_round_task_plant_a_bomb() {
    let controller = controller(60);
    let arena = controller.arena().clone();
    let (input_tx, input_rx) = mpsc::channel(256);
    let (frame_tx, mut frame_rx) = broadcast::channel(64);
    let (state_tx, mut state_rx) = watch::channel(RoundState::Preparing);
    let shutdown = Arc::new(Notify::new());
    let handle = tokio::spawn(round_task(
        controller,
        input_rx,
        frame_tx,
        state_tx,
        Arc::clone(&shutdown),
    ));
    state_rx.wait_for(|s| *s == RoundState::Running).await.expect("running");

    // Planting on the reserved start cell is refused; walk one cell right first.
    input_tx
        .send(GameEvent::Action { player: PlayerId::One, action: HeroAction::PlantBomb })
        .await
        .expect("send");
    for _ in 0..50 {
        input_tx
            .send(GameEvent::Action { player: PlayerId::One, action: HeroAction::Move { dx: 1, dy: 0 } })
            .await
            .expect("send");
    }
    input_tx
        .send(GameEvent::Action { player: PlayerId::One, action: HeroAction::PlantBomb })
        .await
        .expect("send");

    let planted = loop {
        match frame_rx.recv().await {
            Ok(frame) => {
                if let Some(bomb) = frame.bombs.first() {
                    break bomb.clone();
                }
            }
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(e) => panic!("frames stopped: {e}"),
        }
    };
    assert_eq!(planted.owner, PlayerId::One);
    assert_eq!(planted.cell, Cell::new(0, 1));
    assert!(arena.claims_consistent());

    shutdown.notify_one();
    assert!(handle.await.expect("clean exit").is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_spawners_never_break_grid_claims() {
    let mut tuning = ArenaTuning::default();
    tuning.bomb.fuse_ticks = 20;
    tuning.bomb.mark_threshold = 5;
    let arena = Arena::new(BOARD_WIDTH, BOARD_HEIGHT, tuning);

    let generation = RoundGeneration::new();
    let interval = Duration::from_micros(50);
    let mut spawners = Vec::new();
    for seed in 0..4u64 {
        spawners.push(tokio::spawn(item_spawn_loop(
            arena.clone(),
            generation.token(),
            interval,
            StdRng::seed_from_u64(seed),
        )));
        spawners.push(tokio::spawn(obstacle_spawn_loop(
            arena.clone(),
            generation.token(),
            interval,
            StdRng::seed_from_u64(100 + seed),
        )));
    }

    // The test thread is not a runtime worker, so this loop races the spawners.
    let moves = [(1, 0), (0, 1), (-1, 0), (0, -1)];
    for i in 0..20_000usize {
        let (dx, dy) = moves[(i / 40) % moves.len()];
        for player in PlayerId::ALL {
            arena.hero_action(player, HeroAction::Move { dx, dy });
            if i % 25 == 0 {
                arena.hero_action(player, HeroAction::PlantBomb);
            }
        }
        arena.tick();
        assert!(arena.claims_consistent(), "claims diverged on tick {i}");
    }

    generation.advance();
    for spawner in spawners {
        spawner.await.expect("spawner exits on retirement");
    }
    assert!(arena.claims_consistent());
    let frame = arena.frame();
    assert!(!frame.obstacles.is_empty() || !frame.items.is_empty());
}
