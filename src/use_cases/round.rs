// Round lifecycle: preparation, background jobs, fixed-step loop and end detection.

use crate::domain::PlayerId;
use crate::use_cases::arena::Arena;
use crate::use_cases::generation::{RoundGeneration, RoundToken};
use crate::use_cases::spawner;
use crate::use_cases::types::{
    ActionOutcome, Frame, GameEvent, HeroAction, PlayerResult, RoundEnd, RoundState, RoundSummary,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

const CLOCK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct RoundSettings {
    pub tick_interval: Duration,
    pub game_time_secs: u32,
    /// Fixed seed for reproducible spawns; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(1000 / 60),
            game_time_secs: 80,
            seed: None,
        }
    }
}

/// Owns one arena's round: clock, spawner tasks and the end condition.
pub struct RoundController {
    arena: Arena,
    settings: RoundSettings,
    generation: RoundGeneration,
    clock_tx: Arc<watch::Sender<u32>>,
    rng: StdRng,
    tasks: Vec<JoinHandle<()>>,
    state: RoundState,
}

impl RoundController {
    pub fn new(arena: Arena, settings: RoundSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (clock_tx, _) = watch::channel(settings.game_time_secs);
        Self {
            arena,
            settings,
            generation: RoundGeneration::new(),
            clock_tx: Arc::new(clock_tx),
            rng,
            tasks: Vec::new(),
            state: RoundState::Preparing,
        }
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn settings(&self) -> &RoundSettings {
        &self.settings
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation.current()
    }

    /// Remaining whole seconds.
    pub fn time_left(&self) -> u32 {
        *self.clock_tx.borrow()
    }

    /// Synchronous obstacle burst before any background job runs.
    pub fn prepare_round(&mut self) -> usize {
        let attempts = self.arena.tuning().spawn.prepare_attempts.clone();
        spawner::prepare_round(&self.arena, attempts, &mut self.rng)
    }

    /// Starts the item spawner, the obstacle trickle and the countdown for the current generation.
    pub fn start(&mut self) {
        let token = self.generation.token();
        let interval = self.arena.tuning().spawn.interval;

        self.tasks.push(tokio::spawn(spawner::item_spawn_loop(
            self.arena.clone(),
            token.clone(),
            interval,
            StdRng::seed_from_u64(self.rng.next_u64()),
        )));
        self.tasks.push(tokio::spawn(spawner::obstacle_spawn_loop(
            self.arena.clone(),
            token.clone(),
            interval,
            StdRng::seed_from_u64(self.rng.next_u64()),
        )));
        self.tasks.push(tokio::spawn(countdown_loop(
            Arc::clone(&self.clock_tx),
            token,
            CLOCK_PERIOD,
        )));

        self.state = RoundState::Running;
        info!(
            generation = self.generation.current(),
            game_time_secs = self.settings.game_time_secs,
            "round started"
        );
    }

    /// One simulation step, stamped with the remaining time.
    pub fn tick(&mut self) -> Frame {
        let mut frame = self.arena.tick();
        frame.time_left = Some(self.time_left());
        frame
    }

    pub fn hero_action(&self, player: PlayerId, action: HeroAction) -> ActionOutcome {
        if matches!(self.state, RoundState::Ended(_)) {
            return ActionOutcome::Ignored;
        }
        self.arena.hero_action(player, action)
    }

    /// Flips pause while the round is live; ended rounds stay ended.
    pub fn toggle_pause(&mut self) -> RoundState {
        if matches!(self.state, RoundState::Running | RoundState::Paused) {
            let paused = self.arena.toggle_pause();
            self.state = if paused {
                RoundState::Paused
            } else {
                RoundState::Running
            };
            info!(paused, "pause toggled");
        }
        self.state.clone()
    }

    /// Death is checked before the clock, so a same-tick tie reports the death.
    pub fn check_end(&self) -> Option<RoundEnd> {
        let lives = self.arena.lives();
        if let Some(&player) = PlayerId::ALL.iter().find(|p| lives[p.index()] == 0) {
            return Some(RoundEnd::PlayerDied { player });
        }
        (self.time_left() == 0).then_some(RoundEnd::TimeUp)
    }

    /// Marks the round ended, retires its background jobs and reports the result.
    pub async fn finish(&mut self, end: RoundEnd) -> RoundSummary {
        self.state = RoundState::Ended(end);
        self.arena.set_paused(true);
        self.retire_tasks().await;

        let summary = self.summary(end);
        info!(
            reason = end.headline(),
            p1_points = summary.players[0].points,
            p2_points = summary.players[1].points,
            "round ended"
        );
        summary
    }

    pub fn summary(&self, end: RoundEnd) -> RoundSummary {
        let players = PlayerId::ALL
            .iter()
            .map(|&player| {
                let hero = self.arena.hero_snapshot(player);
                PlayerResult {
                    player,
                    name: hero.name,
                    points: hero.score,
                    lives: hero.lives,
                }
            })
            .collect();
        RoundSummary { end, players }
    }

    /// Fresh round: old jobs retired, grid and heroes reinitialized, clock
    /// refilled, obstacles re-prepared and jobs restarted under a new generation.
    pub async fn reset_round(&mut self) -> usize {
        self.retire_tasks().await;
        self.arena.reset();
        self.clock_tx.send_replace(self.settings.game_time_secs);

        self.state = RoundState::Preparing;
        let placed = self.prepare_round();
        self.start();
        info!(generation = self.generation.current(), placed, "round reset");
        placed
    }

    pub async fn stop(&mut self) {
        self.retire_tasks().await;
    }

    async fn retire_tasks(&mut self) {
        self.generation.advance();
        for task in self.tasks.drain(..) {
            let _ = task.await;
        }
    }
}

/// Ticks the round clock down once per `period` until zero or retirement.
pub async fn countdown_loop(clock: Arc<watch::Sender<u32>>, token: RoundToken, period: Duration) {
    loop {
        tokio::select! {
            _ = token.invalidated() => break,
            _ = tokio::time::sleep(period) => {}
        }

        // Checked under the channel lock so a concurrent reset never loses its refill.
        clock.send_if_modified(|left| {
            if !token.is_current() || *left == 0 {
                return false;
            }
            *left -= 1;
            true
        });
        if !token.is_current() || *clock.borrow() == 0 {
            break;
        }
    }
    debug!(generation = token.generation(), "countdown stopped");
}

/// Drives one arena: prepares the round, then advances it every `tick_interval`,
/// applying queued input between steps and publishing one frame per step.
///
/// Ended rounds keep the task alive so a reset can start the next one. Returns
/// the summary of the last ended round once `shutdown` fires.
pub async fn round_task(
    mut controller: RoundController,
    mut input_rx: mpsc::Receiver<GameEvent>,
    frame_tx: broadcast::Sender<Frame>,
    state_tx: watch::Sender<RoundState>,
    shutdown: Arc<Notify>,
) -> Option<RoundSummary> {
    let _ = state_tx.send(RoundState::Preparing);
    controller.prepare_round();
    controller.start();
    let _ = state_tx.send(controller.state().clone());

    let mut interval = tokio::time::interval(controller.settings().tick_interval);
    let mut last_summary = None;

    loop {
        tokio::select! {
            _ = shutdown.notified() => break,
            _ = interval.tick() => {}
        }

        while let Ok(ev) = input_rx.try_recv() {
            match ev {
                GameEvent::Action { player, action } => {
                    let outcome = controller.hero_action(player, action);
                    if !matches!(action, HeroAction::Move { .. }) {
                        debug!(player = player.number(), ?outcome, "hero action");
                    }
                }
                GameEvent::TogglePause => {
                    let _ = state_tx.send(controller.toggle_pause());
                }
                GameEvent::Reset => {
                    controller.reset_round().await;
                    last_summary = None;
                    let _ = state_tx.send(controller.state().clone());
                }
            }
        }

        if matches!(controller.state(), RoundState::Ended(_)) {
            continue;
        }

        let frame = controller.tick();
        let _ = frame_tx.send(frame);

        if let Some(end) = controller.check_end() {
            last_summary = Some(controller.finish(end).await);
            let _ = state_tx.send(RoundState::Ended(end));
        }
    }

    controller.stop().await;
    last_summary
}
