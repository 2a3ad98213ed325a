use crate::domain::geometry::{HasCollisionRect, MoveBounds};
use crate::domain::state::{Hero, Obstacle};

#[derive(Debug, Clone, Copy)]
pub struct MovementConfig {
    pub bounds: MoveBounds,
    pub step: i32, // px per action, per axis
}

/// Applies one move request, x axis first, then y. Each axis is undone on its
/// own when it runs into an obstacle, so a hero pressed against a wall still
/// slides along it. Returns whether the hero ended up somewhere new.
pub fn move_hero(hero: &mut Hero, dx: i32, dy: i32, obstacles: &[Obstacle], cfg: MovementConfig) -> bool {
    let dx = clamp_axis(hero.rect.x, dx.clamp(-cfg.step, cfg.step), cfg.bounds.min_x, cfg.bounds.max_x);
    let dy = clamp_axis(hero.rect.y, dy.clamp(-cfg.step, cfg.step), cfg.bounds.min_y, cfg.bounds.max_y);

    let moved_x = step_axis(hero, dx, 0, obstacles);
    let moved_y = step_axis(hero, 0, dy, obstacles);
    moved_x || moved_y
}

fn step_axis(hero: &mut Hero, dx: i32, dy: i32, obstacles: &[Obstacle]) -> bool {
    if dx == 0 && dy == 0 {
        return false;
    }
    let previous = hero.rect;
    hero.rect = previous.translated(dx, dy);
    if obstacles.iter().any(|o| hero.collides_with(o)) {
        hero.rect = previous;
        return false;
    }
    true
}

// An axis step that would touch either bound is dropped entirely.
fn clamp_axis(pos: i32, delta: i32, min: f64, max: f64) -> i32 {
    let next = f64::from(pos + delta);
    if next <= min || next >= max { 0 } else { delta }
}
