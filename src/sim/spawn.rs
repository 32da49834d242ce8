//! Enemy spawner
//!
//! Helicopters and jets come from two countdowns that shrink as the score
//! grows; troopers and bombs are released by the aircraft themselves.

use glam::Vec2;
use rand::Rng;

use super::state::{Aircraft, Bomb, Enemy, GameState, Trooper};
use crate::consts::*;

/// Run both spawn countdowns for one tick, returning any new aircraft
pub fn run_spawners(state: &mut GameState, dt_ms: f32) -> Vec<Enemy> {
    let mut spawned = Vec::new();

    state.helicopter_timer_ms -= dt_ms;
    if state.helicopter_timer_ms <= 0.0 {
        spawned.push(spawn_helicopter(state));
        state.helicopter_timer_ms = state.tuning.helicopter_schedule.interval_ms(state.score);
    }

    if state.score > state.tuning.jet_unlock_score {
        state.jet_timer_ms -= dt_ms;
        if state.jet_timer_ms <= 0.0 {
            spawned.push(spawn_jet(state));
            state.jet_timer_ms = state.tuning.jet_schedule.interval_ms(state.score);
        }
    }

    spawned
}

/// Pick a travel direction: +1 enters from the left, -1 from the right
fn random_direction(state: &mut GameState) -> f32 {
    if state.rng.random_bool(0.5) { 1.0 } else { -1.0 }
}

/// Helicopter entering from the edge opposite its travel direction,
/// somewhere in the top quarter of the sky
pub fn spawn_helicopter(state: &mut GameState) -> Enemy {
    let vp = state.viewport;
    let direction = random_direction(state);
    let size = Vec2::new(vp.px(HELICOPTER_WIDTH), vp.px(HELICOPTER_HEIGHT));
    let x = if direction > 0.0 {
        -vp.px(HELICOPTER_ENTRY_MARGIN)
    } else {
        vp.width + vp.px(HELICOPTER_ENTRY_MARGIN) - size.x
    };
    let y = state.rng.random_range(0.05f32..0.25) * vp.height;

    Enemy::Helicopter(Aircraft {
        pos: Vec2::new(x, y),
        size,
        speed: vp.px(state.tuning.helicopter_speed(state.score)) * direction,
        drop_timer_ms: uniform(&mut state.rng, state.tuning.helicopter_first_drop_ms),
        health: state.tuning.helicopter_health,
    })
}

/// Jet on a bombing run from a random side
pub fn spawn_jet(state: &mut GameState) -> Enemy {
    let vp = state.viewport;
    let direction = random_direction(state);
    let x = if direction > 0.0 {
        -vp.px(JET_ENTRY_MARGIN)
    } else {
        vp.width + vp.px(JET_ENTRY_MARGIN)
    };
    let y = state.rng.random_range(0.05f32..0.20) * vp.height;

    Enemy::Jet(Aircraft {
        pos: Vec2::new(x, y),
        size: Vec2::new(vp.px(JET_WIDTH), vp.px(JET_HEIGHT)),
        speed: vp.px(state.tuning.jet_speed(state.score)) * direction,
        drop_timer_ms: state.tuning.jet_first_drop_ms,
        health: state.tuning.jet_health,
    })
}

/// Trooper stepping out under an aircraft
pub fn spawn_trooper(state: &GameState, at: Vec2) -> Enemy {
    let vp = state.viewport;
    Enemy::Trooper(Trooper {
        pos: at,
        size: Vec2::new(vp.px(TROOPER_WIDTH), vp.px(TROOPER_HEIGHT)),
        speed_y: vp.px(state.tuning.trooper_fall_speed(state.score)),
        has_chute: true,
    })
}

pub fn spawn_bomb(state: &GameState, at: Vec2) -> Enemy {
    let vp = state.viewport;
    Enemy::Bomb(Bomb {
        pos: at,
        size: Vec2::new(vp.px(BOMB_WIDTH), vp.px(BOMB_HEIGHT)),
        speed_y: vp.px(state.tuning.bomb_fall_speed(state.score)),
    })
}

/// Uniform sample in [lo, hi), tolerating a degenerate range
pub fn uniform(rng: &mut impl Rng, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}
