//! Fixed timestep simulation tick
//!
//! Advances the game by one update step. The order of the passes below is
//! observable (a trooper released this tick does not fall until the next one,
//! bombs that hit the ground are gone before the player check) and must not be
//! shuffled.

use glam::Vec2;

use super::collision::{self, Hit};
use super::spawn::{run_spawners, spawn_bomb, spawn_trooper, uniform};
use super::state::{Bullet, Color, Enemy, GameEvent, GameMode, GameState, Side};
use crate::audio::Cue;
use crate::clamp_aim;
use crate::consts::*;
use crate::input::Controls;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub rotate_left: bool,
    pub rotate_right: bool,
    /// Fire key held or a pointer tap this tick
    pub fire: bool,
    /// Absolute barrel angle from a pointer tap
    pub aim: Option<f32>,
    /// Leave Title/GameOver
    pub start: bool,
}

impl From<&Controls> for TickInput {
    fn from(controls: &Controls) -> Self {
        Self {
            rotate_left: controls.rotate_left,
            rotate_right: controls.rotate_right,
            fire: controls.fire_held || controls.fire_requested,
            aim: controls.aim,
            start: controls.start_requested,
        }
    }
}

/// Something an aircraft let go of this tick
enum Release {
    Trooper(Vec2),
    Bomb(Vec2),
}

/// Advance the game state by one timestep of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if !state.is_playing() {
        if input.start {
            start_game(state);
        }
        return;
    }

    // Wreck countdown; the world holds still until it runs out
    if state.player.destroyed {
        state.player.destroy_timer_ms -= dt_ms;
        if state.player.destroy_timer_ms <= 0.0 {
            end_game(state);
        }
        return;
    }

    steer(state, input);
    fire(state, input, dt_ms);
    advance_bullets(state);

    let mut staged = run_spawners(state, dt_ms);
    fly_aircraft(state, dt_ms, &mut staged);
    land_troopers(state);
    drop_bombs(state);
    state.enemies.extend(staged);

    advance_particles(state);
    resolve_hits(state);

    if !state.player.destroyed
        && collision::bomb_hits_player(&state.player, &state.enemies, state.viewport.scale)
    {
        state.destroy_player();
    }
}

fn set_mode(state: &mut GameState, mode: GameMode) {
    state.mode = mode;
    state.events.push(GameEvent::ModeChanged(mode));
}

fn start_game(state: &mut GameState) {
    state.reset();
    set_mode(state, GameMode::Playing);
    log::info!("New game started");
}

fn end_game(state: &mut GameState) {
    set_mode(state, GameMode::GameOver);
    if state.high_score.record(state.score) {
        state.events.push(GameEvent::NewHighScore(state.score));
    }
    state.emit(Cue::GameOver);
    log::info!(
        "Game over: score {}, high score {}",
        state.score,
        state.high_score.best
    );
}

/// Pointer aim first, then held rotation, then the horizon clamp
fn steer(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;
    if let Some(angle) = input.aim {
        player.angle = angle;
    }
    if input.rotate_left {
        player.angle -= ROTATION_SPEED;
    }
    if input.rotate_right {
        player.angle += ROTATION_SPEED;
    }
    player.angle = clamp_aim(player.angle);
}

fn fire(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    state.fire_cooldown_ms = (state.fire_cooldown_ms - dt_ms).max(0.0);
    if !input.fire || state.fire_cooldown_ms > 0.0 {
        return;
    }

    let scale = state.viewport.scale;
    state.bullets.push(Bullet {
        pos: state.player.muzzle(scale),
        vel: state.player.aim_dir() * MUZZLE_SPEED * scale,
    });
    state.fire_cooldown_ms = state.tuning.fire_cooldown_ms;
    state.emit(Cue::Shoot);
}

fn advance_bullets(state: &mut GameState) {
    let vp = state.viewport;
    for bullet in &mut state.bullets {
        bullet.pos += bullet.vel;
    }
    state.bullets.retain(|b| vp.contains(b.pos));
}

/// Move aircraft, run their release timers, retire the ones far off screen
fn fly_aircraft(state: &mut GameState, dt_ms: f32, staged: &mut Vec<Enemy>) {
    let vp = state.viewport;
    let margin = vp.px(EXIT_MARGIN);
    let helicopter_drop = state.tuning.helicopter_drop_ms;
    let jet_drop = state.tuning.jet_drop_ms;
    let mut releases = Vec::new();

    for enemy in &mut state.enemies {
        match enemy {
            Enemy::Helicopter(a) => {
                a.pos.x += a.speed;
                a.drop_timer_ms -= dt_ms;
                if a.drop_timer_ms <= 0.0 {
                    releases.push(Release::Trooper(Vec2::new(
                        a.pos.x + a.size.x / 2.0,
                        a.pos.y + a.size.y,
                    )));
                    a.drop_timer_ms = uniform(&mut state.rng, helicopter_drop);
                }
            }
            Enemy::Jet(a) => {
                a.pos.x += a.speed;
                a.drop_timer_ms -= dt_ms;
                if a.drop_timer_ms <= 0.0 {
                    releases.push(Release::Bomb(Vec2::new(a.pos.x, a.pos.y + a.size.y)));
                    a.drop_timer_ms = jet_drop;
                }
            }
            Enemy::Trooper(_) | Enemy::Bomb(_) => {}
        }
    }

    state.enemies.retain(|enemy| match enemy {
        Enemy::Helicopter(a) | Enemy::Jet(a) => a.pos.x >= -margin && a.pos.x <= vp.width + margin,
        _ => true,
    });

    for release in releases {
        staged.push(match release {
            Release::Trooper(at) => spawn_trooper(state, at),
            Release::Bomb(at) => spawn_bomb(state, at),
        });
    }
}

/// Fall troopers and stack the ones that reached the landing line
fn land_troopers(state: &mut GameState) {
    let vp = state.viewport;
    let landing_y = vp.landing_y();
    let landed = &mut state.landed;
    let mut landings = 0;

    state.enemies.retain_mut(|enemy| {
        let Enemy::Trooper(trooper) = enemy else {
            return true;
        };
        trooper.pos.y += trooper.speed_y;
        if trooper.pos.y <= landing_y {
            return true;
        }

        let side = if trooper.pos.x < vp.center_x() { Side::Left } else { Side::Right };
        let stack = landed.side_mut(side);
        let depth = stack.len() as f32;
        let offset = vp.px(BASE_WIDTH / 2.0 + depth * STACK_STEP_X + STACK_GAP);
        trooper.pos.x = match side {
            Side::Left => vp.center_x() - offset,
            Side::Right => vp.center_x() + offset,
        };
        trooper.pos.y = vp.ground_y() - vp.px(depth * STACK_STEP_Y) - vp.px(LANDING_OFFSET);
        trooper.has_chute = false;
        stack.push(trooper.clone());
        landings += 1;
        false
    });

    for _ in 0..landings {
        state.emit(Cue::Land);
    }
    if state.landed.overrun(state.tuning.stack_limit) {
        state.destroy_player();
    }
}

/// Fall bombs; the ones that reached the ground burst and vanish.
///
/// A bomb landing on the base also takes the turret with it, however far it
/// fell this tick.
fn drop_bombs(state: &mut GameState) {
    let vp = state.viewport;
    let ground_y = vp.ground_y();
    let mut impacts = Vec::new();

    state.enemies.retain_mut(|enemy| {
        let Enemy::Bomb(bomb) = enemy else {
            return true;
        };
        bomb.pos.y += bomb.speed_y;
        if bomb.pos.y > ground_y {
            impacts.push(bomb.pos.x);
            false
        } else {
            true
        }
    });

    let burst_y = vp.height - vp.px(BASE_HEIGHT) / 2.0;
    for x in impacts {
        state.explode(Vec2::new(x, burst_y), Color::White, 20);
        state.emit(Cue::Explosion);
        if collision::over_base(&state.player, x, vp.scale) {
            state.destroy_player();
        }
    }
}

fn advance_particles(state: &mut GameState) {
    for particle in &mut state.particles {
        particle.pos += particle.vel;
        particle.life = particle.life.saturating_sub(1);
    }
    state.particles.retain(|p| p.life > 0);
}

/// Bullets against enemies: score, effects, then removal
fn resolve_hits(state: &mut GameState) {
    let report = collision::resolve_bullet_hits(&state.bullets, &mut state.enemies);
    collision::compact(&mut state.bullets, &report.spent_bullets);
    collision::compact(&mut state.enemies, &report.dead_enemies);

    let tuning = &state.tuning;
    let (chute, freefall) = (tuning.points_trooper_chute, tuning.points_trooper_freefall);
    let (helicopter, jet_points, bomb) = (tuning.points_helicopter, tuning.points_jet, tuning.points_bomb);
    for hit in report.hits {
        let gained = match hit {
            Hit::Trooper { at, had_chute } => {
                state.explode(at, Color::Cyan, 20);
                if had_chute {
                    state.emit(Cue::HitChute);
                    chute
                } else {
                    state.emit(Cue::Explosion);
                    freefall
                }
            }
            Hit::Aircraft {
                impact,
                center,
                jet,
                destroyed,
            } => {
                state.explode(impact, Color::White, 10);
                if !destroyed {
                    0
                } else {
                    state.explode(center, Color::Magenta, 40);
                    state.emit(Cue::Explosion);
                    if jet { jet_points } else { helicopter }
                }
            }
            Hit::Bomb { at } => {
                state.explode(at, Color::White, 15);
                state.emit(Cue::Explosion);
                bomb
            }
        };
        state.score = state.score.saturating_add(gained);
    }
}
