//! Collision detection
//!
//! Bullets are points; enemies are axis-aligned boxes whose geometry depends
//! on the enemy type. Hits are resolved mark-and-compact: the pass flags
//! spent bullets and dead enemies, and the caller removes them afterwards so
//! no index shifts under an ongoing scan.

use glam::Vec2;

use super::state::{Aircraft, Bullet, Enemy, Player};
use crate::consts::*;

/// Axis-aligned box, open on every edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitBox {
    pub min: Vec2,
    pub max: Vec2,
}

impl HitBox {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Strict containment: touching an edge is a miss
    pub fn contains(&self, p: Vec2) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }
}

/// Hit box for an enemy.
///
/// Troopers are centered horizontally on `pos.x` and the box reaches a full
/// figure height above and below `pos.y` (chute canopy and legs); every other
/// enemy is a plain box anchored at its top-left corner.
pub fn enemy_hitbox(enemy: &Enemy) -> HitBox {
    match enemy {
        Enemy::Trooper(t) => HitBox::new(
            Vec2::new(t.pos.x - t.size.x / 2.0, t.pos.y - t.size.y),
            Vec2::new(t.pos.x + t.size.x / 2.0, t.pos.y + t.size.y),
        ),
        Enemy::Helicopter(a) | Enemy::Jet(a) => HitBox::new(a.pos, a.pos + a.size),
        Enemy::Bomb(b) => HitBox::new(b.pos, b.pos + b.size),
    }
}

/// Outcome of one bullet striking one enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    /// Trooper removed
    Trooper { at: Vec2, had_chute: bool },
    /// Aircraft lost one health point; `destroyed` once it reached zero
    Aircraft {
        impact: Vec2,
        center: Vec2,
        jet: bool,
        destroyed: bool,
    },
    /// Bomb shot out of the sky
    Bomb { at: Vec2 },
}

/// Result of the bullets-vs-enemies pass
#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    /// Parallel to the bullet slice
    pub spent_bullets: Vec<bool>,
    /// Parallel to the enemy slice
    pub dead_enemies: Vec<bool>,
    /// Hits in resolution order
    pub hits: Vec<Hit>,
}

/// Resolve every bullet against every live enemy.
///
/// Each bullet is consumed by the first enemy it overlaps in iteration order.
/// Aircraft health is decremented in place, so a second bullet in the same
/// pass sees the damaged aircraft; an aircraft is flagged dead in the same
/// step that takes its health to zero.
pub fn resolve_bullet_hits(bullets: &[Bullet], enemies: &mut [Enemy]) -> CollisionReport {
    let mut report = CollisionReport {
        spent_bullets: vec![false; bullets.len()],
        dead_enemies: vec![false; enemies.len()],
        hits: Vec::new(),
    };

    for (bi, bullet) in bullets.iter().enumerate() {
        for (ei, enemy) in enemies.iter_mut().enumerate() {
            if report.dead_enemies[ei] || !enemy_hitbox(enemy).contains(bullet.pos) {
                continue;
            }

            report.spent_bullets[bi] = true;
            let hit = match enemy {
                Enemy::Trooper(t) => {
                    report.dead_enemies[ei] = true;
                    Hit::Trooper {
                        at: t.pos,
                        had_chute: t.has_chute,
                    }
                }
                Enemy::Helicopter(a) => strike(a, bullet.pos, false),
                Enemy::Jet(a) => strike(a, bullet.pos, true),
                Enemy::Bomb(b) => {
                    report.dead_enemies[ei] = true;
                    Hit::Bomb { at: b.pos }
                }
            };
            if let Hit::Aircraft { destroyed: true, .. } = hit {
                report.dead_enemies[ei] = true;
            }
            report.hits.push(hit);
            break;
        }
    }

    report
}

/// Take one health point off an aircraft
fn strike(aircraft: &mut Aircraft, impact: Vec2, jet: bool) -> Hit {
    aircraft.health = aircraft.health.saturating_sub(1);
    Hit::Aircraft {
        impact,
        center: aircraft.pos + aircraft.size / 2.0,
        jet,
        destroyed: aircraft.health == 0,
    }
}

/// True if any falling bomb has reached the base's footprint
pub fn bomb_hits_player(player: &Player, enemies: &[Enemy], scale: f32) -> bool {
    let top = player.pos.y - BASE_HEIGHT * scale / 2.0;
    enemies.iter().any(|enemy| match enemy {
        Enemy::Bomb(b) => over_base(player, b.pos.x, scale) && b.pos.y > top,
        _ => false,
    })
}

/// Whether `x` lies strictly inside the base's horizontal footprint
pub fn over_base(player: &Player, x: f32, scale: f32) -> bool {
    let half_width = BASE_WIDTH * scale / 2.0;
    x > player.pos.x - half_width && x < player.pos.x + half_width
}

/// Remove the flagged items, preserving the order of the rest
pub fn compact<T>(items: &mut Vec<T>, dead: &[bool]) {
    let mut index = 0;
    items.retain(|_| {
        let keep = !dead.get(index).copied().unwrap_or(false);
        index += 1;
        keep
    });
}
