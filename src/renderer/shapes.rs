//! Vector shapes for each entity type

use glam::Vec2;
use std::f32::consts::PI;

use super::{DrawCmd, Frame};
use crate::consts::*;
use crate::sim::{Aircraft, Bomb, Bullet, Color, Enemy, Particle, Player, Trooper};

/// Base, turret block and barrel
pub fn player(frame: &mut Frame, player: &Player, scale: f32) {
    let Vec2 { x, y } = player.pos;
    frame.rect(
        Vec2::new(x - BASE_WIDTH * scale / 2.0, y),
        Vec2::new(BASE_WIDTH, BASE_HEIGHT) * scale,
        Color::White,
    );
    frame.rect(
        Vec2::new(x - TURRET_WIDTH * scale / 2.0, y - TURRET_HEIGHT * scale),
        Vec2::new(TURRET_WIDTH, TURRET_HEIGHT) * scale,
        Color::Magenta,
    );
    frame.push(DrawCmd::Line {
        from: player.pivot(scale),
        to: player.muzzle(scale),
        width: 4.0 * scale,
        color: Color::Cyan,
    });
}

pub fn bullet(frame: &mut Frame, bullet: &Bullet, scale: f32) {
    frame.rect(bullet.pos - Vec2::splat(scale), Vec2::splat(3.0 * scale), Color::White);
}

pub fn enemy(frame: &mut Frame, enemy: &Enemy, scale: f32) {
    match enemy {
        Enemy::Helicopter(a) => helicopter(frame, a, scale),
        Enemy::Jet(a) => jet(frame, a),
        Enemy::Trooper(t) => trooper(frame, t, scale),
        Enemy::Bomb(b) => bomb(frame, b, scale),
    }
}

/// Body, tail boom and rotor
pub fn helicopter(frame: &mut Frame, heli: &Aircraft, scale: f32) {
    let Vec2 { x, y } = heli.pos;
    let w = heli.size.x;
    frame.rect(heli.pos, Vec2::new(w, heli.size.y * 0.6), Color::White);
    frame.rect(
        Vec2::new(x - 10.0 * scale, y + 5.0 * scale),
        Vec2::new(10.0, 5.0) * scale,
        Color::White,
    );
    frame.rect(
        Vec2::new(x + w / 2.0 - 15.0 * scale, y - 5.0 * scale),
        Vec2::new(30.0, 5.0) * scale,
        Color::Magenta,
    );
}

/// Chevron whose long edge points the way the jet is flying
pub fn jet(frame: &mut Frame, jet: &Aircraft) {
    let Vec2 { x, y } = jet.pos;
    let (w, h) = (jet.size.x, jet.size.y);
    let mid = y + h / 2.0;
    let points = if jet.speed > 0.0 {
        vec![
            Vec2::new(x, mid),
            Vec2::new(x + w, mid),
            Vec2::new(x + w * 0.8, y),
            Vec2::new(x + w * 0.2, y),
        ]
    } else {
        vec![
            Vec2::new(x + w, mid),
            Vec2::new(x, mid),
            Vec2::new(x + w * 0.2, y),
            Vec2::new(x + w * 0.8, y),
        ]
    };
    frame.push(DrawCmd::Polygon {
        points,
        color: Color::Cyan,
    });
}

/// Falling trooper: canopy and cords while the chute is open, then the figure
pub fn trooper(frame: &mut Frame, trooper: &Trooper, scale: f32) {
    let Vec2 { x, y } = trooper.pos;
    let body_y = y + 20.0 * scale;
    if trooper.has_chute {
        let canopy = Vec2::new(x, y + 10.0 * scale);
        frame.push(DrawCmd::Arc {
            center: canopy,
            radius: 15.0 * scale,
            start: PI,
            end: 0.0,
            color: Color::Cyan,
        });
        for side in [-1.0, 1.0] {
            frame.push(DrawCmd::Line {
                from: Vec2::new(x, body_y),
                to: Vec2::new(x + side * 10.0 * scale, canopy.y),
                width: scale,
                color: Color::White,
            });
        }
    }
    figure(frame, Vec2::new(x, body_y), scale);
}

/// Grounded trooper; its position is already the body anchor
pub fn landed_trooper(frame: &mut Frame, trooper: &Trooper, scale: f32) {
    figure(frame, trooper.pos, scale);
}

/// Torso, head and two legs hanging off `body`
fn figure(frame: &mut Frame, body: Vec2, scale: f32) {
    let Vec2 { x, y } = body;
    frame.rect(Vec2::new(x - 2.0 * scale, y), Vec2::new(4.0, 10.0) * scale, Color::Cyan);
    frame.rect(
        Vec2::new(x - 2.0 * scale, y - 4.0 * scale),
        Vec2::splat(4.0 * scale),
        Color::Cyan,
    );
    frame.rect(
        Vec2::new(x - 4.0 * scale, y + 10.0 * scale),
        Vec2::new(2.0, 8.0) * scale,
        Color::Cyan,
    );
    frame.rect(
        Vec2::new(x + 2.0 * scale, y + 10.0 * scale),
        Vec2::new(2.0, 8.0) * scale,
        Color::Cyan,
    );
}

pub fn bomb(frame: &mut Frame, bomb: &Bomb, scale: f32) {
    frame.rect(bomb.pos, bomb.size, Color::White);
    frame.rect(bomb.pos, Vec2::new(bomb.size.x, 2.0 * scale), Color::Magenta);
}

/// One scaled pixel, snapped to the pixel grid
pub fn particle(frame: &mut Frame, particle: &Particle, scale: f32) {
    frame.rect(particle.pos.floor(), Vec2::splat(scale), particle.color);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jet_with_speed(speed: f32) -> Aircraft {
        Aircraft {
            pos: Vec2::new(100.0, 50.0),
            size: Vec2::new(70.0, 20.0),
            speed,
            drop_timer_ms: 200.0,
            health: 1,
        }
    }

    fn polygon(frame: &Frame) -> &[Vec2] {
        match &frame.commands[0] {
            DrawCmd::Polygon { points, .. } => points,
            other => panic!("expected a polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_jet_chevron_follows_heading() {
        let mut right = Frame::default();
        jet(&mut right, &jet_with_speed(6.0));
        assert_eq!(polygon(&right)[0], Vec2::new(100.0, 60.0));
        assert_eq!(polygon(&right)[2], Vec2::new(156.0, 50.0));

        let mut left = Frame::default();
        jet(&mut left, &jet_with_speed(-6.0));
        assert_eq!(polygon(&left)[0], Vec2::new(170.0, 60.0));
        assert_eq!(polygon(&left)[2], Vec2::new(114.0, 50.0));
    }

    #[test]
    fn test_landed_trooper_has_no_chute() {
        let trooper = Trooper {
            pos: Vec2::new(350.0, 560.0),
            size: Vec2::new(10.0, 40.0),
            speed_y: 0.8,
            has_chute: true,
        };
        let mut frame = Frame::default();
        landed_trooper(&mut frame, &trooper, 1.0);
        assert_eq!(frame.len(), 4);
        assert!(
            frame
                .commands
                .iter()
                .all(|c| matches!(c, DrawCmd::Rect { color: Color::Cyan, .. }))
        );
    }

    #[test]
    fn test_bomb_highlight_strip_scales() {
        let b = Bomb {
            pos: Vec2::new(10.0, 20.0),
            size: Vec2::new(16.0, 24.0),
            speed_y: 8.0,
        };
        let mut frame = Frame::default();
        bomb(&mut frame, &b, 2.0);
        assert_eq!(
            frame.commands[1],
            DrawCmd::Rect {
                pos: Vec2::new(10.0, 20.0),
                size: Vec2::new(16.0, 4.0),
                color: Color::Magenta,
            }
        );
    }

    #[test]
    fn test_particle_snaps_to_grid() {
        let p = Particle {
            pos: Vec2::new(10.7, 3.2),
            vel: Vec2::ZERO,
            life: 5,
            color: Color::White,
        };
        let mut frame = Frame::default();
        particle(&mut frame, &p, 1.5);
        assert_eq!(
            frame.commands[0],
            DrawCmd::Rect {
                pos: Vec2::new(10.0, 3.0),
                size: Vec2::splat(1.5),
                color: Color::White,
            }
        );
    }
}
