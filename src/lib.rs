//! Paratrooper - anti-air turret arcade game
//!
//! Core modules:
//! - `sim`: Simulation (entity store, spawner, collisions, update step)
//! - `engine`: Owns the simulation, input, persistence and frame scheduler
//! - `renderer`: Stateless draw-list generation plus the canvas backend
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod engine;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod viewport;

pub use engine::Engine;
pub use highscores::HighScore;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;
pub use viewport::Viewport;

use std::f32::consts::PI;

/// Game configuration constants, in logical units (multiply by the viewport scale)
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz, one tick per display refresh)
    pub const TICK_MS: f32 = 1000.0 / 60.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the driver will account for (backgrounded tabs)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Logical playfield width; the scale factor maps it to drawn pixels
    pub const LOGICAL_WIDTH: f32 = 800.0;
    pub const ASPECT_RATIO: f32 = 4.0 / 3.0;

    /// Player base and turret
    pub const BASE_WIDTH: f32 = 80.0;
    pub const BASE_HEIGHT: f32 = 30.0;
    pub const TURRET_WIDTH: f32 = 10.0;
    pub const TURRET_HEIGHT: f32 = 20.0;
    pub const BARREL_LENGTH: f32 = 40.0;
    /// Radians per tick while a rotate key is held
    pub const ROTATION_SPEED: f32 = 0.05;
    /// Bullet speed per tick
    pub const MUZZLE_SPEED: f32 = 15.0;

    /// Enemy sizes
    pub const HELICOPTER_WIDTH: f32 = 60.0;
    pub const HELICOPTER_HEIGHT: f32 = 25.0;
    pub const JET_WIDTH: f32 = 70.0;
    pub const JET_HEIGHT: f32 = 20.0;
    pub const TROOPER_WIDTH: f32 = 10.0;
    pub const TROOPER_HEIGHT: f32 = 40.0;
    pub const BOMB_WIDTH: f32 = 8.0;
    pub const BOMB_HEIGHT: f32 = 12.0;

    /// How far outside the edge aircraft appear
    pub const HELICOPTER_ENTRY_MARGIN: f32 = 50.0;
    pub const JET_ENTRY_MARGIN: f32 = 60.0;
    /// How far outside the edge aircraft are retired
    pub const EXIT_MARGIN: f32 = 100.0;

    /// Troopers land this far above the ground line
    pub const LANDING_OFFSET: f32 = 10.0;
    /// Per-depth offsets of a landed-trooper stack
    pub const STACK_STEP_X: f32 = 10.0;
    pub const STACK_STEP_Y: f32 = 15.0;
    /// Gap between the base and the first landed trooper
    pub const STACK_GAP: f32 = 10.0;

    /// Particle lifetime in ticks
    pub const PARTICLE_LIFE: u32 = 30;
    /// Particle velocity jitter (per axis, total range)
    pub const PARTICLE_SPREAD: f32 = 4.0;
}

/// Clamp a turret angle into [-π, 0] (never aiming below the horizon).
///
/// Angles below the horizon snap to whichever horizontal is nearer.
#[inline]
pub fn clamp_aim(angle: f32) -> f32 {
    if angle > 0.0 {
        if angle > PI / 2.0 { -PI } else { 0.0 }
    } else {
        angle.max(-PI)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_aim_passes_valid_angles() {
        assert_eq!(clamp_aim(-PI / 2.0), -PI / 2.0);
        assert_eq!(clamp_aim(0.0), 0.0);
        assert_eq!(clamp_aim(-PI), -PI);
    }

    #[test]
    fn test_clamp_aim_snaps_to_nearest_horizontal() {
        assert_eq!(clamp_aim(0.3), 0.0);
        assert_eq!(clamp_aim(PI - 0.3), -PI);
        assert_eq!(clamp_aim(-4.0), -PI);
    }
}
