//! Data-driven game balance
//!
//! Every difficulty knob lives here so balance can be tweaked from JSON
//! without touching the simulation. `Tuning::default()` is the shipped game.

use serde::{Deserialize, Serialize};

/// Helicopter/jet spawn schedule: interval shrinks with score down to a floor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnSchedule {
    /// Interval at score 0 (ms)
    pub base_interval_ms: f32,
    /// Interval reduction per point of score (ms)
    pub interval_per_point_ms: f32,
    /// Interval floor (ms)
    pub min_interval_ms: f32,
}

impl SpawnSchedule {
    /// Countdown to the next spawn at the given score
    pub fn interval_ms(&self, score: u32) -> f32 {
        (self.base_interval_ms - score as f32 * self.interval_per_point_ms).max(self.min_interval_ms)
    }
}

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Minimum time between shots (ms)
    pub fire_cooldown_ms: f32,
    /// Time the wreck stays on screen before game over (ms)
    pub destroy_countdown_ms: f32,
    /// Landed troopers on one side that overrun the base
    pub stack_limit: usize,

    pub helicopter_schedule: SpawnSchedule,
    /// Helicopter speed = (base + score / divisor) * multiplier, in logical units per tick
    pub helicopter_speed_base: f32,
    pub helicopter_speed_divisor: f32,
    pub helicopter_speed_multiplier: f32,
    pub helicopter_health: u8,
    /// First trooper drop after spawning (uniform range, ms)
    pub helicopter_first_drop_ms: (f32, f32),
    /// Subsequent trooper drops (uniform range, ms)
    pub helicopter_drop_ms: (f32, f32),

    /// Jets only appear once the score exceeds this
    pub jet_unlock_score: u32,
    pub jet_schedule: SpawnSchedule,
    /// First jet countdown after a reset (uniform range, ms)
    pub jet_first_spawn_ms: (f32, f32),
    /// Jet speed = base + score / divisor
    pub jet_speed_base: f32,
    pub jet_speed_divisor: f32,
    pub jet_health: u8,
    pub jet_first_drop_ms: f32,
    pub jet_drop_ms: f32,

    /// Trooper fall speed = base + score / divisor
    pub trooper_fall_base: f32,
    pub trooper_fall_divisor: f32,
    /// Bomb fall speed = base + score / divisor
    pub bomb_fall_base: f32,
    pub bomb_fall_divisor: f32,

    pub points_trooper_chute: u32,
    pub points_trooper_freefall: u32,
    pub points_helicopter: u32,
    pub points_jet: u32,
    pub points_bomb: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            fire_cooldown_ms: 200.0,
            destroy_countdown_ms: 1000.0,
            stack_limit: 4,

            helicopter_schedule: SpawnSchedule {
                base_interval_ms: 4000.0,
                interval_per_point_ms: 5.0,
                min_interval_ms: 1000.0,
            },
            helicopter_speed_base: 1.0,
            helicopter_speed_divisor: 500.0,
            helicopter_speed_multiplier: 2.0,
            helicopter_health: 2,
            helicopter_first_drop_ms: (500.0, 1500.0),
            helicopter_drop_ms: (1000.0, 3000.0),

            jet_unlock_score: 150,
            jet_schedule: SpawnSchedule {
                base_interval_ms: 12000.0,
                interval_per_point_ms: 10.0,
                min_interval_ms: 3000.0,
            },
            jet_first_spawn_ms: (10000.0, 15000.0),
            jet_speed_base: 6.0,
            jet_speed_divisor: 1000.0,
            jet_health: 1,
            jet_first_drop_ms: 100.0,
            jet_drop_ms: 200.0,

            trooper_fall_base: 0.8,
            trooper_fall_divisor: 1000.0,
            bomb_fall_base: 4.0,
            bomb_fall_divisor: 800.0,

            points_trooper_chute: 5,
            points_trooper_freefall: 10,
            points_helicopter: 20,
            points_jet: 35,
            points_bomb: 15,
        }
    }
}

impl Tuning {
    /// Parse balance overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Helicopter speed magnitude in logical units per tick
    pub fn helicopter_speed(&self, score: u32) -> f32 {
        (self.helicopter_speed_base + score as f32 / self.helicopter_speed_divisor)
            * self.helicopter_speed_multiplier
    }

    /// Jet speed magnitude in logical units per tick
    pub fn jet_speed(&self, score: u32) -> f32 {
        self.jet_speed_base + score as f32 / self.jet_speed_divisor
    }

    pub fn trooper_fall_speed(&self, score: u32) -> f32 {
        self.trooper_fall_base + score as f32 / self.trooper_fall_divisor
    }

    pub fn bomb_fall_speed(&self, score: u32) -> f32 {
        self.bomb_fall_base + score as f32 / self.bomb_fall_divisor
    }
}
