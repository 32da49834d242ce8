//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected, seeded RNG only
//! - Stable iteration order (insertion order of the entity lists)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionReport, Hit, HitBox};
pub use state::{
    Aircraft, Bomb, Bullet, Color, Enemy, GameEvent, GameMode, GameState, LandedStacks, Particle,
    Player, Side, Trooper,
};
pub use tick::{TickInput, tick};
