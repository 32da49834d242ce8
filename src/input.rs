//! Input adapter
//!
//! Translates raw key codes and pointer positions into intents. Nothing is
//! queued: held keys are flags, and fire/start/aim are one-shot values that
//! the engine clears after each tick.

use glam::Vec2;

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    RotateLeft,
    RotateRight,
    Fire,
    Start,
    Mute,
}

impl Key {
    /// Map a `KeyboardEvent.code` value
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(Key::RotateLeft),
            "ArrowRight" | "KeyD" => Some(Key::RotateRight),
            "Space" => Some(Key::Fire),
            "Enter" | "NumpadEnter" => Some(Key::Start),
            "KeyM" => Some(Key::Mute),
            _ => None,
        }
    }

    /// Keys whose browser default (scrolling) must be suppressed
    pub fn prevents_default(&self) -> bool {
        matches!(self, Key::Fire | Key::RotateLeft | Key::RotateRight)
    }
}

/// Latest input state between ticks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Controls {
    pub rotate_left: bool,
    pub rotate_right: bool,
    /// Fire key held
    pub fire_held: bool,
    /// One-shot fire from a pointer tap
    pub fire_requested: bool,
    /// One-shot absolute aim from a pointer tap
    pub aim: Option<f32>,
    /// One-shot request to leave Title/GameOver
    pub start_requested: bool,
}

impl Controls {
    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::RotateLeft => self.rotate_left = true,
            Key::RotateRight => self.rotate_right = true,
            Key::Fire => self.fire_held = true,
            Key::Start | Key::Mute => {}
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::RotateLeft => self.rotate_left = false,
            Key::RotateRight => self.rotate_right = false,
            Key::Fire => self.fire_held = false,
            Key::Start | Key::Mute => {}
        }
    }

    /// Forget one-shot intents once a tick has consumed them
    pub fn clear_one_shots(&mut self) {
        self.fire_requested = false;
        self.aim = None;
        self.start_requested = false;
    }

    /// Drop everything, e.g. when the page loses focus mid-hold
    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}

/// Turret angle pointing from the pivot at the pointer (screen y grows downward)
pub fn aim_toward(pivot: Vec2, pointer: Vec2) -> f32 {
    let d = pointer - pivot;
    d.y.atan2(d.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code("ArrowLeft"), Some(Key::RotateLeft));
        assert_eq!(Key::from_code("KeyA"), Some(Key::RotateLeft));
        assert_eq!(Key::from_code("KeyD"), Some(Key::RotateRight));
        assert_eq!(Key::from_code("Space"), Some(Key::Fire));
        assert_eq!(Key::from_code("Enter"), Some(Key::Start));
        assert_eq!(Key::from_code("KeyQ"), None);
    }

    #[test]
    fn test_held_keys_and_one_shots() {
        let mut c = Controls::default();
        c.key_down(Key::Fire);
        c.key_down(Key::RotateLeft);
        c.fire_requested = true;
        c.aim = Some(-1.0);
        c.clear_one_shots();
        assert!(c.fire_held);
        assert!(c.rotate_left);
        assert!(!c.fire_requested);
        assert_eq!(c.aim, None);

        c.key_up(Key::Fire);
        assert!(!c.fire_held);
    }

    #[test]
    fn test_aim_toward() {
        let pivot = Vec2::new(400.0, 500.0);
        assert!((aim_toward(pivot, Vec2::new(400.0, 100.0)) + PI / 2.0).abs() < 1e-6);
        assert!(aim_toward(pivot, Vec2::new(700.0, 500.0)).abs() < 1e-6);
        // Up and to the left
        let a = aim_toward(pivot, Vec2::new(100.0, 200.0));
        assert!(a < -PI / 2.0 && a > -PI);
    }
}
