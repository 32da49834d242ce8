//! Game engine
//!
//! Owns the simulation state, the latest input, the session settings, the
//! high-score store and the frame scheduler. The platform layer feeds it raw
//! events and timestamps and gets back audio cues and a draw list.

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::audio::Cue;
use crate::highscores::HighScore;
use crate::input::{Controls, Key, aim_toward};
use crate::persistence::KeyValueStore;
use crate::renderer::{self, Frame};
use crate::scheduler::FixedStep;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameMode, GameState, TickInput, tick};
use crate::tuning::Tuning;
use crate::viewport::Viewport;

pub struct Engine {
    state: GameState,
    controls: Controls,
    settings: Settings,
    store: Box<dyn KeyValueStore>,
    scheduler: FixedStep,
}

impl Engine {
    /// Build an engine; the stored high score is read once here
    pub fn new(
        viewport: Viewport,
        tuning: Tuning,
        settings: Settings,
        rng: Pcg32,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let mut state = GameState::new(viewport, tuning, rng);
        state.high_score = HighScore::load(store.as_ref());
        state.max_particles = settings.max_particles();

        Self {
            state,
            controls: Controls::default(),
            settings,
            store,
            scheduler: FixedStep::default(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Handle a `keydown` code. Returns the mapped key so the caller can
    /// decide whether to suppress the browser default.
    pub fn key_down(&mut self, code: &str) -> Option<Key> {
        let key = Key::from_code(code)?;
        match key {
            Key::Mute => {
                self.settings.toggle_mute();
                log::info!("Sound {}", if self.settings.muted { "muted" } else { "on" });
            }
            Key::Start if !self.state.is_playing() => {
                self.controls.start_requested = true;
            }
            // Only a fresh press; a fire key still held from the last game
            // must not skip the game over screen
            Key::Fire if !self.state.is_playing() && !self.controls.fire_held => {
                self.controls.start_requested = true;
            }
            _ => {}
        }
        self.controls.key_down(key);
        Some(key)
    }

    pub fn key_up(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.controls.key_up(key);
        }
    }

    /// Pointer or touch press at canvas-relative pixel coordinates.
    ///
    /// In play this aims at the point and fires once; otherwise it starts a
    /// new game.
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        if !self.state.is_playing() {
            self.controls.start_requested = true;
            return;
        }
        if self.state.player.destroyed {
            return;
        }
        let pivot = self.state.player.pivot(self.state.viewport.scale);
        self.controls.aim = Some(aim_toward(pivot, Vec2::new(x, y)));
        self.controls.fire_requested = true;
    }

    /// Page lost focus: forget held keys so nothing stays stuck down
    pub fn blur(&mut self) {
        self.controls.release_all();
    }

    /// Refit the playfield to the available area.
    ///
    /// Live entities keep their pixel coordinates; the turret is re-anchored
    /// to the new ground line.
    pub fn resize(&mut self, available_width: f32, available_height: f32) {
        let viewport = Viewport::fit(available_width, available_height);
        self.state.viewport = viewport;
        let angle = self.state.player.angle;
        let destroyed = self.state.player.destroyed;
        let timer = self.state.player.destroy_timer_ms;
        self.state.player = crate::sim::Player {
            angle,
            destroyed,
            destroy_timer_ms: timer,
            ..crate::sim::Player::new(&viewport)
        };
        log::debug!(
            "Viewport {}x{} (scale {:.3})",
            viewport.width,
            viewport.height,
            viewport.scale
        );
    }

    /// Advance by `elapsed_ms` of wall time, running as many fixed ticks as
    /// the scheduler allows. Returns the audio cues to play (none when muted).
    pub fn step(&mut self, elapsed_ms: f32) -> Vec<Cue> {
        let mut cues = Vec::new();
        for _ in 0..self.scheduler.advance(elapsed_ms) {
            self.run_tick(&mut cues);
        }
        if self.settings.muted {
            cues.clear();
        }
        cues
    }

    /// Driver entry point: advance to the display timestamp `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> Vec<Cue> {
        let elapsed = self.scheduler.elapsed(now_ms);
        self.step(elapsed)
    }

    /// Draw list for the current state
    pub fn render(&self) -> Frame {
        renderer::render(&self.state)
    }

    fn run_tick(&mut self, cues: &mut Vec<Cue>) {
        let input = TickInput::from(&self.controls);
        tick(&mut self.state, &input, self.scheduler.step_ms());
        self.controls.clear_one_shots();

        for event in self.state.drain_events() {
            match event {
                GameEvent::Sound(cue) => cues.push(cue),
                GameEvent::ModeChanged(mode) => log::info!("Mode: {:?}", mode),
                GameEvent::NewHighScore(score) => {
                    log::info!("New high score: {}", score);
                    self.state.high_score.save(self.store.as_ref());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TICK_MS;
    use crate::persistence::{MemoryStore, UnavailableStore};
    use rand::SeedableRng;
    use std::f32::consts::FRAC_PI_4;

    fn engine_with(store: Box<dyn KeyValueStore>) -> Engine {
        Engine::new(
            Viewport::default(),
            Tuning::default(),
            Settings::default(),
            Pcg32::seed_from_u64(77),
            store,
        )
    }

    fn started(store: Box<dyn KeyValueStore>) -> Engine {
        let mut engine = engine_with(store);
        engine.pointer_down(10.0, 10.0);
        engine.step(TICK_MS);
        assert_eq!(engine.mode(), GameMode::Playing);
        engine
    }

    #[test]
    fn test_loads_stored_high_score() {
        let store = MemoryStore::new();
        store.set(HighScore::STORAGE_KEY, "77").ok();
        let engine = engine_with(Box::new(store));
        assert_eq!(engine.state().high_score.best, 77);
    }

    #[test]
    fn test_game_over_persists_improved_high_score() {
        let store = MemoryStore::new();
        let mut engine = started(Box::new(store.clone()));
        engine.state_mut().score = 120;
        engine.state_mut().destroy_player();
        engine.state_mut().player.destroy_timer_ms = 1.0;

        let cues = engine.step(TICK_MS);
        assert_eq!(engine.mode(), GameMode::GameOver);
        assert!(cues.contains(&Cue::GameOver));
        assert_eq!(
            store.get(HighScore::STORAGE_KEY),
            Ok(Some("120".to_string()))
        );
    }

    #[test]
    fn test_unimproved_score_is_not_written() {
        let store = MemoryStore::new();
        store.set(HighScore::STORAGE_KEY, "500").ok();
        let mut engine = started(Box::new(store.clone()));
        engine.state_mut().score = 120;
        engine.state_mut().destroy_player();
        engine.state_mut().player.destroy_timer_ms = 1.0;
        engine.step(TICK_MS);
        assert_eq!(engine.mode(), GameMode::GameOver);
        assert_eq!(
            store.get(HighScore::STORAGE_KEY),
            Ok(Some("500".to_string()))
        );
    }

    #[test]
    fn test_broken_storage_is_not_fatal() {
        let mut engine = started(Box::new(UnavailableStore));
        assert_eq!(engine.state().high_score.best, 0);
        engine.state_mut().score = 50;
        engine.state_mut().destroy_player();
        engine.state_mut().player.destroy_timer_ms = 1.0;
        engine.step(TICK_MS);
        assert_eq!(engine.mode(), GameMode::GameOver);
        assert_eq!(engine.state().high_score.best, 50);
    }

    #[test]
    fn test_pointer_aims_and_fires_once() {
        let mut engine = started(Box::new(MemoryStore::new()));
        let pivot = engine.state().player.pivot(engine.state().viewport.scale);
        engine.pointer_down(pivot.x + 200.0, pivot.y - 200.0);
        let cues = engine.step(TICK_MS);

        assert!((engine.state().player.angle + FRAC_PI_4).abs() < 1e-5);
        assert_eq!(engine.state().bullets.len(), 1);
        assert_eq!(cues, vec![Cue::Shoot]);

        // The tap does not keep firing
        engine.state_mut().fire_cooldown_ms = 0.0;
        engine.step(TICK_MS);
        assert_eq!(engine.state().bullets.len(), 1);
    }

    #[test]
    fn test_keyboard_start_and_held_fire() {
        let mut engine = engine_with(Box::new(MemoryStore::new()));
        assert_eq!(engine.key_down("Enter"), Some(Key::Start));
        engine.step(TICK_MS);
        assert_eq!(engine.mode(), GameMode::Playing);

        assert_eq!(engine.key_down("Space"), Some(Key::Fire));
        engine.step(TICK_MS);
        assert_eq!(engine.state().bullets.len(), 1);
        engine.key_up("Space");
        assert_eq!(engine.key_down("Tab"), None);
    }

    #[test]
    fn test_held_fire_does_not_skip_game_over() {
        let mut engine = engine_with(Box::new(MemoryStore::new()));
        engine.key_down("Enter");
        engine.step(TICK_MS);
        engine.key_down("Space");
        engine.state_mut().destroy_player();
        engine.state_mut().player.destroy_timer_ms = 1.0;
        engine.step(TICK_MS);
        assert_eq!(engine.mode(), GameMode::GameOver);

        // Auto-repeat of the same held key
        engine.key_down("Space");
        engine.step(TICK_MS);
        assert_eq!(engine.mode(), GameMode::GameOver);

        engine.key_up("Space");
        engine.key_down("Space");
        engine.step(TICK_MS);
        assert_eq!(engine.mode(), GameMode::Playing);
    }

    #[test]
    fn test_mute_suppresses_cues() {
        let mut engine = started(Box::new(MemoryStore::new()));
        engine.key_down("KeyM");
        assert!(engine.settings().muted);
        engine.key_down("Space");
        assert!(engine.step(TICK_MS).is_empty());
        assert_eq!(engine.state().bullets.len(), 1);
    }

    #[test]
    fn test_zero_elapsed_runs_no_tick() {
        let mut engine = engine_with(Box::new(MemoryStore::new()));
        engine.pointer_down(0.0, 0.0);
        engine.step(0.0);
        assert_eq!(engine.mode(), GameMode::Title);
        // The start request survives until a tick consumes it
        engine.step(TICK_MS);
        assert_eq!(engine.mode(), GameMode::Playing);
    }

    #[test]
    fn test_particle_cap_follows_settings() {
        let engine = Engine::new(
            Viewport::default(),
            Tuning::default(),
            Settings::from_query("?particles=off"),
            Pcg32::seed_from_u64(1),
            Box::new(MemoryStore::new()),
        );
        assert_eq!(engine.state().max_particles, 0);
    }

    #[test]
    fn test_resize_reanchors_turret() {
        let mut engine = started(Box::new(MemoryStore::new()));
        engine.resize(1600.0, 1200.0);
        let state = engine.state();
        assert_eq!(state.viewport.scale, 2.0);
        assert_eq!(state.player.pos.x, 800.0);
        assert_eq!(state.player.pos.y, state.viewport.ground_y());
    }
}
