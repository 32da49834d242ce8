//! Game state and core simulation types
//!
//! Every position and size is in drawn pixels, already multiplied by the
//! viewport scale at the moment the entity was created.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::Cue;
use crate::consts::*;
use crate::highscores::HighScore;
use crate::tuning::Tuning;
use crate::viewport::Viewport;

/// Game-mode state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Waiting for the first start
    Title,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for a restart
    GameOver,
}

/// Something the platform layer should react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Sound(Cue),
    ModeChanged(GameMode),
    /// A finished run beat the stored record
    NewHighScore(u32),
}

/// Palette tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Background,
    Cyan,
    Magenta,
    White,
}

impl Color {
    pub fn css(&self) -> &'static str {
        match self {
            Color::Background => "#000000",
            Color::Cyan => "#00FFFF",
            Color::Magenta => "#FF00FF",
            Color::White => "#FFFFFF",
        }
    }
}

/// The player's turret
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Center of the base's top edge
    pub pos: Vec2,
    /// Barrel angle in [-π, 0]; -π/2 is straight up
    pub angle: f32,
    pub destroyed: bool,
    /// Remaining wreck time before game over (ms)
    pub destroy_timer_ms: f32,
}

impl Player {
    pub fn new(viewport: &Viewport) -> Self {
        Self {
            pos: Vec2::new(viewport.center_x(), viewport.ground_y()),
            angle: -std::f32::consts::FRAC_PI_2,
            destroyed: false,
            destroy_timer_ms: 0.0,
        }
    }

    /// Point the barrel rotates around
    pub fn pivot(&self, scale: f32) -> Vec2 {
        self.pos - Vec2::new(0.0, TURRET_HEIGHT * scale / 2.0)
    }

    pub fn aim_dir(&self) -> Vec2 {
        Vec2::new(self.angle.cos(), self.angle.sin())
    }

    /// Barrel tip, where bullets appear
    pub fn muzzle(&self, scale: f32) -> Vec2 {
        self.pivot(scale) + self.aim_dir() * BARREL_LENGTH * scale
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Helicopter or jet. `pos` is the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Aircraft {
    pub pos: Vec2,
    pub size: Vec2,
    /// Signed horizontal speed per tick
    pub speed: f32,
    /// Countdown to the next trooper/bomb release (ms)
    pub drop_timer_ms: f32,
    pub health: u8,
}

/// Paratrooper. `pos` is the horizontal center and the top of the figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Trooper {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed_y: f32,
    pub has_chute: bool,
}

/// Bomb. `pos` is the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Bomb {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed_y: f32,
}

/// Enemy entities
#[derive(Debug, Clone, PartialEq)]
pub enum Enemy {
    Helicopter(Aircraft),
    Jet(Aircraft),
    Trooper(Trooper),
    Bomb(Bomb),
}

impl Enemy {
    pub fn pos(&self) -> Vec2 {
        match self {
            Enemy::Helicopter(a) | Enemy::Jet(a) => a.pos,
            Enemy::Trooper(t) => t.pos,
            Enemy::Bomb(b) => b.pos,
        }
    }

    /// Middle of the enemy's hit box
    pub fn center(&self) -> Vec2 {
        match self {
            Enemy::Helicopter(a) | Enemy::Jet(a) => a.pos + a.size / 2.0,
            Enemy::Trooper(t) => t.pos,
            Enemy::Bomb(b) => b.pos + b.size / 2.0,
        }
    }
}

/// A cosmetic explosion fragment
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining ticks
    pub life: u32,
    pub color: Color,
}

/// Which side of the base a trooper landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Grounded troopers piled up beside the base
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandedStacks {
    pub left: Vec<Trooper>,
    pub right: Vec<Trooper>,
}

impl LandedStacks {
    pub fn side_mut(&mut self, side: Side) -> &mut Vec<Trooper> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// True once either stack holds `limit` troopers
    pub fn overrun(&self, limit: usize) -> bool {
        self.left.len() >= limit || self.right.len() >= limit
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trooper> {
        self.left.iter().chain(self.right.iter())
    }

    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub mode: GameMode,
    pub viewport: Viewport,
    pub tuning: Tuning,
    /// Injected RNG (spawn heights/sides, drop cadence, particle jitter)
    pub rng: Pcg32,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub landed: LandedStacks,
    pub score: u32,
    pub high_score: HighScore,
    /// Countdown to the next helicopter (ms)
    pub helicopter_timer_ms: f32,
    /// Countdown to the next jet (ms), only running once jets unlock
    pub jet_timer_ms: f32,
    /// Time until the turret may fire again (ms)
    pub fire_cooldown_ms: f32,
    /// Live particle cap from the quality setting; bursts past it evict the
    /// oldest particles early
    pub max_particles: usize,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(viewport: Viewport, tuning: Tuning, rng: Pcg32) -> Self {
        let mut state = Self {
            mode: GameMode::Title,
            viewport,
            tuning,
            rng,
            player: Player::new(&viewport),
            bullets: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            landed: LandedStacks::default(),
            score: 0,
            high_score: HighScore::default(),
            helicopter_timer_ms: 0.0,
            jet_timer_ms: 0.0,
            fire_cooldown_ms: 0.0,
            max_particles: crate::settings::QualityPreset::default().max_particles(),
            events: Vec::new(),
        };
        state.reset();
        state
    }

    /// Default viewport and tuning with a seeded RNG
    pub fn with_seed(seed: u64) -> Self {
        Self::new(Viewport::default(), Tuning::default(), Pcg32::seed_from_u64(seed))
    }

    /// Fresh world: player, entity store, score and spawner timers.
    /// The mode and high score are left alone.
    pub fn reset(&mut self) {
        self.player = Player::new(&self.viewport);
        self.bullets.clear();
        self.enemies.clear();
        self.particles.clear();
        self.landed = LandedStacks::default();
        self.score = 0;
        self.helicopter_timer_ms = 0.0;
        self.jet_timer_ms = super::spawn::uniform(&mut self.rng, self.tuning.jet_first_spawn_ms);
        self.fire_cooldown_ms = 0.0;
    }

    /// Convenience for playing state checks
    pub fn is_playing(&self) -> bool {
        self.mode == GameMode::Playing
    }

    pub fn emit(&mut self, cue: Cue) {
        self.events.push(GameEvent::Sound(cue));
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Scatter `count` particles from a point
    pub fn explode(&mut self, at: Vec2, color: Color, count: usize) {
        use rand::Rng;

        if self.max_particles == 0 {
            return;
        }
        let spread = PARTICLE_SPREAD * self.viewport.scale;
        for _ in 0..count {
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * spread,
                (self.rng.random::<f32>() - 0.5) * spread,
            );
            self.particles.push(Particle {
                pos: at,
                vel,
                life: PARTICLE_LIFE,
                color,
            });
        }
        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }
    }

    /// Wreck the turret and start the game-over countdown (idempotent)
    pub fn destroy_player(&mut self) {
        if self.player.destroyed {
            return;
        }
        self.player.destroyed = true;
        self.player.destroy_timer_ms = self.tuning.destroy_countdown_ms;
        let at = self.player.pos;
        self.explode(at, Color::Magenta, 100);
        self.explode(at, Color::White, 100);
        log::debug!("Player destroyed at score {}", self.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_title_with_fresh_world() {
        let state = GameState::with_seed(7);
        assert_eq!(state.mode, GameMode::Title);
        assert_eq!(state.score, 0);
        assert!(state.enemies.is_empty());
        assert!(state.landed.is_empty());
        assert_eq!(state.helicopter_timer_ms, 0.0);
        assert!(state.jet_timer_ms >= 10000.0 && state.jet_timer_ms < 15000.0);
        assert_eq!(state.player.angle, -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_player_sits_on_ground_line() {
        let state = GameState::with_seed(1);
        assert_eq!(state.player.pos.x, state.viewport.center_x());
        assert_eq!(state.player.pos.y, state.viewport.ground_y());
    }

    #[test]
    fn test_muzzle_is_barrel_length_from_pivot() {
        let state = GameState::with_seed(1);
        let scale = state.viewport.scale;
        let d = state.player.muzzle(scale) - state.player.pivot(scale);
        assert!((d.length() - BARREL_LENGTH * scale).abs() < 1e-4);
        // Straight up
        assert!(d.x.abs() < 1e-4 && d.y < 0.0);
    }

    #[test]
    fn test_destroy_player_is_idempotent() {
        let mut state = GameState::with_seed(3);
        state.destroy_player();
        assert!(state.player.destroyed);
        assert_eq!(state.player.destroy_timer_ms, 1000.0);
        let particles = state.particles.len();
        state.player.destroy_timer_ms = 400.0;
        state.destroy_player();
        assert_eq!(state.player.destroy_timer_ms, 400.0);
        assert_eq!(state.particles.len(), particles);
    }

    #[test]
    fn test_explode_respects_particle_cap() {
        let mut state = GameState::with_seed(3);
        state.max_particles = 50;
        state.explode(Vec2::ZERO, Color::White, 30);
        state.explode(Vec2::new(5.0, 5.0), Color::Cyan, 30);
        assert_eq!(state.particles.len(), 50);
        // Oldest went first
        assert_eq!(state.particles.last().map(|p| p.color), Some(Color::Cyan));
        assert_eq!(state.particles[0].color, Color::White);
    }

    #[test]
    fn test_reset_keeps_mode_and_high_score() {
        let mut state = GameState::with_seed(3);
        state.mode = GameMode::GameOver;
        state.high_score = HighScore::new(90);
        state.score = 40;
        state.bullets.push(Bullet { pos: Vec2::ZERO, vel: Vec2::ZERO });
        state.reset();
        assert_eq!(state.mode, GameMode::GameOver);
        assert_eq!(state.high_score.best, 90);
        assert_eq!(state.score, 0);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_landed_stacks_overrun_on_either_side() {
        let trooper = Trooper {
            pos: Vec2::ZERO,
            size: Vec2::new(TROOPER_WIDTH, TROOPER_HEIGHT),
            speed_y: 0.0,
            has_chute: false,
        };
        let mut stacks = LandedStacks::default();
        for _ in 0..3 {
            stacks.side_mut(Side::Left).push(trooper.clone());
            stacks.side_mut(Side::Right).push(trooper.clone());
        }
        assert_eq!(stacks.len(), 6);
        assert!(!stacks.overrun(4));
        stacks.side_mut(Side::Right).push(trooper);
        assert!(stacks.overrun(4));
    }

    #[test]
    fn test_enemy_center() {
        let heli = Enemy::Helicopter(Aircraft {
            pos: Vec2::new(100.0, 40.0),
            size: Vec2::new(60.0, 25.0),
            speed: 2.0,
            drop_timer_ms: 0.0,
            health: 2,
        });
        assert_eq!(heli.center(), Vec2::new(130.0, 52.5));
    }
}
