//! Canvas 2D rendering module
//!
//! Rendering is split in two: `render` turns a `GameState` into a flat draw
//! list without touching any platform API, and a `Surface` replays that list.
//! The browser surface wraps a `CanvasRenderingContext2d`; tests replay into a
//! recorder.

pub mod shapes;

#[cfg(target_arch = "wasm32")]
mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use glam::Vec2;

use crate::sim::{Color, GameMode, GameState};

/// Horizontal text anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
        }
    }
}

/// One drawing primitive, in canvas pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect {
        pos: Vec2,
        size: Vec2,
        color: Color,
    },
    /// Closed, filled polygon
    Polygon { points: Vec<Vec2>, color: Color },
    /// Filled circular sector swept clockwise from `start` to `end`
    Arc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    Text {
        text: String,
        pos: Vec2,
        /// Font size in pixels
        size: f32,
        color: Color,
        align: TextAlign,
    },
}

/// Something that can execute draw commands
pub trait Surface {
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color);
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    fn fill_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);
    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color, align: TextAlign);
}

/// A complete frame's draw list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub commands: Vec<DrawCmd>,
}

impl Frame {
    pub fn push(&mut self, cmd: DrawCmd) {
        self.commands.push(cmd);
    }

    pub fn rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.push(DrawCmd::Rect { pos, size, color });
    }

    pub fn text(&mut self, text: impl Into<String>, pos: Vec2, size: f32, color: Color, align: TextAlign) {
        self.push(DrawCmd::Text {
            text: text.into(),
            pos,
            size,
            color,
            align,
        });
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All text drawn this frame, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Replay the list onto a surface
    pub fn draw(&self, surface: &mut impl Surface) {
        for cmd in &self.commands {
            match cmd {
                DrawCmd::Rect { pos, size, color } => surface.fill_rect(*pos, *size, *color),
                DrawCmd::Polygon { points, color } => surface.fill_polygon(points, *color),
                DrawCmd::Arc {
                    center,
                    radius,
                    start,
                    end,
                    color,
                } => surface.fill_arc(*center, *radius, *start, *end, *color),
                DrawCmd::Line {
                    from,
                    to,
                    width,
                    color,
                } => surface.stroke_line(*from, *to, *width, *color),
                DrawCmd::Text {
                    text,
                    pos,
                    size,
                    color,
                    align,
                } => surface.fill_text(text, *pos, *size, *color, *align),
            }
        }
    }
}

/// HUD and overlay font size (logical units)
const HUD_TEXT_SIZE: f32 = 20.0;
const TITLE_TEXT_SIZE: f32 = 40.0;
const INFO_TEXT_SIZE: f32 = 14.0;

/// Build the full draw list for the current state.
///
/// Every entity is drawn, on screen or not; the Title screen shows only the
/// background and its overlay.
pub fn render(state: &GameState) -> Frame {
    let vp = state.viewport;
    let scale = vp.scale;
    let mut frame = Frame::default();

    frame.rect(Vec2::ZERO, Vec2::new(vp.width, vp.height), Color::Background);

    if state.mode == GameMode::Title {
        title_overlay(&mut frame, state);
        return frame;
    }

    if !state.player.destroyed {
        shapes::player(&mut frame, &state.player, scale);
    }
    for bullet in &state.bullets {
        shapes::bullet(&mut frame, bullet, scale);
    }
    for enemy in &state.enemies {
        shapes::enemy(&mut frame, enemy, scale);
    }
    for trooper in state.landed.iter() {
        shapes::landed_trooper(&mut frame, trooper, scale);
    }
    for particle in &state.particles {
        shapes::particle(&mut frame, particle, scale);
    }

    let baseline = vp.height - vp.px(10.0);
    frame.text(
        format!("SCORE: {}", state.score),
        Vec2::new(vp.px(20.0), baseline),
        vp.px(HUD_TEXT_SIZE),
        Color::Cyan,
        TextAlign::Left,
    );
    frame.text(
        format!("HIGH SCORE: {}", state.high_score.best),
        Vec2::new(vp.width - vp.px(250.0), baseline),
        vp.px(HUD_TEXT_SIZE),
        Color::Cyan,
        TextAlign::Left,
    );

    if state.mode == GameMode::GameOver {
        game_over_overlay(&mut frame, state);
    }
    frame
}

fn overlay(frame: &mut Frame, state: &GameState, heading: &str, lines: &[String]) {
    let vp = state.viewport;
    let cx = vp.center_x();
    let mut y = vp.height * 0.35;
    frame.text(heading, Vec2::new(cx, y), vp.px(TITLE_TEXT_SIZE), Color::Magenta, TextAlign::Center);
    for line in lines {
        y += vp.px(INFO_TEXT_SIZE * 3.0);
        frame.text(line.as_str(), Vec2::new(cx, y), vp.px(INFO_TEXT_SIZE), Color::White, TextAlign::Center);
    }
}

fn title_overlay(frame: &mut Frame, state: &GameState) {
    let lines = [
        "ARROW KEYS TO AIM, SPACE TO FIRE".to_string(),
        "ON MOBILE: TAP TO AIM & FIRE".to_string(),
        format!("HIGH SCORE: {}", state.high_score.best),
        "CLICK OR TAP TO START".to_string(),
    ];
    overlay(frame, state, "PARATROOPER", &lines);
}

fn game_over_overlay(frame: &mut Frame, state: &GameState) {
    let lines = [
        format!("FINAL SCORE: {}", state.score),
        "CLICK OR TAP TO RESTART".to_string(),
    ];
    overlay(frame, state, "GAME OVER", &lines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Aircraft, Bullet, Enemy, Trooper};

    /// Surface that records what it was asked to draw
    #[derive(Default)]
    struct Recorder {
        rects: usize,
        polygons: usize,
        arcs: usize,
        lines: usize,
        texts: Vec<String>,
    }

    impl Surface for Recorder {
        fn fill_rect(&mut self, _pos: Vec2, _size: Vec2, _color: Color) {
            self.rects += 1;
        }
        fn fill_polygon(&mut self, _points: &[Vec2], _color: Color) {
            self.polygons += 1;
        }
        fn fill_arc(&mut self, _center: Vec2, _radius: f32, _start: f32, _end: f32, _color: Color) {
            self.arcs += 1;
        }
        fn stroke_line(&mut self, _from: Vec2, _to: Vec2, _width: f32, _color: Color) {
            self.lines += 1;
        }
        fn fill_text(&mut self, text: &str, _pos: Vec2, _size: f32, _color: Color, _align: TextAlign) {
            self.texts.push(text.to_string());
        }
    }

    fn playing() -> GameState {
        let mut state = GameState::with_seed(1);
        state.mode = GameMode::Playing;
        state
    }

    #[test]
    fn test_title_shows_only_background_and_overlay() {
        let state = GameState::with_seed(1);
        let frame = render(&state);
        assert!(matches!(
            frame.commands[0],
            DrawCmd::Rect {
                color: Color::Background,
                ..
            }
        ));
        assert!(frame.texts().any(|t| t == "PARATROOPER"));
        assert!(frame.texts().any(|t| t == "CLICK OR TAP TO START"));
        assert!(!frame.commands.iter().any(|c| matches!(c, DrawCmd::Line { .. })));
    }

    #[test]
    fn test_playing_draws_turret_and_hud() {
        let mut state = playing();
        state.score = 45;
        state.high_score.best = 300;
        let frame = render(&state);
        assert!(frame.commands.iter().any(|c| matches!(c, DrawCmd::Line { color: Color::Cyan, .. })));
        assert!(frame.texts().any(|t| t == "SCORE: 45"));
        assert!(frame.texts().any(|t| t == "HIGH SCORE: 300"));
        assert!(!frame.texts().any(|t| t == "GAME OVER"));
    }

    #[test]
    fn test_destroyed_turret_is_hidden() {
        let mut state = playing();
        let before = render(&state);
        state.player.destroyed = true;
        let after = render(&state);
        assert!(!after.commands.iter().any(|c| matches!(c, DrawCmd::Line { .. })));
        assert!(after.len() < before.len());
    }

    #[test]
    fn test_game_over_overlay_reports_final_score() {
        let mut state = playing();
        state.mode = GameMode::GameOver;
        state.score = 120;
        let frame = render(&state);
        assert!(frame.texts().any(|t| t == "GAME OVER"));
        assert!(frame.texts().any(|t| t == "FINAL SCORE: 120"));
    }

    #[test]
    fn test_draw_cost_grows_with_entities() {
        let mut state = playing();
        let base = render(&state).len();
        state.bullets.push(Bullet {
            pos: Vec2::new(-500.0, -500.0),
            vel: Vec2::ZERO,
        });
        state.enemies.push(Enemy::Helicopter(Aircraft {
            pos: Vec2::new(5000.0, 50.0),
            size: Vec2::new(60.0, 25.0),
            speed: -2.0,
            drop_timer_ms: 1000.0,
            health: 2,
        }));
        // Off-screen entities are still drawn
        assert_eq!(render(&state).len(), base + 1 + 3);

        state.landed.left.push(Trooper {
            pos: Vec2::new(350.0, 560.0),
            size: Vec2::new(10.0, 40.0),
            speed_y: 0.8,
            has_chute: false,
        });
        assert_eq!(render(&state).len(), base + 1 + 3 + 4);
    }

    #[test]
    fn test_frame_replays_every_command() {
        let mut state = playing();
        state.enemies.push(Enemy::Trooper(Trooper {
            pos: Vec2::new(200.0, 100.0),
            size: Vec2::new(10.0, 40.0),
            speed_y: 0.8,
            has_chute: true,
        }));
        let frame = render(&state);
        let mut recorder = Recorder::default();
        frame.draw(&mut recorder);

        assert_eq!(recorder.arcs, 1);
        // Barrel plus two chute cords
        assert_eq!(recorder.lines, 3);
        assert_eq!(recorder.polygons, 0);
        assert_eq!(recorder.texts.len(), 2);
        assert_eq!(
            recorder.rects + recorder.arcs + recorder.lines + recorder.texts.len(),
            frame.len()
        );
    }
}
