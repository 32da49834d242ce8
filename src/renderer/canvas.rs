//! `CanvasRenderingContext2d` backend

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Surface, TextAlign};
use crate::sim::Color;

const FONT_FAMILY: &str = "'Press Start 2P', monospace";

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Grab the 2D context of a canvas; `None` if the browser refuses one
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        ctx.set_image_smoothing_enabled(false);
        Some(Self { ctx })
    }
}

impl Surface for CanvasSurface {
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.ctx.set_fill_style_str(color.css());
        self.ctx
            .fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.ctx.set_fill_style_str(color.css());
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }

    fn fill_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color) {
        self.ctx.set_fill_style_str(color.css());
        self.ctx.begin_path();
        self.ctx
            .arc(
                center.x as f64,
                center.y as f64,
                radius as f64,
                start as f64,
                end as f64,
            )
            .ok();
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.ctx.set_stroke_style_str(color.css());
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, color: Color, align: TextAlign) {
        self.ctx.set_font(&format!("{}px {}", size.round(), FONT_FAMILY));
        self.ctx.set_text_align(align.as_str());
        self.ctx.set_fill_style_str(color.css());
        self.ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
    }
}
