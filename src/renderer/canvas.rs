//! `Canvas2d` on top of the browser's 2D context
//!
//! Per-call errors are ignored: a frame that fails to paint is simply
//! replaced by the next one.

use std::f64::consts::TAU;

use glam::Vec2;
use web_sys::CanvasRenderingContext2d;

use super::{Canvas2d, Fill, Hsla, RadialGradient};

pub struct CanvasPainter<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl<'a> CanvasPainter<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn set_fill(&self, fill: &Fill) {
        match fill {
            Fill::Solid(color) => self.ctx.set_fill_style_str(&color.to_string()),
            Fill::Radial(gradient) => self.set_gradient(gradient),
        }
    }

    fn set_gradient(&self, g: &RadialGradient) {
        let Ok(gradient) = self.ctx.create_radial_gradient(
            g.inner.x as f64,
            g.inner.y as f64,
            g.inner_radius.max(0.0) as f64,
            g.outer.x as f64,
            g.outer.y as f64,
            g.outer_radius.max(0.0) as f64,
        ) else {
            return;
        };
        for (offset, color) in &g.stops {
            let _ = gradient.add_color_stop(*offset, &color.to_string());
        }
        self.ctx.set_fill_style_canvas_gradient(&gradient);
    }
}

impl Canvas2d for CanvasPainter<'_> {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: &Fill) {
        if radius <= 0.0 {
            return;
        }
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.set_fill(fill);
        self.ctx.fill();
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, fill: &Fill) {
        if radii.x <= 0.0 || radii.y <= 0.0 {
            return;
        }
        self.ctx.begin_path();
        let _ = self.ctx.ellipse(
            center.x as f64,
            center.y as f64,
            radii.x as f64,
            radii.y as f64,
            rotation as f64,
            0.0,
            TAU,
        );
        self.set_fill(fill);
        self.ctx.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Hsla) {
        if radius <= 0.0 {
            return;
        }
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
        self.ctx.set_line_width(width as f64);
        self.ctx.set_stroke_style_str(&color.to_string());
        self.ctx.stroke();
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Hsla) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.set_line_width(width as f64);
        self.ctx.set_stroke_style_str(&color.to_string());
        self.ctx.stroke();
    }
}
