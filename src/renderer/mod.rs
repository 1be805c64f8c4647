//! 2D rendering module
//!
//! The scene pass only talks to a `Canvas2d`; the browser implementation
//! lives in `canvas` and wraps `CanvasRenderingContext2d`.

pub mod color;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use glam::Vec2;

pub use color::{Fill, Hsla, RadialGradient};
pub use scene::draw_scene;

/// Minimal immediate-mode 2D surface (CSS pixel coordinates)
pub trait Canvas2d {
    /// Clear the whole surface
    fn clear(&mut self, width: f32, height: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: &Fill);
    /// Ellipse rotated by `rotation` radians around its centre
    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, rotation: f32, fill: &Fill);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Hsla);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Hsla);
}
