//! Colours and fills

use std::fmt;

use glam::Vec2;

/// HSL colour with alpha, printed as a CSS `hsla()` string
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    /// Hue in degrees
    pub h: f32,
    /// Saturation percent
    pub s: f32,
    /// Lightness percent
    pub l: f32,
    pub a: f32,
}

impl Hsla {
    pub const fn new(h: f32, s: f32, l: f32, a: f32) -> Self {
        Self { h, s, l, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Shift hue, keeping it in [0, 360)
    pub fn rotate(self, degrees: f32) -> Self {
        Self {
            h: (self.h + degrees).rem_euclid(360.0),
            ..self
        }
    }
}

impl fmt::Display for Hsla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsla({:.0}, {:.0}%, {:.0}%, {:.3})",
            self.h,
            self.s,
            self.l,
            self.a.clamp(0.0, 1.0)
        )
    }
}

/// Two-circle radial gradient, same model as `createRadialGradient`
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub inner: Vec2,
    pub inner_radius: f32,
    pub outer: Vec2,
    pub outer_radius: f32,
    /// (offset in [0, 1], colour)
    pub stops: Vec<(f32, Hsla)>,
}

impl RadialGradient {
    /// Concentric gradient from `center` out to `radius`
    pub fn centered(center: Vec2, radius: f32) -> Self {
        Self {
            inner: center,
            inner_radius: 0.0,
            outer: center,
            outer_radius: radius,
            stops: Vec::new(),
        }
    }

    pub fn stop(mut self, offset: f32, color: Hsla) -> Self {
        self.stops.push((offset.clamp(0.0, 1.0), color));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Hsla),
    Radial(RadialGradient),
}
