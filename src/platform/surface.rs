//! Drawing surface measurement

use glam::Vec2;

/// Surface size in CSS pixels plus the device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

impl SurfaceSize {
    pub const fn new(width: f32, height: f32, dpr: f32) -> Self {
        Self { width, height, dpr }
    }

    /// Not laid out yet (or collapsed)
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Backing store size in device pixels
    pub fn backing_size(&self) -> (u32, u32) {
        let dpr = self.effective_dpr();
        (
            (self.width.max(0.0) * dpr).round() as u32,
            (self.height.max(0.0) * dpr).round() as u32,
        )
    }

    /// Whether `measured` describes a different layout than `self`.
    ///
    /// Checked every frame against the live element, so a surface that was
    /// unlaid at mount, or whose box changed without a window resize, is
    /// picked up on the next frame.
    pub fn is_stale(&self, measured: SurfaceSize) -> bool {
        self.width != measured.width
            || self.height != measured.height
            || (self.effective_dpr() - measured.effective_dpr()).abs() > 1e-3
    }

    /// DPR with garbage values clamped to 1
    pub fn effective_dpr(&self) -> f32 {
        if self.dpr.is_finite() && self.dpr > 0.0 {
            self.dpr
        } else {
            1.0
        }
    }
}
