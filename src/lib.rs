//! Kinetic Sphere - the interactive centrepiece of the INERTIA DEBT site
//!
//! Core modules:
//! - `sim`: Per-frame simulation (sphere spring, orbits, bursts, ripples, trail)
//! - `renderer`: Read-only scene pass onto a 2D drawing surface
//! - `platform`: Frame clock, surface sizing, mount/teardown lifecycle
//! - `widget`: The sphere widget tying input, simulation and rendering together
//! - `cursor`: Custom cursor overlay (dot + trailing ring)
//! - `settings`: Quality preset and effect toggles

pub mod cursor;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod widget;

pub use error::MountError;
pub use platform::surface::SurfaceSize;
pub use settings::{QualityPreset, Settings};
pub use sim::Signals;
pub use widget::KineticSphere;

use glam::Vec2;

/// Widget tuning constants
///
/// All simulation values are per frame at the nominal display rate.
/// Distances are CSS pixels of the drawing surface.
pub mod consts {
    /// Drift clock advance per frame (drives the idle Lissajous path)
    pub const DRIFT_STEP: f32 = 0.008;
    /// Idle drift amplitude as a fraction of surface width / height
    pub const DRIFT_AMPLITUDE_X: f32 = 0.15;
    pub const DRIFT_AMPLITUDE_Y: f32 = 0.12;
    /// Idle drift frequencies (x uses sin, y uses cos)
    pub const DRIFT_FREQ_X: f32 = 1.2;
    pub const DRIFT_FREQ_Y: f32 = 0.8;

    /// Sphere spring
    pub const SPRING_STIFFNESS: f32 = 0.04;
    pub const SPRING_DAMPING: f32 = 0.82;
    /// How far the spring target is pulled toward the pointer (0 = ignore, 1 = follow)
    pub const POINTER_INFLUENCE: f32 = 0.35;
    /// Sphere body radius
    pub const SPHERE_RADIUS: f32 = 18.0;

    /// Drag
    pub const CAPTURE_RADIUS: f32 = 80.0;
    pub const DRAG_GAIN: f32 = 0.5;
    /// Velocity decay while held (keeps squash/stretch from sticking)
    pub const DRAG_VELOCITY_DECAY: f32 = 0.85;

    /// Hold charge (per second of hold, capped)
    pub const HOLD_CHARGE_RATE: f32 = 0.8;
    pub const MAX_HOLD_CHARGE: f32 = 1.0;
    pub const MIN_HOLD_CHARGE: f32 = 0.15;

    /// Click combo
    pub const COMBO_WINDOW_MS: f64 = 400.0;
    pub const MAX_COMBO: u32 = 5;

    /// Orbit ring
    pub const ORBIT_MIN_RADIUS: f32 = 40.0;
    pub const ORBIT_MAX_RADIUS: f32 = 110.0;
    pub const ORBIT_MIN_SPEED: f32 = 0.004;
    pub const ORBIT_MAX_SPEED: f32 = 0.02;
    pub const ORBIT_RADIUS_EASE: f32 = 0.08;
    pub const MAGNET_RANGE: f32 = 160.0;
    pub const MAGNET_STRENGTH: f32 = 0.45;
    pub const SCROLL_SPIN_GAIN: f32 = 0.05;
    pub const MAX_SCROLL_SPIN: f32 = 3.0;
    /// Neighbouring orbit particles closer than this get a connective line
    pub const ORBIT_LINK_DISTANCE: f32 = 70.0;

    /// Burst particles
    pub const BURST_DRAG: f32 = 0.94;
    pub const BURST_BASE_ALPHA: f32 = 0.9;
    pub const BURST_ALPHA_FLOOR: f32 = 0.01;
    pub const BURST_MIN_AGE: u32 = 40;
    pub const BURST_MAX_AGE: u32 = 70;

    /// Ripples
    pub const RIPPLE_START_ALPHA: f32 = 0.6;
    pub const RIPPLE_DECAY: f32 = 0.955;
    pub const RIPPLE_ALPHA_EPSILON: f32 = 0.05;
    /// Frames for a ripple to reach its max radius
    pub const RIPPLE_GROW_FRAMES: f32 = 40.0;

    /// Sphere trail
    pub const TRAIL_START_ALPHA: f32 = 0.6;
    pub const TRAIL_DECAY: f32 = 0.97;

    /// Glow
    pub const GLOW_RADIUS: f32 = 60.0;
}

/// Distance-based falloff in [0, 1]: 1 at `d = 0`, 0 at `d >= range`
#[inline]
pub fn proximity(d: f32, range: f32) -> f32 {
    if range <= 0.0 {
        return 0.0;
    }
    (1.0 - d / range).clamp(0.0, 1.0)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
