//! Per-frame simulation module
//!
//! All widget motion lives here. This module must stay host-independent:
//! - Fixed nominal step (one call per display frame)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod input;
pub mod state;
pub mod tick;

use serde::{Deserialize, Serialize};

pub use input::{ComboTracker, InputSampler, PointerAction, PointerEvent, touch_actions};
pub use state::{BurstParticle, OrbitParticle, PhysicsState, Ripple, SphereState, TrailPoint};
pub use tick::tick;

/// External signals computed elsewhere on the page, sampled once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Signals {
    /// Page scroll speed (px per frame, sign ignored)
    pub scroll_velocity: f32,
    /// Simulated debt level, 0..100
    pub debt_level: f32,
}

impl Signals {
    pub fn new(scroll_velocity: f32, debt_level: f32) -> Self {
        Self {
            scroll_velocity,
            debt_level,
        }
    }

    /// Debt as a fraction in [0, 1]
    pub fn debt_fraction(&self) -> f32 {
        (self.debt_level / 100.0).clamp(0.0, 1.0)
    }

    /// Orbit spin multiplier from scroll speed
    pub fn spin_scale(&self) -> f32 {
        use crate::consts::{MAX_SCROLL_SPIN, SCROLL_SPIN_GAIN};
        1.0 + (self.scroll_velocity.abs() * SCROLL_SPIN_GAIN).min(MAX_SCROLL_SPIN)
    }

    /// Burst speed multiplier from scroll speed
    pub fn speed_scale(&self) -> f32 {
        1.0 + (self.scroll_velocity.abs() * 0.05).min(1.0)
    }

    /// Glow/ring radius multiplier from debt and scroll
    pub fn glow_scale(&self) -> f32 {
        1.0 + self.debt_fraction() * 0.5 + (self.scroll_velocity.abs() * 0.02).min(0.5)
    }

    /// Accent hue for the current debt level
    pub fn hue(&self) -> f32 {
        debt_hue(self.debt_level)
    }
}

/// Debt meter colour scale: red above 75%, amber above 50%, teal otherwise
pub fn debt_hue(debt_level: f32) -> f32 {
    if debt_level > 75.0 {
        0.0
    } else if debt_level > 50.0 {
        40.0
    } else {
        175.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debt_hue_thresholds() {
        assert_eq!(debt_hue(0.0), 175.0);
        assert_eq!(debt_hue(50.0), 175.0);
        assert_eq!(debt_hue(50.1), 40.0);
        assert_eq!(debt_hue(75.0), 40.0);
        assert_eq!(debt_hue(99.0), 0.0);
    }

    #[test]
    fn test_signal_scales_are_bounded() {
        let calm = Signals::default();
        assert_eq!(calm.spin_scale(), 1.0);
        assert_eq!(calm.glow_scale(), 1.0);

        let wild = Signals::new(-10_000.0, 500.0);
        assert_eq!(wild.spin_scale(), 4.0);
        assert_eq!(wild.speed_scale(), 2.0);
        assert_eq!(wild.glow_scale(), 2.0);
    }

    #[test]
    fn test_signals_from_camel_case_json() {
        let s: Signals = serde_json::from_str(r#"{"scrollVelocity": 3.5, "debtLevel": 60}"#).unwrap();
        assert_eq!(s, Signals::new(3.5, 60.0));
    }
}
