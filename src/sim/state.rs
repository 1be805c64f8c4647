//! Physics state and core simulation types
//!
//! One `PhysicsState` per mounted widget. Everything here is transient and
//! dropped at unmount.

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::settings::Settings;

/// A decorative particle circling the sphere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitParticle {
    /// Current angle around the sphere (radians)
    pub angle: f32,
    /// Current distance from the sphere centre
    pub radius: f32,
    /// Rest distance the radius drifts back to
    pub base_radius: f32,
    /// Radians per frame
    pub angular_speed: f32,
    pub size: f32,
}

impl OrbitParticle {
    /// Position relative to a centre
    pub fn offset(&self) -> Vec2 {
        crate::polar_to_cartesian(self.radius, self.angle)
    }
}

/// A short-lived spark from a click or charged release
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurstParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub alpha: f32,
    pub size: f32,
    /// HSL hue in degrees
    pub hue: f32,
    /// Frames lived
    pub age: u32,
    /// Frames until removal
    pub max_age: u32,
}

impl BurstParticle {
    /// Remaining life as a fraction (1 = fresh, 0 = expired)
    pub fn life(&self) -> f32 {
        if self.max_age == 0 {
            return 0.0;
        }
        1.0 - (self.age as f32 / self.max_age as f32).min(1.0)
    }

    pub fn is_alive(&self) -> bool {
        self.age < self.max_age && self.alpha >= BURST_ALPHA_FLOOR
    }
}

/// An expanding ring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ripple {
    pub origin: Vec2,
    pub radius: f32,
    pub alpha: f32,
    pub max_radius: f32,
}

impl Ripple {
    pub fn new(origin: Vec2, max_radius: f32) -> Self {
        Self {
            origin,
            radius: 0.0,
            alpha: RIPPLE_START_ALPHA,
            max_radius,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alpha >= RIPPLE_ALPHA_EPSILON
    }
}

/// Trail point behind the sphere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub alpha: f32,
}

/// The sphere itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereState {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Pointer is holding the sphere; position follows the pointer directly
    pub dragging: bool,
    /// Sphere centre minus pointer position at drag start
    pub drag_offset: Vec2,
    /// Pointer is down somewhere on the surface (charging)
    pub holding: bool,
    /// Accumulated charge in [0, MAX_HOLD_CHARGE]
    pub hold_charge: f32,
    /// Timestamp (ms) the hold began
    pub hold_start_ms: f64,
}

impl SphereState {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            dragging: false,
            drag_offset: Vec2::ZERO,
            holding: false,
            hold_charge: 0.0,
            hold_start_ms: 0.0,
        }
    }
}

/// Complete simulation state for one widget
#[derive(Debug, Clone)]
pub struct PhysicsState {
    pub sphere: SphereState,
    /// Fixed at construction
    orbits: Vec<OrbitParticle>,
    pub bursts: Vec<BurstParticle>,
    pub ripples: Vec<Ripple>,
    pub trail: VecDeque<TrailPoint>,
    /// Last known pointer position, `None` when off the surface
    pub pointer: Option<Vec2>,
    /// Idle drift clock
    pub drift_time: f32,
    /// Frames simulated
    pub frame: u64,
    /// Copied from settings at construction
    pub max_bursts: usize,
    pub trail_length: usize,
    pub burst_scale: f32,
    pub spin_scale: f32,
    pub ripples_enabled: bool,
    pub orbit_links: bool,
    pub rng: Pcg32,
}

impl PhysicsState {
    /// Create state with the sphere at `center` and a fresh orbit ring
    pub fn new(center: Vec2, settings: &Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let orbits = (0..settings.orbit_count())
            .map(|_| {
                let base_radius = rng.random_range(ORBIT_MIN_RADIUS..ORBIT_MAX_RADIUS);
                let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                OrbitParticle {
                    angle: rng.random_range(0.0..std::f32::consts::TAU),
                    radius: base_radius,
                    base_radius,
                    angular_speed: direction * rng.random_range(ORBIT_MIN_SPEED..ORBIT_MAX_SPEED),
                    size: rng.random_range(0.8..2.2),
                }
            })
            .collect();

        Self {
            sphere: SphereState::new(center),
            orbits,
            bursts: Vec::new(),
            ripples: Vec::new(),
            trail: VecDeque::with_capacity(settings.trail_length()),
            pointer: None,
            drift_time: 0.0,
            frame: 0,
            max_bursts: settings.max_burst_particles(),
            trail_length: settings.trail_length(),
            burst_scale: settings.burst_scale(),
            spin_scale: settings.spin_scale(),
            ripples_enabled: settings.ripples,
            orbit_links: settings.orbit_links(),
            rng,
        }
    }

    pub fn orbits(&self) -> &[OrbitParticle] {
        &self.orbits
    }

    /// Mutable access to individual orbits; the count cannot change
    pub fn orbits_mut(&mut self) -> &mut [OrbitParticle] {
        &mut self.orbits
    }

    /// Spawn `count` burst particles radiating from `origin`
    pub fn spawn_burst(&mut self, origin: Vec2, count: usize, speed: f32, hue: f32) {
        let count = ((count as f32) * self.burst_scale).round() as usize;
        if self.max_bursts == 0 || count == 0 {
            return;
        }

        // Make room in one pass: oldest first, then any of the new batch that can't fit
        let overflow = (self.bursts.len() + count).saturating_sub(self.max_bursts);
        let evicted = overflow.min(self.bursts.len());
        self.bursts.drain(..evicted);

        for i in (overflow - evicted)..count {
            let jitter = self.rng.random_range(-0.25..0.25);
            let angle = i as f32 / count as f32 * std::f32::consts::TAU + jitter;
            let speed = speed * self.rng.random_range(0.6..1.4);
            self.bursts.push(BurstParticle {
                pos: origin,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                alpha: BURST_BASE_ALPHA,
                size: self.rng.random_range(1.2..3.2),
                hue: hue + self.rng.random_range(-20.0..20.0),
                age: 0,
                max_age: self.rng.random_range(BURST_MIN_AGE..=BURST_MAX_AGE),
            });
        }
    }

    pub fn spawn_ripple(&mut self, origin: Vec2, max_radius: f32) {
        if !self.ripples_enabled {
            return;
        }
        self.ripples.push(Ripple::new(origin, max_radius));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::QualityPreset;

    #[test]
    fn test_orbit_count_matches_preset() {
        for preset in [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High] {
            let state = PhysicsState::new(Vec2::ZERO, &Settings::from_preset(preset), 7);
            assert_eq!(state.orbits().len(), preset.orbit_count());
            for orbit in state.orbits() {
                assert!(orbit.base_radius >= ORBIT_MIN_RADIUS && orbit.base_radius < ORBIT_MAX_RADIUS);
                assert_eq!(orbit.radius, orbit.base_radius);
            }
        }
    }

    #[test]
    fn test_burst_cap_drops_oldest() {
        let mut settings = Settings::from_preset(QualityPreset::Low);
        settings.bursts = true;
        let mut state = PhysicsState::new(Vec2::ZERO, &settings, 1);
        let cap = state.max_bursts;

        state.spawn_burst(Vec2::new(1.0, 1.0), cap, 2.0, 175.0);
        assert_eq!(state.bursts.len(), cap);
        state.spawn_burst(Vec2::new(50.0, 50.0), 10, 2.0, 175.0);
        assert_eq!(state.bursts.len(), cap);
        // Newest batch is at the back
        assert_eq!(state.bursts.last().map(|b| b.pos), Some(Vec2::new(50.0, 50.0)));
    }

    #[test]
    fn test_oversized_batch_keeps_newest() {
        let mut state = PhysicsState::new(Vec2::ZERO, &Settings::default(), 4);
        let cap = state.max_bursts;
        state.spawn_burst(Vec2::new(1.0, 1.0), 10, 2.0, 175.0);

        state.spawn_burst(Vec2::new(80.0, 80.0), cap + 25, 2.0, 175.0);
        assert_eq!(state.bursts.len(), cap);
        assert!(state.bursts.iter().all(|b| b.pos == Vec2::new(80.0, 80.0)));
    }

    #[test]
    fn test_partial_overflow_evicts_only_what_is_needed() {
        let mut state = PhysicsState::new(Vec2::ZERO, &Settings::default(), 4);
        let cap = state.max_bursts;
        state.spawn_burst(Vec2::new(1.0, 1.0), cap - 5, 2.0, 175.0);
        state.spawn_burst(Vec2::new(9.0, 9.0), 12, 2.0, 175.0);

        assert_eq!(state.bursts.len(), cap);
        let old = state.bursts.iter().filter(|b| b.pos == Vec2::new(1.0, 1.0)).count();
        assert_eq!(old, cap - 12);
    }

    #[test]
    fn test_bursts_disabled_spawns_nothing() {
        let settings = Settings {
            bursts: false,
            ..Settings::default()
        };
        let mut state = PhysicsState::new(Vec2::ZERO, &settings, 1);
        state.spawn_burst(Vec2::ZERO, 20, 3.0, 175.0);
        assert!(state.bursts.is_empty());
    }

    #[test]
    fn test_ripples_disabled_spawns_nothing() {
        let settings = Settings {
            ripples: false,
            ..Settings::default()
        };
        let mut state = PhysicsState::new(Vec2::ZERO, &settings, 1);
        state.spawn_ripple(Vec2::new(5.0, 5.0), 120.0);
        assert!(state.ripples.is_empty());
    }

    #[test]
    fn test_same_seed_same_orbits() {
        let a = PhysicsState::new(Vec2::ZERO, &Settings::default(), 42);
        let b = PhysicsState::new(Vec2::ZERO, &Settings::default(), 42);
        assert_eq!(a.orbits(), b.orbits());
    }
}
