//! Per-frame simulation step
//!
//! One call advances every entity by one nominal frame. No delta-time
//! correction: the effect is decorative and tuned per frame.

use glam::Vec2;

use super::Signals;
use super::state::{BurstParticle, PhysicsState, Ripple, SphereState};
use crate::consts::*;
use crate::platform::surface::SurfaceSize;
use crate::proximity;

/// Advance the simulation by one frame
///
/// `now_ms` is the frame timestamp, on the same clock as pointer event
/// timestamps. A zero-area surface skips the step entirely.
pub fn tick(state: &mut PhysicsState, signals: &Signals, size: SurfaceSize, now_ms: f64) {
    if size.is_empty() {
        return;
    }

    state.frame += 1;
    state.drift_time += DRIFT_STEP;

    // Sphere first: everything below is anchored on its position
    let target = sphere_target(state.pointer, size, state.drift_time);
    step_sphere(&mut state.sphere, target);
    charge_hold(&mut state.sphere, now_ms);

    step_orbits(state, signals);
    step_bursts(&mut state.bursts);
    step_ripples(&mut state.ripples);
    step_trail(state);
}

/// Idle Lissajous path around the surface centre
pub fn drift_target(size: SurfaceSize, t: f32) -> Vec2 {
    let (w, h) = (size.width, size.height);
    Vec2::new(
        w / 2.0 + (t * DRIFT_FREQ_X).sin() * w * DRIFT_AMPLITUDE_X,
        h / 2.0 + (t * DRIFT_FREQ_Y).cos() * h * DRIFT_AMPLITUDE_Y,
    )
}

/// Spring target: the drift point, pulled part-way toward the pointer
pub fn sphere_target(pointer: Option<Vec2>, size: SurfaceSize, t: f32) -> Vec2 {
    let drift = drift_target(size, t);
    match pointer {
        Some(p) => drift.lerp(p, POINTER_INFLUENCE),
        None => drift,
    }
}

/// Damped spring toward `target`; held spheres stay where the pointer put them
pub fn step_sphere(sphere: &mut SphereState, target: Vec2) {
    if sphere.dragging {
        sphere.vel *= DRAG_VELOCITY_DECAY;
        return;
    }

    sphere.vel += (target - sphere.pos) * SPRING_STIFFNESS;
    sphere.vel *= SPRING_DAMPING;
    sphere.pos += sphere.vel;
}

/// Charge grows with hold time, capped
pub fn charge_hold(sphere: &mut SphereState, now_ms: f64) {
    if !sphere.holding {
        return;
    }
    let held_secs = ((now_ms - sphere.hold_start_ms) / 1000.0).max(0.0) as f32;
    sphere.hold_charge = (held_secs * HOLD_CHARGE_RATE).min(MAX_HOLD_CHARGE);
}

/// Spin orbits; the pointer pulls nearby ones inward
fn step_orbits(state: &mut PhysicsState, signals: &Signals) {
    let center = state.sphere.pos;
    let pointer = state.pointer;
    let spin = signals.spin_scale() * state.spin_scale;

    for orbit in state.orbits_mut() {
        orbit.angle = (orbit.angle + orbit.angular_speed * spin) % std::f32::consts::TAU;

        let pull = pointer
            .map(|p| proximity((center + orbit.offset()).distance(p), MAGNET_RANGE))
            .unwrap_or(0.0);
        let target_radius = orbit.base_radius * (1.0 - MAGNET_STRENGTH * pull);
        orbit.radius += (target_radius - orbit.radius) * ORBIT_RADIUS_EASE;
    }
}

/// Drag, integrate, age; expired particles are compacted out in place
pub fn step_bursts(bursts: &mut Vec<BurstParticle>) {
    for p in bursts.iter_mut() {
        p.vel *= BURST_DRAG;
        p.pos += p.vel;
        p.age += 1;
        p.alpha = BURST_BASE_ALPHA * p.life();
    }
    bursts.retain(BurstParticle::is_alive);
}

/// Grow linearly, fade geometrically
pub fn step_ripples(ripples: &mut Vec<Ripple>) {
    for r in ripples.iter_mut() {
        r.radius = (r.radius + r.max_radius / RIPPLE_GROW_FRAMES).min(r.max_radius);
        r.alpha *= RIPPLE_DECAY;
    }
    ripples.retain(Ripple::is_alive);
}

/// Fade existing points, then record the sphere
fn step_trail(state: &mut PhysicsState) {
    for point in state.trail.iter_mut() {
        point.alpha *= TRAIL_DECAY;
    }
    if state.trail_length == 0 {
        state.trail.clear();
        return;
    }
    state.trail.push_back(super::state::TrailPoint {
        pos: state.sphere.pos,
        alpha: TRAIL_START_ALPHA,
    });
    while state.trail.len() > state.trail_length {
        state.trail.pop_front();
    }
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;
    use crate::settings::Settings;
    use crate::sim::input::{on_pointer_down, on_pointer_move};

    const SIZE: SurfaceSize = SurfaceSize::new(400.0, 300.0, 1.0);

    fn vec2(range: f32) -> impl Strategy<Value = Vec2> {
        (-range..range, -range..range).prop_map(|(x, y)| Vec2::new(x, y))
    }

    proptest! {
        #[test]
        fn burst_alpha_never_rises(
            seed in any::<u64>(),
            origin in vec2(500.0),
            count in 1usize..60,
            speed in 0.5f32..10.0,
        ) {
            let mut state = PhysicsState::new(SIZE.center(), &Settings::default(), seed);
            state.spawn_burst(origin, count, speed, 175.0);

            let mut prev_len = state.bursts.len();
            let mut prev_alpha: Vec<f32> = state.bursts.iter().map(|b| b.alpha).collect();
            for _ in 0..=BURST_MAX_AGE {
                step_bursts(&mut state.bursts);
                prop_assert!(state.bursts.len() <= prev_len);
                for b in &state.bursts {
                    prop_assert!(b.alpha >= BURST_ALPHA_FLOOR);
                    prop_assert!(b.alpha <= BURST_BASE_ALPHA);
                }
                if state.bursts.len() == prev_len {
                    for (b, before) in state.bursts.iter().zip(&prev_alpha) {
                        prop_assert!(b.alpha <= *before);
                    }
                }
                prev_len = state.bursts.len();
                prev_alpha = state.bursts.iter().map(|b| b.alpha).collect();
            }
            prop_assert!(state.bursts.is_empty());
        }

        #[test]
        fn ripples_grow_fade_and_expire(origin in vec2(500.0), max_radius in 10.0f32..400.0) {
            let mut ripples = vec![Ripple::new(origin, max_radius)];
            let mut last = ripples[0];
            for _ in 0..60 {
                step_ripples(&mut ripples);
                match ripples.first() {
                    Some(r) => {
                        prop_assert!(r.radius >= last.radius);
                        prop_assert!(r.radius <= max_radius);
                        prop_assert!(r.alpha < last.alpha);
                        last = *r;
                    }
                    None => break,
                }
            }
            prop_assert!(ripples.is_empty());
        }

        #[test]
        fn drag_keeps_grab_offset(
            grab in vec2(CAPTURE_RADIUS * 0.7),
            moves in prop::collection::vec(vec2(1000.0), 1..10),
        ) {
            let mut state = PhysicsState::new(SIZE.center(), &Settings::default(), 9);
            let start = state.sphere.pos;
            on_pointer_down(&mut state, start + grab, 0.0);
            prop_assert!(state.sphere.dragging);
            let offset = state.sphere.drag_offset;

            for (i, p) in moves.into_iter().enumerate() {
                on_pointer_move(&mut state, p);
                tick(&mut state, &Signals::default(), SIZE, i as f64 * 16.0);
                prop_assert!((state.sphere.pos - (p + offset)).length() < 1e-3);
            }
        }

        #[test]
        fn orbit_count_survives_any_session(
            seed in any::<u64>(),
            pointers in prop::collection::vec(prop::option::of(vec2(600.0)), 1..40),
            scroll in -200.0f32..200.0,
        ) {
            let mut state = PhysicsState::new(SIZE.center(), &Settings::default(), seed);
            let count = state.orbits().len();
            let signals = Signals::new(scroll, 50.0);
            for (i, pointer) in pointers.into_iter().enumerate() {
                state.pointer = pointer;
                tick(&mut state, &signals, SIZE, i as f64 * 16.0);
                prop_assert_eq!(state.orbits().len(), count);
                for orbit in state.orbits() {
                    prop_assert!(orbit.radius > 0.0 && orbit.radius <= orbit.base_radius + 1e-3);
                }
            }
        }
    }
}
