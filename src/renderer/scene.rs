//! Scene pass: physics state to pixels
//!
//! Takes the state by shared reference only. Layering order, back to front:
//! trail, orbit links, orbits, glow rings, ambient glow, charge halo, sphere
//! body, specular highlight, bursts, ripples.

use glam::Vec2;

use super::{Canvas2d, Fill, Hsla, RadialGradient};
use crate::consts::*;
use crate::platform::surface::SurfaceSize;
use crate::proximity;
use crate::sim::{PhysicsState, Signals};

/// Base teal the palette is authored in; debt rotates away from it
const BASE_HUE: f32 = 175.0;

/// Paint one frame
pub fn draw_scene(
    state: &PhysicsState,
    signals: &Signals,
    size: SurfaceSize,
    canvas: &mut impl Canvas2d,
) {
    if size.is_empty() {
        return;
    }

    canvas.clear(size.width, size.height);

    let palette = Palette::new(signals);
    draw_trail(state, &palette, canvas);
    draw_orbits(state, &palette, canvas);
    draw_glow(state, signals, &palette, canvas);
    draw_sphere(state, &palette, canvas);
    draw_bursts(state, canvas);
    draw_ripples(state, &palette, canvas);
}

/// Colours for the current debt level
struct Palette {
    shift: f32,
}

impl Palette {
    fn new(signals: &Signals) -> Self {
        Self {
            shift: signals.hue() - BASE_HUE,
        }
    }

    fn hsla(&self, h: f32, s: f32, l: f32, a: f32) -> Hsla {
        Hsla::new(h, s, l, a).rotate(self.shift)
    }
}

fn draw_trail(state: &PhysicsState, palette: &Palette, canvas: &mut impl Canvas2d) {
    for point in &state.trail {
        canvas.fill_circle(
            point.pos,
            2.0,
            &Fill::Solid(palette.hsla(175.0, 80.0, 40.0, point.alpha)),
        );
    }
}

fn draw_orbits(state: &PhysicsState, palette: &Palette, canvas: &mut impl Canvas2d) {
    let center = state.sphere.pos;
    let points: Vec<Vec2> = state.orbits().iter().map(|o| center + o.offset()).collect();

    // Connective lines between neighbours on the ring
    if state.orbit_links {
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                let d = a.distance(*b);
                if d < ORBIT_LINK_DISTANCE {
                    let alpha = 0.12 * proximity(d, ORBIT_LINK_DISTANCE);
                    canvas.line(*a, *b, 0.5, palette.hsla(175.0, 70.0, 55.0, alpha));
                }
            }
        }
    }

    for (orbit, pos) in state.orbits().iter().zip(&points) {
        // Particles near the pointer brighten
        let lit = state
            .pointer
            .map(|p| proximity(pos.distance(p), MAGNET_RANGE))
            .unwrap_or(0.0);
        let color = palette.hsla(180.0, 75.0, 55.0 + lit * 15.0, 0.35 + lit * 0.5);
        canvas.fill_circle(*pos, orbit.size, &Fill::Solid(color));
    }
}

fn draw_glow(state: &PhysicsState, signals: &Signals, palette: &Palette, canvas: &mut impl Canvas2d) {
    let center = state.sphere.pos;
    let speed = state.sphere.vel.length();
    let scale = signals.glow_scale() * (1.0 + (speed * 0.02).min(0.4));
    let intensity = 0.6 + 0.4 * signals.debt_fraction();

    for i in 0..3 {
        let i = i as f32;
        let radius = (SPHERE_RADIUS + 14.0 + i * 12.0) * scale;
        let alpha = (0.18 - i * 0.05) * intensity;
        canvas.stroke_circle(center, radius, 1.0, palette.hsla(175.0, 80.0, 50.0, alpha));
    }

    let radius = GLOW_RADIUS * signals.glow_scale();
    let gradient = RadialGradient::centered(center, radius)
        .stop(0.0, palette.hsla(175.0, 80.0, 50.0, 0.25))
        .stop(1.0, palette.hsla(175.0, 80.0, 50.0, 0.0));
    canvas.fill_circle(center, radius, &Fill::Radial(gradient));

    let sphere = &state.sphere;
    if sphere.holding && sphere.hold_charge > 0.0 {
        let charge = sphere.hold_charge;
        canvas.stroke_circle(
            center,
            SPHERE_RADIUS + 6.0 + charge * 20.0,
            1.5 + charge * 1.5,
            palette.hsla(185.0, 90.0, 65.0, 0.3 + charge * 0.5),
        );
    }
}

/// Squash/stretch factor from speed: >1 along the motion, 1/x across it
pub fn stretch_factor(speed: f32) -> f32 {
    1.0 + (speed * 0.03).min(0.45)
}

fn draw_sphere(state: &PhysicsState, palette: &Palette, canvas: &mut impl Canvas2d) {
    let center = state.sphere.pos;
    let vel = state.sphere.vel;
    let speed = vel.length();
    let stretch = stretch_factor(speed);
    let rotation = if speed > 1e-3 { vel.y.atan2(vel.x) } else { 0.0 };

    let body = RadialGradient {
        inner: center - Vec2::splat(5.0),
        inner_radius: 0.0,
        outer: center,
        outer_radius: SPHERE_RADIUS * stretch,
        stops: Vec::new(),
    }
    .stop(0.0, palette.hsla(185.0, 65.0, 60.0, 1.0))
    .stop(0.7, palette.hsla(175.0, 80.0, 40.0, 1.0))
    .stop(1.0, palette.hsla(175.0, 80.0, 30.0, 0.8));
    canvas.fill_ellipse(
        center,
        Vec2::new(SPHERE_RADIUS * stretch, SPHERE_RADIUS / stretch),
        rotation,
        &Fill::Radial(body),
    );

    // Specular highlight, upper left
    let spot = center - Vec2::splat(6.0);
    let highlight = RadialGradient::centered(spot, 6.0)
        .stop(0.0, Hsla::new(0.0, 0.0, 100.0, 0.55))
        .stop(1.0, Hsla::new(0.0, 0.0, 100.0, 0.0));
    canvas.fill_circle(spot, 6.0, &Fill::Radial(highlight));
}

fn draw_bursts(state: &PhysicsState, canvas: &mut impl Canvas2d) {
    for p in &state.bursts {
        canvas.fill_circle(
            p.pos,
            p.size * 3.0,
            &Fill::Solid(Hsla::new(p.hue, 85.0, 55.0, p.alpha * 0.15)),
        );
        canvas.fill_circle(p.pos, p.size, &Fill::Solid(Hsla::new(p.hue, 85.0, 60.0, p.alpha)));
    }
}

fn draw_ripples(state: &PhysicsState, palette: &Palette, canvas: &mut impl Canvas2d) {
    const LAYERS: [(f32, f32, f32); 3] = [(1.0, 1.0, 2.0), (0.8, 0.6, 1.5), (0.6, 0.3, 1.0)];

    for ripple in &state.ripples {
        for (scale, fade, width) in LAYERS {
            let radius = ripple.radius * scale;
            if radius <= 0.0 {
                continue;
            }
            canvas.stroke_circle(
                ripple.origin,
                radius,
                width,
                palette.hsla(175.0, 80.0, 55.0, ripple.alpha * fade),
            );
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
        Clear,
        Circle { center: Vec2, radius: f32, radial: bool },
        Ellipse { radii: Vec2, rotation: f32 },
        Stroke { center: Vec2, radius: f32 },
        Line,
    }

    /// Records draw calls instead of painting
    #[derive(Debug, Default)]
    pub struct RecordingCanvas {
        pub ops: Vec<Op>,
    }

    impl Canvas2d for RecordingCanvas {
        fn clear(&mut self, _width: f32, _height: f32) {
            self.ops.push(Op::Clear);
        }

        fn fill_circle(&mut self, center: Vec2, radius: f32, fill: &Fill) {
            let radial = matches!(fill, Fill::Radial(_));
            self.ops.push(Op::Circle { center, radius, radial });
        }

        fn fill_ellipse(&mut self, _center: Vec2, radii: Vec2, rotation: f32, _fill: &Fill) {
            self.ops.push(Op::Ellipse { radii, rotation });
        }

        fn stroke_circle(&mut self, center: Vec2, radius: f32, _width: f32, _color: Hsla) {
            self.ops.push(Op::Stroke { center, radius });
        }

        fn line(&mut self, _from: Vec2, _to: Vec2, _width: f32, _color: Hsla) {
            self.ops.push(Op::Line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{Op, RecordingCanvas};
    use super::*;
    use crate::settings::{QualityPreset, Settings};

    const SIZE: SurfaceSize = SurfaceSize::new(400.0, 300.0, 2.0);

    fn state() -> PhysicsState {
        PhysicsState::new(SIZE.center(), &Settings::default(), 5)
    }

    #[test]
    fn test_zero_surface_draws_nothing() {
        let mut canvas = RecordingCanvas::default();
        draw_scene(&state(), &Signals::default(), SurfaceSize::default(), &mut canvas);
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn test_layer_order() {
        let mut state = state();
        state.spawn_ripple(Vec2::new(50.0, 50.0), 100.0);
        state.ripples[0].radius = 30.0;
        state.spawn_burst(Vec2::new(300.0, 200.0), 4, 2.0, 175.0);

        let mut canvas = RecordingCanvas::default();
        draw_scene(&state, &Signals::default(), SIZE, &mut canvas);
        let ops = &canvas.ops;

        assert_eq!(ops[0], Op::Clear);
        let ellipse = ops.iter().position(|op| matches!(op, Op::Ellipse { .. })).unwrap();
        let first_burst = ops
            .iter()
            .position(|op| matches!(op, Op::Circle { center, .. } if *center == Vec2::new(300.0, 200.0)))
            .unwrap();
        let last_orbit = ops
            .iter()
            .rposition(|op| matches!(op, Op::Circle { radial: false, center, .. } if *center != Vec2::new(300.0, 200.0)))
            .unwrap();
        assert!(last_orbit < ellipse);
        assert!(ellipse < first_burst);

        // Ripple strokes close the frame, three per ripple
        let tail: Vec<_> = ops.iter().rev().take(3).collect();
        assert!(tail.iter().all(|op| matches!(op, Op::Stroke { center, .. } if *center == Vec2::new(50.0, 50.0))));
    }

    #[test]
    fn test_orbit_count_drawn() {
        let state = state();
        let mut canvas = RecordingCanvas::default();
        draw_scene(&state, &Signals::default(), SIZE, &mut canvas);
        let orbit_dots = canvas
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Circle { radial: false, .. }))
            .count();
        assert_eq!(orbit_dots, state.orbits().len());
    }

    #[test]
    fn test_low_quality_skips_orbit_links() {
        let high = PhysicsState::new(SIZE.center(), &Settings::from_preset(QualityPreset::High), 5);
        let low = PhysicsState::new(SIZE.center(), &Settings::from_preset(QualityPreset::Low), 5);
        assert!(high.orbit_links);
        assert!(!low.orbit_links);

        let mut canvas = RecordingCanvas::default();
        draw_scene(&low, &Signals::default(), SIZE, &mut canvas);
        assert!(!canvas.ops.iter().any(|op| matches!(op, Op::Line)));
    }

    #[test]
    fn test_fast_sphere_stretches_along_motion() {
        let mut state = state();
        state.sphere.vel = Vec2::new(0.0, 12.0);
        let mut canvas = RecordingCanvas::default();
        draw_scene(&state, &Signals::default(), SIZE, &mut canvas);

        let Some(Op::Ellipse { radii, rotation }) =
            canvas.ops.iter().find(|op| matches!(op, Op::Ellipse { .. })).cloned()
        else {
            panic!("sphere body not drawn");
        };
        assert!(radii.x > radii.y);
        assert!((rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_debt_widens_glow() {
        let state = state();
        let glow_radius = |signals: Signals| {
            let mut canvas = RecordingCanvas::default();
            draw_scene(&state, &signals, SIZE, &mut canvas);
            canvas
                .ops
                .iter()
                .find_map(|op| match op {
                    Op::Circle { radius, radial: true, .. } if *radius >= GLOW_RADIUS => Some(*radius),
                    _ => None,
                })
                .unwrap()
        };
        assert!(glow_radius(Signals::new(0.0, 90.0)) > glow_radius(Signals::default()));
    }

    #[test]
    fn test_render_leaves_state_untouched() {
        let mut state = state();
        state.spawn_burst(Vec2::new(10.0, 10.0), 5, 1.0, 175.0);
        let before = (state.sphere.clone(), state.bursts.clone(), state.orbits().to_vec());
        let mut canvas = RecordingCanvas::default();
        draw_scene(&state, &Signals::new(5.0, 80.0), SIZE, &mut canvas);
        assert_eq!(before, (state.sphere.clone(), state.bursts.clone(), state.orbits().to_vec()));
    }
}
