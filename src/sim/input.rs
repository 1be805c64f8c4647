//! Pointer input model
//!
//! Mouse and touch events are translated into one `PointerEvent` type at the
//! platform boundary; everything past this point is source-agnostic.

use glam::Vec2;

use super::state::PhysicsState;
use super::Signals;
use crate::consts::*;

/// What the pointer did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Move,
    Down,
    Up,
    Click,
    /// Pointer left the surface
    Leave,
}

/// A normalized pointer event in surface CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub pos: Vec2,
    /// Event timestamp (ms, same clock as the frame timestamp)
    pub time_ms: f64,
}

impl PointerEvent {
    /// From a mouse event already offset into the surface
    pub fn mouse(action: PointerAction, x: f32, y: f32, time_ms: f64) -> Self {
        Self {
            action,
            pos: Vec2::new(x, y),
            time_ms,
        }
    }

    /// From the primary touch point, given in client coordinates, and the
    /// surface's client-space origin
    pub fn touch(action: PointerAction, client: Vec2, surface_origin: Vec2, time_ms: f64) -> Self {
        Self {
            action,
            pos: client - surface_origin,
            time_ms,
        }
    }
}

/// Pointer actions for a DOM touch event type, in dispatch order.
///
/// The touch surface calls `preventDefault`, which swallows the browser's
/// synthetic click, so a lifted finger also clicks. Unknown types map to
/// nothing.
pub fn touch_actions(kind: &str) -> &'static [PointerAction] {
    match kind {
        "touchstart" => &[PointerAction::Down],
        "touchmove" => &[PointerAction::Move],
        "touchend" => &[PointerAction::Up, PointerAction::Click],
        "touchcancel" => &[PointerAction::Up, PointerAction::Leave],
        _ => &[],
    }
}

/// Rapid-click counter
#[derive(Debug, Clone, Default)]
pub struct ComboTracker {
    count: u32,
    last_click_ms: Option<f64>,
}

impl ComboTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a click, returns the combo level (1..=MAX_COMBO)
    pub fn register(&mut self, time_ms: f64) -> u32 {
        self.count = match self.last_click_ms {
            Some(last) if time_ms - last <= COMBO_WINDOW_MS => (self.count + 1).min(MAX_COMBO),
            _ => 1,
        };
        self.last_click_ms = Some(time_ms);
        self.count
    }

    pub fn level(&self) -> u32 {
        self.count
    }
}

/// Applies pointer events to the physics state
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    pub combo: ComboTracker,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch one event
    pub fn handle(&mut self, state: &mut PhysicsState, signals: &Signals, event: PointerEvent) {
        match event.action {
            PointerAction::Move => on_pointer_move(state, event.pos),
            PointerAction::Down => on_pointer_down(state, event.pos, event.time_ms),
            PointerAction::Up => on_pointer_up(state, signals),
            PointerAction::Click => {
                let combo = self.combo.register(event.time_ms);
                on_click(state, signals, event.pos, combo);
            }
            PointerAction::Leave => {
                if !state.sphere.dragging {
                    state.pointer = None;
                }
            }
        }
    }
}

/// Track the pointer; while dragging, the sphere follows it directly
pub fn on_pointer_move(state: &mut PhysicsState, pos: Vec2) {
    state.pointer = Some(pos);

    let sphere = &mut state.sphere;
    if sphere.dragging {
        let target = pos + sphere.drag_offset;
        sphere.vel = (target - sphere.pos) * DRAG_GAIN;
        sphere.pos = target;
    }
}

/// Start charging; grab the sphere if the pointer is close enough
pub fn on_pointer_down(state: &mut PhysicsState, pos: Vec2, time_ms: f64) {
    state.pointer = Some(pos);

    let sphere = &mut state.sphere;
    if sphere.pos.distance(pos) <= CAPTURE_RADIUS {
        sphere.dragging = true;
        sphere.drag_offset = sphere.pos - pos;
    }

    sphere.holding = true;
    sphere.hold_charge = 0.0;
    sphere.hold_start_ms = time_ms;
}

/// Release; a charged hold bursts from the sphere
pub fn on_pointer_up(state: &mut PhysicsState, signals: &Signals) {
    state.sphere.dragging = false;
    state.sphere.holding = false;

    let charge = state.sphere.hold_charge;
    state.sphere.hold_charge = 0.0;

    if charge > MIN_HOLD_CHARGE {
        let origin = state.sphere.pos;
        let count = (8.0 + charge * 32.0).round() as usize;
        let speed = (3.0 + charge * 5.0) * signals.speed_scale();
        state.spawn_burst(origin, count, speed, signals.hue());
        state.spawn_ripple(origin, 80.0 + charge * 220.0);
        log::debug!("Charged release: charge {:.2}, {} particles", charge, count);
    }
}

/// Click: ripple + burst at the click point, scaled by combo level
pub fn on_click(state: &mut PhysicsState, signals: &Signals, pos: Vec2, combo: u32) {
    let combo_f = combo as f32;
    state.spawn_ripple(pos, 60.0 + combo_f * 30.0);

    let count = 6 + combo as usize * 4;
    let speed = (2.0 + combo_f * 0.8) * signals.speed_scale();
    state.spawn_burst(pos, count, speed, signals.hue());
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn combo_level_stays_in_range(gaps in prop::collection::vec(0.0f64..1000.0, 1..50)) {
            let mut combo = ComboTracker::new();
            let mut t = 0.0;
            let mut prev = 0;
            for gap in gaps {
                t += gap;
                let level = combo.register(t);
                prop_assert!((1..=MAX_COMBO).contains(&level));
                if gap <= COMBO_WINDOW_MS {
                    prop_assert!(level == (prev + 1).min(MAX_COMBO) || prev == 0);
                } else {
                    prop_assert_eq!(level, 1);
                }
                prev = level;
            }
        }
    }
}
