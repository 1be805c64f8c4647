//! The kinetic sphere widget
//!
//! Host-independent: the browser glue in `platform::web` feeds it pointer
//! events, resize notifications and frame callbacks; tests drive it directly.

use crate::platform::surface::SurfaceSize;
use crate::renderer::{Canvas2d, draw_scene};
use crate::settings::Settings;
use crate::sim::{InputSampler, PhysicsState, PointerEvent, Signals, tick};

pub struct KineticSphere {
    state: PhysicsState,
    input: InputSampler,
    signals: Signals,
    size: SurfaceSize,
}

impl KineticSphere {
    /// Build a widget for a surface of `size`; the sphere starts centred
    pub fn new(settings: &Settings, signals: Signals, size: SurfaceSize, seed: u64) -> Self {
        log::info!(
            "Kinetic sphere: {} orbits, quality {}, surface {}x{} @{}x",
            settings.orbit_count(),
            settings.quality.as_str(),
            size.width,
            size.height,
            size.dpr
        );
        Self {
            state: PhysicsState::new(size.center(), settings, seed),
            input: InputSampler::new(),
            signals,
            size,
        }
    }

    /// Apply one pointer event (mouse or touch, already normalized)
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        self.input.handle(&mut self.state, &self.signals, event);
    }

    /// Replace the external signals; read on the next frame
    pub fn set_signals(&mut self, signals: Signals) {
        self.signals = signals;
    }

    /// New surface measurements. Simulation state is kept as is.
    pub fn resize(&mut self, size: SurfaceSize) {
        if size != self.size {
            log::info!("Surface resized to {}x{} @{}x", size.width, size.height, size.dpr);
        }
        self.size = size;
    }

    /// One simulation step
    pub fn step(&mut self, now_ms: f64) {
        tick(&mut self.state, &self.signals, self.size, now_ms);
    }

    /// Paint the current state
    pub fn render(&self, canvas: &mut impl Canvas2d) {
        draw_scene(&self.state, &self.signals, self.size, canvas);
    }

    /// Step then render, the per-frame unit of work
    pub fn frame(&mut self, now_ms: f64, canvas: &mut impl Canvas2d) {
        self.step(now_ms);
        self.render(canvas);
    }

    pub fn state(&self) -> &PhysicsState {
        &self.state
    }

    pub fn signals(&self) -> Signals {
        self.signals
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn combo_level(&self) -> u32 {
        self.input.combo.level()
    }
}
