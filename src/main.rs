//! Kinetic sphere entry point
//!
//! On the web this mounts the widget on `#kinetic-sphere` and, when enabled,
//! the custom cursor. Natively it runs a short headless session and logs what
//! the simulation did.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;

    use kinetic_sphere::platform::web::{
        CursorOverlayHandle, KineticSphereHandle, init_logging, mount_cursor, mount_sphere,
    };
    use kinetic_sphere::{Settings, Signals};

    pub const CANVAS_ID: &str = "kinetic-sphere";

    thread_local! {
        static SPHERE: RefCell<Option<KineticSphereHandle>> = const { RefCell::new(None) };
        static CURSOR: RefCell<Option<CursorOverlayHandle>> = const { RefCell::new(None) };
    }

    pub fn run() {
        init_logging();
        log::info!("Kinetic sphere starting...");

        let settings = Settings::load();
        log::info!("Loaded settings: quality {}", settings.quality.as_str());

        // Pages without the canvas just don't get a sphere
        match mount_sphere(CANVAS_ID, Signals::default(), &settings) {
            Ok(handle) => SPHERE.with(|s| *s.borrow_mut() = Some(handle)),
            Err(e) => log::warn!("Kinetic sphere not mounted: {}", e),
        }

        if settings.custom_cursor {
            match mount_cursor() {
                Ok(Some(handle)) => CURSOR.with(|c| *c.borrow_mut() = Some(handle)),
                Ok(None) => log::info!("Touch device, custom cursor skipped"),
                Err(e) => log::warn!("Custom cursor not mounted: {}", e),
            }
        }
    }

    pub fn set_signals(scroll_velocity: f32, debt_level: f32) {
        SPHERE.with(|s| {
            if let Some(handle) = s.borrow().as_ref() {
                handle.set_signals(scroll_velocity, debt_level);
            }
        });
    }

    pub fn shutdown() {
        if let Some(handle) = SPHERE.with(|s| s.borrow_mut().take()) {
            handle.unmount();
        }
        if let Some(handle) = CURSOR.with(|c| c.borrow_mut().take()) {
            handle.unmount();
        }
        log::info!("Kinetic sphere shut down");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

/// Feed page scroll velocity and debt level to the auto-mounted sphere
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn update_signals(scroll_velocity: f32, debt_level: f32) {
    wasm_app::set_signals(scroll_velocity, debt_level);
}

/// Unmount everything `wasm_main` mounted
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn shutdown() {
    wasm_app::shutdown();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Kinetic sphere (native) starting...");
    log::info!("Native mode is headless - serve the wasm build for the interactive widget");

    headless_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Run a few seconds of scripted input and report draw call counts
#[cfg(not(target_arch = "wasm32"))]
fn headless_session() {
    use glam::Vec2;
    use kinetic_sphere::renderer::{Canvas2d, Fill, Hsla};
    use kinetic_sphere::sim::{PointerAction, PointerEvent};
    use kinetic_sphere::{KineticSphere, Settings, Signals, SurfaceSize};

    #[derive(Default)]
    struct CountingCanvas {
        fills: usize,
        strokes: usize,
    }

    impl Canvas2d for CountingCanvas {
        fn clear(&mut self, _width: f32, _height: f32) {}
        fn fill_circle(&mut self, _center: Vec2, _radius: f32, _fill: &Fill) {
            self.fills += 1;
        }
        fn fill_ellipse(&mut self, _center: Vec2, _radii: Vec2, _rotation: f32, _fill: &Fill) {
            self.fills += 1;
        }
        fn stroke_circle(&mut self, _center: Vec2, _radius: f32, _width: f32, _color: Hsla) {
            self.strokes += 1;
        }
        fn line(&mut self, _from: Vec2, _to: Vec2, _width: f32, _color: Hsla) {
            self.strokes += 1;
        }
    }

    const FRAME_MS: f64 = 1000.0 / 60.0;

    let settings = Settings::load();
    let mut sphere = KineticSphere::new(
        &settings,
        Signals::new(12.0, 80.0),
        SurfaceSize::new(640.0, 360.0, 2.0),
        0x5EED,
    );
    let mut canvas = CountingCanvas::default();

    let script = [
        (10, PointerAction::Move, 200.0, 150.0),
        (20, PointerAction::Click, 200.0, 150.0),
        (30, PointerAction::Click, 210.0, 150.0),
        (60, PointerAction::Down, 320.0, 180.0),
        (150, PointerAction::Up, 320.0, 180.0),
        (200, PointerAction::Leave, 0.0, 0.0),
    ];

    for frame in 0..300u32 {
        let now = frame as f64 * FRAME_MS;
        for &(at, action, x, y) in &script {
            if at == frame {
                sphere.handle_pointer(PointerEvent::mouse(action, x, y, now));
            }
        }
        sphere.frame(now, &mut canvas);

        if frame % 60 == 0 {
            let state = sphere.state();
            log::info!(
                "frame {:3}: sphere ({:.1}, {:.1}) bursts {} ripples {} trail {}",
                frame,
                state.sphere.pos.x,
                state.sphere.pos.y,
                state.bursts.len(),
                state.ripples.len(),
                state.trail.len()
            );
        }
    }

    log::info!(
        "Headless session done: {} fills, {} strokes, combo {}",
        canvas.fills,
        canvas.strokes,
        sphere.combo_level()
    );
}
