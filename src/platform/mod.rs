//! Platform layer
//!
//! Everything here except `web` builds natively so the lifecycle logic can be
//! tested without a browser:
//! - `surface`: CSS size and device pixel ratio of the drawing surface
//! - `clock`: frame scheduling with stale-callback protection
//! - `mount`: owns listeners and the frame clock, tears both down once
//! - `web`: DOM glue (wasm32 only)

pub mod clock;
pub mod mount;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use clock::{FrameClock, FrameHandle, FrameScheduler};
pub use mount::{Listener, Mount};
pub use surface::SurfaceSize;
