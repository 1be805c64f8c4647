//! Frame clock
//!
//! Drives one update-then-render pass per display frame until stopped.
//! Each scheduled callback carries the generation it was requested under;
//! callbacks from an older generation are dropped, so nothing can run after
//! `stop()` even if the host fires a frame that was already in flight.

/// Opaque handle returned by the host scheduler
pub type FrameHandle = i32;

/// Host hook for "call me on the next display frame"
pub trait FrameScheduler {
    /// Request one callback, tagged with `generation`
    fn request_frame(&mut self, generation: u64) -> Option<FrameHandle>;
    /// Cancel a pending request
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug)]
pub struct FrameClock<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameHandle>,
    generation: u64,
    running: bool,
    frames: u64,
}

impl<S: FrameScheduler> FrameClock<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            generation: 0,
            running: false,
            frames: 0,
        }
    }

    /// Begin scheduling (no-op when already running)
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.generation += 1;
        self.schedule();
    }

    /// Cancel the pending frame; idempotent
    pub fn stop(&mut self) {
        if !self.running && self.pending.is_none() {
            return;
        }
        self.running = false;
        self.generation += 1;
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    /// Called at the top of a host callback. Returns false when the
    /// callback is stale and must do nothing.
    pub fn begin_frame(&mut self, generation: u64) -> bool {
        if !self.running || generation != self.generation {
            return false;
        }
        self.pending = None;
        self.frames += 1;
        true
    }

    /// Called after the step and render; reschedules while running
    pub fn end_frame(&mut self) {
        if self.running && self.pending.is_none() {
            self.schedule();
        }
    }

    fn schedule(&mut self) {
        self.pending = self.scheduler.request_frame(self.generation);
        if self.pending.is_none() {
            log::warn!("Frame request refused by host, clock idle");
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Frames accepted since creation
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}
