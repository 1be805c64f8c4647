//! Mount / teardown lifecycle
//!
//! A `Mount` owns everything a mounted component holds on the host: the frame
//! clock, the registered event listeners and the model itself. `teardown()`
//! releases all three in one call.

use super::clock::{FrameClock, FrameScheduler};

/// A registered host event listener
pub trait Listener {
    /// Unregister from the host
    fn detach(self);
}

/// Apply `attach` to each item in order. If one fails, the items already
/// attached are detached again, newest first, and the error is returned.
pub fn attach_all<T, E>(
    items: &[T],
    mut attach: impl FnMut(&T) -> Result<(), E>,
    mut detach: impl FnMut(&T),
) -> Result<(), E> {
    for (i, item) in items.iter().enumerate() {
        if let Err(e) = attach(item) {
            items[..i].iter().rev().for_each(&mut detach);
            return Err(e);
        }
    }
    Ok(())
}

pub struct Mount<M, S: FrameScheduler, L: Listener> {
    clock: FrameClock<S>,
    listeners: Vec<L>,
    model: Option<M>,
}

impl<M, S: FrameScheduler, L: Listener> Mount<M, S, L> {
    pub fn new(model: M, scheduler: S) -> Self {
        Self {
            clock: FrameClock::new(scheduler),
            listeners: Vec::new(),
            model: Some(model),
        }
    }

    /// Keep a listener so teardown can remove it. Ignored after teardown.
    pub fn attach(&mut self, listener: L) {
        if self.model.is_none() {
            listener.detach();
            return;
        }
        self.listeners.push(listener);
    }

    /// Start the frame loop
    pub fn start(&mut self) {
        if self.model.is_some() {
            self.clock.start();
        }
    }

    /// Run one frame for a host callback tagged `generation`.
    /// Returns false for stale callbacks (after stop / teardown).
    pub fn on_frame(&mut self, generation: u64, frame: impl FnOnce(&mut M)) -> bool {
        if !self.clock.begin_frame(generation) {
            return false;
        }
        if let Some(model) = self.model.as_mut() {
            frame(model);
        }
        self.clock.end_frame();
        true
    }

    /// Stop the loop, detach listeners, drop the model. Idempotent.
    pub fn teardown(&mut self) {
        self.clock.stop();
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
        if self.model.take().is_some() {
            log::info!("Unmounted");
        }
    }

    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> Option<&mut M> {
        self.model.as_mut()
    }

    pub fn is_mounted(&self) -> bool {
        self.model.is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_scheduled(&self) -> bool {
        self.clock.is_scheduled()
    }

    pub fn clock(&self) -> &FrameClock<S> {
        &self.clock
    }
}

impl<M, S: FrameScheduler, L: Listener> Drop for Mount<M, S, L> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::clock::testing::ManualScheduler;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Counts live registrations on a fake host
    struct FakeListener {
        live: Rc<Cell<usize>>,
    }

    impl FakeListener {
        fn register(live: &Rc<Cell<usize>>) -> Self {
            live.set(live.get() + 1);
            Self { live: live.clone() }
        }
    }

    impl Listener for FakeListener {
        fn detach(self) {
            self.live.set(self.live.get() - 1);
        }
    }

    fn mounted(live: &Rc<Cell<usize>>) -> Mount<u32, ManualScheduler, FakeListener> {
        let mut mount = Mount::new(0u32, ManualScheduler::default());
        for _ in 0..6 {
            mount.attach(FakeListener::register(live));
        }
        mount.start();
        mount
    }

    #[test]
    fn test_frames_run_model() {
        let live = Rc::new(Cell::new(0));
        let mut mount = mounted(&live);
        for _ in 0..3 {
            let generation = mount.clock().scheduler().fire().unwrap();
            assert!(mount.on_frame(generation, |n| *n += 1));
        }
        assert_eq!(mount.model(), Some(&3));
    }

    #[test]
    fn test_teardown_twice() {
        let live = Rc::new(Cell::new(0));
        let mut mount = mounted(&live);
        assert_eq!(live.get(), 6);
        assert!(mount.is_scheduled());

        for _ in 0..2 {
            mount.teardown();
            assert_eq!(live.get(), 0);
            assert_eq!(mount.listener_count(), 0);
            assert!(!mount.is_scheduled());
            assert_eq!(mount.clock().scheduler().pending(), 0);
            assert!(!mount.is_mounted());
        }
    }

    #[test]
    fn test_no_frame_after_teardown() {
        let live = Rc::new(Cell::new(0));
        let mut mount = mounted(&live);
        let in_flight = mount.clock().generation();
        mount.teardown();

        let mut ran = false;
        assert!(!mount.on_frame(in_flight, |_| ran = true));
        assert!(!ran);

        // Restarting a torn-down mount does nothing
        mount.start();
        assert!(!mount.is_scheduled());
    }

    #[test]
    fn test_attach_after_teardown_detaches_immediately() {
        let live = Rc::new(Cell::new(0));
        let mut mount = mounted(&live);
        mount.teardown();
        mount.attach(FakeListener::register(&live));
        assert_eq!(live.get(), 0);
        assert_eq!(mount.listener_count(), 0);
    }

    #[test]
    fn test_drop_tears_down() {
        let live = Rc::new(Cell::new(0));
        {
            let _mount = mounted(&live);
            assert_eq!(live.get(), 6);
        }
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_attach_all_rolls_back_on_failure() {
        let page = RefCell::new(Vec::new());
        let attach = |node: &&'static str| {
            if *node == "style" {
                return Err("head is read-only");
            }
            page.borrow_mut().push(*node);
            Ok(())
        };
        let detach = |node: &&'static str| page.borrow_mut().retain(|n| n != node);

        let result = attach_all(&["dot", "ring", "style"], attach, detach);
        assert_eq!(result, Err("head is read-only"));
        assert!(page.borrow().is_empty());

        let result = attach_all(&["dot", "ring"], attach, detach);
        assert_eq!(result, Ok(()));
        assert_eq!(*page.borrow(), vec!["dot", "ring"]);
    }
}
