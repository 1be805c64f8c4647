//! Browser glue
//!
//! requestAnimationFrame scheduling, DOM listeners and the handles exported
//! to JavaScript. Each mounted component lives in an `Rc<RefCell<..>>`;
//! the frame loop and every listener only hold `Weak` references to it, so
//! dropping the handle (or calling `unmount`) is enough to stop everything.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Document, Element, Event, EventTarget,
    HtmlCanvasElement, HtmlElement, MouseEvent, Node, TouchEvent, Window,
};

use super::clock::{FrameHandle, FrameScheduler};
use super::mount::{Listener, Mount, attach_all};
use super::surface::SurfaceSize;
use crate::cursor::{self, CursorFollower};
use crate::error::MountError;
use crate::renderer::canvas::CanvasPainter;
use crate::settings::Settings;
use crate::sim::{PointerAction, PointerEvent, Signals, touch_actions};
use crate::widget::KineticSphere;

/// Install the console logger and panic hook (safe to call repeatedly)
pub fn init_logging() {
    console_error_panic_hook::set_once();
    // Already initialised by an earlier mount: fine
    let _ = console_log::init_with_level(log::Level::Info);
}

/// A DOM event listener, removed again on `detach`
pub struct DomListener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl DomListener {
    /// Register `handler`. `passive: Some(false)` is needed for handlers that
    /// call `preventDefault` on touch events.
    pub fn register(
        target: &EventTarget,
        kind: &'static str,
        passive: Option<bool>,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        match passive {
            Some(passive) => {
                let options = AddEventListenerOptions::new();
                options.set_passive(passive);
                target.add_event_listener_with_callback_and_add_event_listener_options(
                    kind,
                    closure.as_ref().unchecked_ref(),
                    &options,
                )?;
            }
            None => {
                target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?
            }
        }
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }
}

impl Listener for DomListener {
    fn detach(self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// requestAnimationFrame scheduler calling back into a `T`
pub struct RafScheduler<T> {
    window: Window,
    target: Weak<RefCell<T>>,
    on_frame: fn(&RefCell<T>, u64, f64),
}

impl<T> RafScheduler<T> {
    pub fn new(window: Window, target: Weak<RefCell<T>>, on_frame: fn(&RefCell<T>, u64, f64)) -> Self {
        Self {
            window,
            target,
            on_frame,
        }
    }
}

impl<T: 'static> FrameScheduler for RafScheduler<T> {
    fn request_frame(&mut self, generation: u64) -> Option<FrameHandle> {
        let target = self.target.clone();
        let on_frame = self.on_frame;
        // Freed when invoked; a cancelled request never runs and is leaked
        let callback = Closure::once_into_js(move |time: f64| {
            if let Some(target) = target.upgrade() {
                on_frame(&target, generation, time);
            }
        });
        self.window
            .request_animation_frame(callback.unchecked_ref())
            .map_err(|e| log::warn!("requestAnimationFrame failed: {:?}", e))
            .ok()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle);
    }
}

/// Register on `target` and hand the listener to the mount
fn listen<M, S: FrameScheduler>(
    mount: &mut Mount<M, S, DomListener>,
    target: &EventTarget,
    kind: &'static str,
    passive: Option<bool>,
    handler: impl FnMut(Event) + 'static,
) {
    match DomListener::register(target, kind, passive, handler) {
        Ok(listener) => mount.attach(listener),
        Err(e) => log::warn!("Failed to listen for '{}': {:?}", kind, e),
    }
}

fn dom_parts() -> Result<(Window, Document), MountError> {
    let window = web_sys::window().ok_or(MountError::NoWindow)?;
    let document = window.document().ok_or(MountError::NoDocument)?;
    Ok((window, document))
}

// ---------------------------------------------------------------------------
// Kinetic sphere
// ---------------------------------------------------------------------------

/// Model owned by the sphere's mount: the widget plus its drawing surface
struct SphereView {
    widget: KineticSphere,
    window: Window,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

/// Current CSS size and device pixel ratio of `canvas`
fn measure(window: &Window, canvas: &HtmlCanvasElement) -> SurfaceSize {
    SurfaceSize::new(
        canvas.client_width() as f32,
        canvas.client_height() as f32,
        window.device_pixel_ratio() as f32,
    )
}

/// Size the backing store for the device pixel ratio. The transform is set
/// absolutely so repeated resizes don't compound the scale.
fn apply_backing(canvas: &HtmlCanvasElement, ctx: &CanvasRenderingContext2d, size: SurfaceSize) {
    let (width, height) = size.backing_size();
    canvas.set_width(width);
    canvas.set_height(height);
    let dpr = size.effective_dpr() as f64;
    let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
}

impl SphereView {
    fn resize(&mut self) {
        let size = measure(&self.window, &self.canvas);
        self.apply_size(size);
    }

    fn apply_size(&mut self, size: SurfaceSize) {
        apply_backing(&self.canvas, &self.ctx, size);
        self.widget.resize(size);
    }

    fn surface_origin(&self) -> Vec2 {
        let rect = self.canvas.get_bounding_client_rect();
        Vec2::new(rect.left() as f32, rect.top() as f32)
    }

    fn mouse(&mut self, action: PointerAction, event: &MouseEvent) {
        let origin = self.surface_origin();
        let x = event.client_x() as f32 - origin.x;
        let y = event.client_y() as f32 - origin.y;
        self.widget
            .handle_pointer(PointerEvent::mouse(action, x, y, event.time_stamp()));
    }

    fn touch(&mut self, actions: &[PointerAction], event: &TouchEvent) {
        // changedTouches also carries the lifted finger on touchend
        let Some(touch) = event.changed_touches().get(0) else {
            return;
        };
        let client = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
        let origin = self.surface_origin();
        for &action in actions {
            self.widget
                .handle_pointer(PointerEvent::touch(action, client, origin, event.time_stamp()));
        }
    }

    fn frame(&mut self, time: f64) {
        let measured = measure(&self.window, &self.canvas);
        if self.widget.size().is_stale(measured) {
            self.apply_size(measured);
        }
        let mut painter = CanvasPainter::new(&self.ctx);
        self.widget.frame(time, &mut painter);
    }
}

struct SphereInner {
    mount: Mount<SphereView, RafScheduler<SphereInner>, DomListener>,
}

impl SphereInner {
    fn on_frame(cell: &RefCell<SphereInner>, generation: u64, time: f64) {
        let Ok(mut inner) = cell.try_borrow_mut() else {
            return;
        };
        inner.mount.on_frame(generation, |view| view.frame(time));
    }
}

fn with_sphere(weak: &Weak<RefCell<SphereInner>>, f: impl FnOnce(&mut SphereView)) {
    let Some(cell) = weak.upgrade() else {
        return;
    };
    let Ok(mut inner) = cell.try_borrow_mut() else {
        return;
    };
    if let Some(view) = inner.mount.model_mut() {
        f(view);
    }
}

/// Mount the sphere on the canvas with id `canvas_id`
pub fn mount_sphere(
    canvas_id: &str,
    signals: Signals,
    settings: &Settings,
) -> Result<KineticSphereHandle, MountError> {
    let (window, document) = dom_parts()?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| MountError::CanvasNotFound(canvas_id.to_string()))?
        .dyn_into()
        .map_err(|_| MountError::NotACanvas(canvas_id.to_string()))?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(MountError::dom)?
        .ok_or(MountError::ContextUnavailable)?
        .dyn_into()
        .map_err(|_| MountError::ContextUnavailable)?;

    // Suppress scroll/zoom gestures on this surface only
    canvas
        .style()
        .set_property("touch-action", "none")
        .map_err(MountError::dom)?;

    let size = measure(&window, &canvas);
    apply_backing(&canvas, &ctx, size);
    let seed = js_sys::Date::now() as u64;
    let view = SphereView {
        widget: KineticSphere::new(settings, signals, size, seed),
        window: window.clone(),
        canvas: canvas.clone(),
        ctx,
    };

    let inner = Rc::new_cyclic(|weak: &Weak<RefCell<SphereInner>>| {
        let scheduler = RafScheduler::new(window.clone(), weak.clone(), SphereInner::on_frame);
        RefCell::new(SphereInner {
            mount: Mount::new(view, scheduler),
        })
    });

    {
        let weak = Rc::downgrade(&inner);
        let mut guard = inner.borrow_mut();
        let mount = &mut guard.mount;
        let canvas_target: &EventTarget = canvas.as_ref();
        let window_target: &EventTarget = window.as_ref();

        let mouse_handler = |action: PointerAction| {
            let weak = weak.clone();
            move |event: Event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    with_sphere(&weak, |view| view.mouse(action, event));
                }
            }
        };
        listen(mount, canvas_target, "mousemove", None, mouse_handler(PointerAction::Move));
        listen(mount, canvas_target, "mousedown", None, mouse_handler(PointerAction::Down));
        listen(mount, canvas_target, "click", None, mouse_handler(PointerAction::Click));
        listen(mount, canvas_target, "mouseleave", None, mouse_handler(PointerAction::Leave));
        // Releases anywhere end a drag
        listen(mount, window_target, "mouseup", None, mouse_handler(PointerAction::Up));

        // preventDefault swallows the synthetic click; `touch_actions` makes up for it
        for kind in ["touchstart", "touchmove", "touchend", "touchcancel"] {
            let weak = weak.clone();
            listen(mount, canvas_target, kind, Some(false), move |event: Event| {
                if let Some(event) = event.dyn_ref::<TouchEvent>() {
                    event.prevent_default();
                    with_sphere(&weak, |view| view.touch(touch_actions(kind), event));
                }
            });
        }

        let resize_weak = weak.clone();
        listen(mount, window_target, "resize", None, move |_event: Event| {
            with_sphere(&resize_weak, SphereView::resize);
        });

        mount.start();
        log::info!(
            "Kinetic sphere mounted on #{} ({} listeners)",
            canvas_id,
            mount.listener_count()
        );
    }

    Ok(KineticSphereHandle { inner })
}

/// JS-facing handle to a mounted sphere
#[wasm_bindgen]
pub struct KineticSphereHandle {
    inner: Rc<RefCell<SphereInner>>,
}

#[wasm_bindgen]
impl KineticSphereHandle {
    /// Mount on `<canvas id=canvas_id>` with the initial page signals
    pub fn mount(
        canvas_id: &str,
        scroll_velocity: f32,
        debt_level: f32,
    ) -> Result<KineticSphereHandle, JsValue> {
        init_logging();
        let settings = Settings::load();
        mount_sphere(canvas_id, Signals::new(scroll_velocity, debt_level), &settings).map_err(|e| {
            log::warn!("Kinetic sphere not mounted: {}", e);
            e.into()
        })
    }

    /// Update the page signals; sampled on the next frame
    pub fn set_signals(&self, scroll_velocity: f32, debt_level: f32) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            if let Some(view) = inner.mount.model_mut() {
                view.widget.set_signals(Signals::new(scroll_velocity, debt_level));
            }
        }
    }

    /// Re-measure after a layout change the window didn't report
    pub fn resize(&self) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            if let Some(view) = inner.mount.model_mut() {
                view.resize();
            }
        }
    }

    /// Stop the loop, remove listeners, drop all state. Safe to call twice.
    pub fn unmount(&self) {
        match self.inner.try_borrow_mut() {
            Ok(mut inner) => inner.mount.teardown(),
            Err(_) => log::warn!("unmount called re-entrantly, ignored"),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.inner
            .try_borrow()
            .map(|inner| inner.mount.is_mounted())
            .unwrap_or(true)
    }
}

// ---------------------------------------------------------------------------
// Custom cursor overlay
// ---------------------------------------------------------------------------

/// Overlay DOM nodes plus the follower model. Dropping it undoes every
/// global change the overlay made.
struct CursorView {
    follower: CursorFollower,
    dot: HtmlElement,
    ring: HtmlElement,
    hide_style: Element,
    root: Option<HtmlElement>,
}

impl CursorView {
    fn frame(&mut self) {
        self.follower.step();
        paint_cursor_el(&self.dot, &self.follower, cursor::DOT_CLASS, self.follower.dot_transform());
        paint_cursor_el(&self.ring, &self.follower, cursor::RING_CLASS, self.follower.ring_transform());
    }
}

fn paint_cursor_el(el: &HtmlElement, follower: &CursorFollower, base: &str, transform: String) {
    let style = el.style();
    let _ = style.set_property("transform", &transform);
    let _ = style.set_property("opacity", follower.opacity());
    el.set_class_name(&follower.class_name(base));
}

impl Drop for CursorView {
    fn drop(&mut self) {
        self.dot.remove();
        self.ring.remove();
        self.hide_style.remove();
        if let Some(root) = &self.root {
            let _ = root.style().remove_property("cursor");
        }
        log::info!("Custom cursor removed");
    }
}

struct CursorInner {
    mount: Mount<CursorView, RafScheduler<CursorInner>, DomListener>,
}

impl CursorInner {
    fn on_frame(cell: &RefCell<CursorInner>, generation: u64, _time: f64) {
        let Ok(mut inner) = cell.try_borrow_mut() else {
            return;
        };
        inner.mount.on_frame(generation, CursorView::frame);
    }
}

fn with_cursor(weak: &Weak<RefCell<CursorInner>>, f: impl FnOnce(&mut CursorFollower)) {
    let Some(cell) = weak.upgrade() else {
        return;
    };
    let Ok(mut inner) = cell.try_borrow_mut() else {
        return;
    };
    if let Some(view) = inner.mount.model_mut() {
        f(&mut view.follower);
    }
}

fn overlay_element(document: &Document, class: &str) -> Result<HtmlElement, MountError> {
    let el: HtmlElement = document
        .create_element("div")
        .map_err(MountError::dom)?
        .dyn_into()
        .map_err(|_| MountError::Dom("div is not an HtmlElement".into()))?;
    el.set_class_name(class);
    let _ = el.style().set_property("opacity", "0");
    Ok(el)
}

/// Mount the cursor overlay. Returns `Ok(None)` on touch devices.
pub fn mount_cursor() -> Result<Option<CursorOverlayHandle>, MountError> {
    let (window, document) = dom_parts()?;
    if js_sys::Reflect::has(&window, &JsValue::from_str("ontouchstart")).unwrap_or(false) {
        log::info!("Touch device, custom cursor skipped");
        return Ok(None);
    }

    // Build everything before touching the page
    let body = document.body().ok_or(MountError::NoDocument)?;
    let head = document
        .query_selector("head")
        .map_err(MountError::dom)?
        .ok_or_else(|| MountError::Dom("document has no head".into()))?;
    let dot = overlay_element(&document, cursor::DOT_CLASS)?;
    let ring = overlay_element(&document, cursor::RING_CLASS)?;
    let hide_style = document.create_element("style").map_err(MountError::dom)?;
    hide_style.set_id(cursor::HIDE_STYLE_ID);
    hide_style.set_text_content(Some(cursor::HIDE_CURSOR_CSS));

    let placements: [(&Node, &Element); 3] = [
        (body.as_ref(), dot.as_ref()),
        (body.as_ref(), ring.as_ref()),
        (head.as_ref(), &hide_style),
    ];
    attach_all(
        &placements,
        |(parent, child)| parent.append_child(child).map(|_| ()),
        |(_, child)| child.remove(),
    )
    .map_err(MountError::dom)?;

    let root = document
        .document_element()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
    if let Some(root) = &root {
        let _ = root.style().set_property("cursor", "none");
    }

    let view = CursorView {
        follower: CursorFollower::new(),
        dot,
        ring,
        hide_style,
        root,
    };

    let inner = Rc::new_cyclic(|weak: &Weak<RefCell<CursorInner>>| {
        let scheduler = RafScheduler::new(window.clone(), weak.clone(), CursorInner::on_frame);
        RefCell::new(CursorInner {
            mount: Mount::new(view, scheduler),
        })
    });

    {
        let weak = Rc::downgrade(&inner);
        let mut guard = inner.borrow_mut();
        let mount = &mut guard.mount;
        let doc_target: &EventTarget = document.as_ref();

        let move_weak = weak.clone();
        listen(mount, doc_target, "mousemove", None, move |event: Event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                with_cursor(&move_weak, |c| c.move_to(pos));
            }
        });
        let down_weak = weak.clone();
        listen(mount, doc_target, "mousedown", None, move |_event: Event| {
            with_cursor(&down_weak, |c| c.set_clicking(true));
        });
        let up_weak = weak.clone();
        listen(mount, doc_target, "mouseup", None, move |_event: Event| {
            with_cursor(&up_weak, |c| c.set_clicking(false));
        });
        let leave_weak = weak.clone();
        listen(mount, doc_target, "mouseleave", None, move |_event: Event| {
            with_cursor(&leave_weak, CursorFollower::leave);
        });
        // Delegated hover: entering any element re-evaluates the state
        let over_weak = weak.clone();
        listen(mount, doc_target, "mouseover", None, move |event: Event| {
            let hovering = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest(cursor::INTERACTIVE_SELECTOR).ok().flatten())
                .is_some();
            with_cursor(&over_weak, |c| c.set_hovering(hovering));
        });

        mount.start();
        log::info!("Custom cursor mounted");
    }

    Ok(Some(CursorOverlayHandle { inner: Some(inner) }))
}

/// JS-facing handle to the cursor overlay
#[wasm_bindgen]
pub struct CursorOverlayHandle {
    inner: Option<Rc<RefCell<CursorInner>>>,
}

#[wasm_bindgen]
impl CursorOverlayHandle {
    /// Mount the overlay; on touch devices the handle is inert
    pub fn mount() -> Result<CursorOverlayHandle, JsValue> {
        init_logging();
        match mount_cursor() {
            Ok(Some(handle)) => Ok(handle),
            Ok(None) => Ok(CursorOverlayHandle { inner: None }),
            Err(e) => {
                log::warn!("Custom cursor not mounted: {}", e);
                Err(e.into())
            }
        }
    }

    /// Restore the native cursor and stop the overlay. Safe to call twice.
    pub fn unmount(&self) {
        if let Some(inner) = &self.inner {
            match inner.try_borrow_mut() {
                Ok(mut inner) => inner.mount.teardown(),
                Err(_) => log::warn!("unmount called re-entrantly, ignored"),
            }
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.inner
            .as_ref()
            .and_then(|inner| inner.try_borrow().ok().map(|i| i.mount.is_mounted()))
            .unwrap_or(false)
    }
}
