//! Simulated Host - deterministic in-memory rendering environment
//!
//! A single-threaded host with a virtual clock, a scrollable viewport,
//! element boxes in document coordinates, intersection detection, a frame
//! queue, timers and listener dispatch. Nothing happens until the owner
//! drives it (`run_frame`, `advance`, `scroll_to`, `pointer_move`), which
//! makes every controller testable frame by frame.
//!
//! Callbacks are always invoked with no internal borrow held, so they may
//! call straight back into the host.
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::host::SimulatedHost;
//! use spark_folio::types::Rect;
//!
//! let host = SimulatedHost::new(1280.0, 800.0);
//! let card = host.create_element(Some("about"), Rect::new(0.0, 900.0, 600.0, 400.0));
//! host.scroll_to(600.0);
//! host.run_frame();
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::trace;

use super::{
    DocumentHost, ElementHost, EventHandler, EventHost, EventKind, EventTarget, FrameCallback, FrameHost,
    FrameId, HostEvent, IntersectionCallback, IntersectionEntry, IntersectionHost, ListenerId,
    ObserverId, ObserverOptions, TimerCallback, TimerHost, TimerId,
};
use crate::types::{ElementHandle, ListenerFlags, Rect, Transform, Vec2};

/// Duration of one simulated display refresh (60 Hz).
pub const FRAME_MS: f64 = 1000.0 / 60.0;

bitflags::bitflags! {
    /// Host facilities that can be switched off to exercise degraded paths.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Facilities: u8 {
        const INTERSECTION = 1 << 0;
        const FRAMES = 1 << 1;
        const TIMERS = 1 << 2;
        const EVENTS = 1 << 3;
    }
}

impl Default for Facilities {
    fn default() -> Self {
        Self::all()
    }
}

// =============================================================================
// RECORDS
// =============================================================================

struct SimElement {
    /// Box in document coordinates.
    rect: Rect,
    classes: Vec<String>,
    transform: Transform,
    transform_writes: usize,
    alive: bool,
}

struct ObserverRecord {
    id: ObserverId,
    element: ElementHandle,
    options: ObserverOptions,
    /// Taken out while the callback runs.
    callback: Option<IntersectionCallback>,
    last_intersecting: Option<bool>,
}

struct FrameRecord {
    id: FrameId,
    callback: FrameCallback,
}

struct TimerRecord {
    id: TimerId,
    due_ms: f64,
    callback: TimerCallback,
}

struct ListenerRecord {
    id: ListenerId,
    target: EventTarget,
    kind: EventKind,
    flags: ListenerFlags,
    handler: EventHandler,
}

struct SimState {
    viewport_width: f64,
    viewport_height: f64,
    scroll_y: f64,
    now_ms: f64,
    elements: Vec<SimElement>,
    ids: HashMap<String, ElementHandle>,
    observers: Vec<ObserverRecord>,
    frames: Vec<FrameRecord>,
    timers: Vec<TimerRecord>,
    listeners: Vec<ListenerRecord>,
    /// Elements currently under the pointer, in creation order.
    hovered: Vec<ElementHandle>,
    pointer: Option<Vec2>,
    facilities: Facilities,
    frames_run: u64,
    next_id: u64,
}

impl SimState {
    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn element(&self, element: ElementHandle) -> Option<&SimElement> {
        self.elements.get(element.index()).filter(|e| e.alive)
    }

    fn element_mut(&mut self, element: ElementHandle) -> Option<&mut SimElement> {
        self.elements.get_mut(element.index()).filter(|e| e.alive)
    }

    fn viewport(&self) -> Rect {
        Rect::new(0.0, 0.0, self.viewport_width, self.viewport_height)
    }

    fn client_rect(&self, element: ElementHandle) -> Option<Rect> {
        self.element(element).map(|e| e.rect.translated(0.0, -self.scroll_y))
    }
}

// =============================================================================
// SIMULATED HOST
// =============================================================================

/// Deterministic host for tests and the terminal demo.
pub struct SimulatedHost {
    state: RefCell<SimState>,
}

impl SimulatedHost {
    /// Create a host with the given viewport size and every facility enabled.
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self::with_facilities(viewport_width, viewport_height, Facilities::all())
    }

    /// Create a host with only some facilities available.
    pub fn with_facilities(viewport_width: f64, viewport_height: f64, facilities: Facilities) -> Self {
        Self {
            state: RefCell::new(SimState {
                viewport_width,
                viewport_height,
                scroll_y: 0.0,
                now_ms: 0.0,
                elements: Vec::new(),
                ids: HashMap::new(),
                observers: Vec::new(),
                frames: Vec::new(),
                timers: Vec::new(),
                listeners: Vec::new(),
                hovered: Vec::new(),
                pointer: None,
                facilities,
                frames_run: 0,
                next_id: 1,
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Elements
    // -------------------------------------------------------------------------

    /// Create an element with a box in document coordinates.
    ///
    /// When two elements share an id, lookups return the first one.
    pub fn create_element(&self, id: Option<&str>, rect: Rect) -> ElementHandle {
        let mut state = self.state.borrow_mut();
        let handle = ElementHandle::from_index(state.elements.len());
        state.elements.push(SimElement {
            rect,
            classes: Vec::new(),
            transform: Transform::Identity,
            transform_writes: 0,
            alive: true,
        });
        if let Some(id) = id {
            state.ids.entry(id.to_string()).or_insert(handle);
        }
        trace!(element = %handle, ?id, "element created");
        handle
    }

    /// Move or resize an element (document coordinates).
    pub fn set_element_rect(&self, element: ElementHandle, rect: Rect) {
        if let Some(e) = self.state.borrow_mut().element_mut(element) {
            e.rect = rect;
        }
    }

    /// Remove an element. Its observations and listeners die with it.
    pub fn remove_element(&self, element: ElementHandle) {
        let mut state = self.state.borrow_mut();
        let Some(e) = state.element_mut(element) else {
            return;
        };
        e.alive = false;
        state.ids.retain(|_, handle| *handle != element);
        state.observers.retain(|o| o.element != element);
        state
            .listeners
            .retain(|l| l.target != EventTarget::Element(element));
        state.hovered.retain(|h| *h != element);
        trace!(element = %element, "element removed");
    }

    /// Classes added to an element so far (empty once removed).
    pub fn classes(&self, element: ElementHandle) -> Vec<String> {
        self.state
            .borrow()
            .element(element)
            .map(|e| e.classes.clone())
            .unwrap_or_default()
    }

    pub fn has_class(&self, element: ElementHandle, class: &str) -> bool {
        self.state
            .borrow()
            .element(element)
            .is_some_and(|e| e.classes.iter().any(|c| c == class))
    }

    /// Last transform written to an element.
    pub fn transform(&self, element: ElementHandle) -> Option<Transform> {
        self.state.borrow().element(element).map(|e| e.transform)
    }

    /// Number of transform writes an element has received.
    pub fn transform_writes(&self, element: ElementHandle) -> usize {
        self.state
            .borrow()
            .elements
            .get(element.index())
            .map(|e| e.transform_writes)
            .unwrap_or(0)
    }

    // -------------------------------------------------------------------------
    // Viewport
    // -------------------------------------------------------------------------

    pub fn viewport_size(&self) -> (f64, f64) {
        let state = self.state.borrow();
        (state.viewport_width, state.viewport_height)
    }

    pub fn resize_viewport(&self, width: f64, height: f64) {
        let mut state = self.state.borrow_mut();
        state.viewport_width = width;
        state.viewport_height = height;
    }

    /// Scroll the page and fire window scroll listeners.
    pub fn scroll_to(&self, scroll_y: f64) {
        let scroll_y = scroll_y.max(0.0);
        self.state.borrow_mut().scroll_y = scroll_y;
        self.dispatch_event(EventTarget::Window, HostEvent::Scroll { scroll_y });
        // Boxes moved under a stationary pointer.
        let pointer = self.state.borrow().pointer;
        if let Some(client) = pointer {
            self.update_hover(client);
        }
    }

    pub fn scroll_by(&self, delta_y: f64) {
        let current = self.state.borrow().scroll_y;
        self.scroll_to(current + delta_y);
    }

    // -------------------------------------------------------------------------
    // Pointer
    // -------------------------------------------------------------------------

    /// Move the pointer to a client position.
    ///
    /// Fires `PointerLeave` on elements the pointer left, `PointerEnter` on
    /// elements it entered, then `PointerMove` on every element under it.
    /// Nested boxes all count as hovered, like DOM ancestors.
    pub fn pointer_move(&self, client: Vec2) {
        self.state.borrow_mut().pointer = Some(client);
        let under = self.update_hover(client);
        for element in under {
            self.dispatch_event(EventTarget::Element(element), HostEvent::PointerMove { client });
        }
    }

    /// Pointer left the window entirely.
    pub fn pointer_exit(&self) {
        let (left, client) = {
            let mut state = self.state.borrow_mut();
            let client = state.pointer.take().unwrap_or_default();
            (std::mem::take(&mut state.hovered), client)
        };
        for element in left {
            self.dispatch_event(EventTarget::Element(element), HostEvent::PointerLeave { client });
        }
    }

    fn update_hover(&self, client: Vec2) -> Vec<ElementHandle> {
        let (entered, left, under) = {
            let mut state = self.state.borrow_mut();
            let scroll_y = state.scroll_y;
            let under: Vec<ElementHandle> = state
                .elements
                .iter()
                .enumerate()
                .filter(|(_, e)| e.alive && e.rect.translated(0.0, -scroll_y).contains(client))
                .map(|(i, _)| ElementHandle::from_index(i))
                .collect();
            let left: Vec<ElementHandle> = state
                .hovered
                .iter()
                .copied()
                .filter(|h| !under.contains(h))
                .collect();
            let entered: Vec<ElementHandle> = under
                .iter()
                .copied()
                .filter(|h| !state.hovered.contains(h))
                .collect();
            state.hovered = under.clone();
            (entered, left, under)
        };

        for element in left {
            self.dispatch_event(EventTarget::Element(element), HostEvent::PointerLeave { client });
        }
        for element in entered {
            self.dispatch_event(EventTarget::Element(element), HostEvent::PointerEnter { client });
        }
        under
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Deliver an event to every listener registered for `target` and the
    /// event's kind. Returns the number of handlers invoked.
    pub fn dispatch_event(&self, target: EventTarget, event: HostEvent) -> usize {
        let kind = event.kind();
        let ids: Vec<ListenerId> = self
            .state
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.target == target && l.kind == kind)
            .map(|l| l.id)
            .collect();

        let mut invoked = 0;
        for id in ids {
            // Re-check: an earlier handler may have removed this one.
            let handler = {
                let mut state = self.state.borrow_mut();
                let Some(pos) = state.listeners.iter().position(|l| l.id == id) else {
                    continue;
                };
                if state.listeners[pos].flags.contains(ListenerFlags::ONCE) {
                    state.listeners.remove(pos).handler
                } else {
                    state.listeners[pos].handler.clone()
                }
            };
            handler(&event);
            invoked += 1;
        }
        invoked
    }

    // -------------------------------------------------------------------------
    // Clock
    // -------------------------------------------------------------------------

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> f64 {
        self.state.borrow().now_ms
    }

    /// Advance the clock, firing due timers in due order.
    pub fn advance(&self, ms: f64) {
        let now = {
            let mut state = self.state.borrow_mut();
            state.now_ms += ms.max(0.0);
            state.now_ms
        };
        self.run_due_timers(now);
    }

    fn run_due_timers(&self, now: f64) {
        let mut due: Vec<(f64, TimerId)> = self
            .state
            .borrow()
            .timers
            .iter()
            .filter(|t| t.due_ms <= now)
            .map(|t| (t.due_ms, t.id))
            .collect();
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.0.cmp(&b.1.0)));

        for (_, id) in due {
            let callback = {
                let mut state = self.state.borrow_mut();
                let Some(pos) = state.timers.iter().position(|t| t.id == id) else {
                    continue;
                };
                state.timers.remove(pos).callback
            };
            callback();
        }
    }

    /// Run one display refresh: advance the clock by [`FRAME_MS`], fire due
    /// timers, run the frame callbacks queued before this frame, then deliver
    /// intersection changes.
    ///
    /// Returns the number of frame callbacks that ran.
    pub fn run_frame(&self) -> usize {
        let now = {
            let mut state = self.state.borrow_mut();
            state.now_ms += FRAME_MS;
            state.frames_run += 1;
            state.now_ms
        };
        self.run_due_timers(now);

        let queued: Vec<FrameId> = self.state.borrow().frames.iter().map(|f| f.id).collect();
        let mut ran = 0;
        for id in queued {
            let callback = {
                let mut state = self.state.borrow_mut();
                let Some(pos) = state.frames.iter().position(|f| f.id == id) else {
                    continue;
                };
                state.frames.remove(pos).callback
            };
            callback(now);
            ran += 1;
        }

        self.deliver_intersections();
        ran
    }

    /// Run `count` frames.
    pub fn run_frames(&self, count: usize) {
        for _ in 0..count {
            self.run_frame();
        }
    }

    /// Total frames run so far.
    pub fn frames_run(&self) -> u64 {
        self.state.borrow().frames_run
    }

    // -------------------------------------------------------------------------
    // Intersections
    // -------------------------------------------------------------------------

    /// Deliver an entry to every observer whose intersecting state changed
    /// since its last delivery. New observations always get one entry.
    pub fn deliver_intersections(&self) {
        let pending: Vec<(ObserverId, IntersectionEntry)> = {
            let mut state = self.state.borrow_mut();
            let viewport = state.viewport();
            let scroll_y = state.scroll_y;
            let mut pending = Vec::new();
            let SimState { observers, elements, .. } = &mut *state;
            for observer in observers.iter_mut() {
                let Some(element) = elements
                    .get(observer.element.index())
                    .filter(|e| e.alive)
                else {
                    continue;
                };
                let rect = element.rect.translated(0.0, -scroll_y);
                let root = viewport.expanded(observer.options.root_margin);
                let ratio = rect.visible_fraction(&root);
                let touching = rect.intersect(&root).is_some();
                let intersecting = touching && ratio >= observer.options.threshold;

                if observer.last_intersecting != Some(intersecting) {
                    observer.last_intersecting = Some(intersecting);
                    pending.push((
                        observer.id,
                        IntersectionEntry {
                            target: observer.element,
                            is_intersecting: intersecting,
                            intersection_ratio: ratio,
                            bounding_rect: rect,
                        },
                    ));
                }
            }
            pending
        };

        for (id, entry) in pending {
            let callback = {
                let mut state = self.state.borrow_mut();
                state
                    .observers
                    .iter_mut()
                    .find(|o| o.id == id)
                    .and_then(|o| o.callback.take())
            };
            let Some(mut callback) = callback else {
                continue;
            };
            callback(&entry);
            // Put it back unless the callback unobserved itself.
            let mut state = self.state.borrow_mut();
            if let Some(observer) = state.observers.iter_mut().find(|o| o.id == id) {
                observer.callback = Some(callback);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------------

    pub fn observer_count(&self) -> usize {
        self.state.borrow().observers.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Listeners registered on one target.
    pub fn listeners_on(&self, target: EventTarget) -> usize {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.target == target)
            .count()
    }

    /// Whether every listener on `target` was registered passive.
    pub fn all_passive(&self, target: EventTarget) -> bool {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.target == target)
            .all(|l| l.flags.contains(ListenerFlags::PASSIVE))
    }
}

// =============================================================================
// CAPABILITY IMPLS
// =============================================================================

impl ElementHost for SimulatedHost {
    fn element_exists(&self, element: ElementHandle) -> bool {
        self.state.borrow().element(element).is_some()
    }

    fn element_by_id(&self, id: &str) -> Option<ElementHandle> {
        self.state.borrow().ids.get(id).copied()
    }

    fn bounding_rect(&self, element: ElementHandle) -> Option<Rect> {
        self.state.borrow().client_rect(element)
    }

    fn set_transform(&self, element: ElementHandle, transform: Transform) {
        if let Some(e) = self.state.borrow_mut().element_mut(element) {
            e.transform = transform;
            e.transform_writes += 1;
        }
    }

    fn add_class(&self, element: ElementHandle, class: &str) {
        if let Some(e) = self.state.borrow_mut().element_mut(element) {
            if !e.classes.iter().any(|c| c == class) {
                e.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&self, element: ElementHandle, class: &str) {
        if let Some(e) = self.state.borrow_mut().element_mut(element) {
            e.classes.retain(|c| c != class);
        }
    }

    fn scroll_y(&self) -> f64 {
        self.state.borrow().scroll_y
    }
}

impl DocumentHost for SimulatedHost {
    fn create_element(&self, id: Option<&str>, rect: Rect) -> ElementHandle {
        SimulatedHost::create_element(self, id, rect)
    }

    fn viewport_width(&self) -> f64 {
        self.state.borrow().viewport_width
    }
}

impl IntersectionHost for SimulatedHost {
    fn observe(
        &self,
        element: ElementHandle,
        options: ObserverOptions,
        callback: IntersectionCallback,
    ) -> Option<ObserverId> {
        let mut state = self.state.borrow_mut();
        if !state.facilities.contains(Facilities::INTERSECTION) || state.element(element).is_none() {
            return None;
        }
        let id = ObserverId(state.next_id());
        state.observers.push(ObserverRecord {
            id,
            element,
            options,
            callback: Some(callback),
            last_intersecting: None,
        });
        Some(id)
    }

    fn unobserve(&self, id: ObserverId) {
        self.state.borrow_mut().observers.retain(|o| o.id != id);
    }
}

impl FrameHost for SimulatedHost {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameId> {
        let mut state = self.state.borrow_mut();
        if !state.facilities.contains(Facilities::FRAMES) {
            return None;
        }
        let id = FrameId(state.next_id());
        state.frames.push(FrameRecord { id, callback });
        Some(id)
    }

    fn cancel_frame(&self, id: FrameId) {
        self.state.borrow_mut().frames.retain(|f| f.id != id);
    }
}

impl TimerHost for SimulatedHost {
    fn set_timeout(&self, delay_ms: f64, callback: TimerCallback) -> Option<TimerId> {
        let mut state = self.state.borrow_mut();
        if !state.facilities.contains(Facilities::TIMERS) {
            return None;
        }
        let id = TimerId(state.next_id());
        let due_ms = state.now_ms + delay_ms.max(0.0);
        state.timers.push(TimerRecord { id, due_ms, callback });
        Some(id)
    }

    fn clear_timeout(&self, id: TimerId) {
        self.state.borrow_mut().timers.retain(|t| t.id != id);
    }
}

impl EventHost for SimulatedHost {
    fn add_listener(
        &self,
        target: EventTarget,
        kind: EventKind,
        flags: ListenerFlags,
        handler: EventHandler,
    ) -> Option<ListenerId> {
        let mut state = self.state.borrow_mut();
        if !state.facilities.contains(Facilities::EVENTS) {
            return None;
        }
        if let EventTarget::Element(element) = target {
            if state.element(element).is_none() {
                return None;
            }
        }
        let id = ListenerId(state.next_id());
        state.listeners.push(ListenerRecord {
            id,
            target,
            kind,
            flags,
            handler,
        });
        Some(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.state.borrow_mut().listeners.retain(|l| l.id != id);
    }
}

// =============================================================================
// TESTS
// =============================================================================
