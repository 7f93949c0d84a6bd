//! Host capabilities.
//!
//! Controllers never talk to a rendering environment directly. Everything
//! they need (element geometry, intersection detection, frame scheduling,
//! timers, event listeners) is reached through the small traits below, so
//! the controller logic runs the same against a browser binding, the
//! terminal bridge, or the in-memory [`SimulatedHost`].
//!
//! Every request method returns `Option<Id>`: `None` means the facility is
//! unavailable and the caller must degrade instead of failing.

pub mod sim;
pub mod terminal;

use std::rc::Rc;

use crate::types::{ElementHandle, Insets, ListenerFlags, Rect, Transform, Vec2};

pub use sim::{Facilities, SimulatedHost, FRAME_MS};

// =============================================================================
// IDS
// =============================================================================

/// Registration of one intersection observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

/// One pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// One pending timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// One registered event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

// =============================================================================
// INTERSECTION
// =============================================================================

/// Options for observing one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Visible fraction at which the element counts as intersecting.
    pub threshold: f64,
    /// Applied to the viewport before intersecting (negative shrinks it).
    pub root_margin: Insets,
}

/// One intersection change delivered to an observer callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementHandle,
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
    pub bounding_rect: Rect,
}

pub type IntersectionCallback = Box<dyn FnMut(&IntersectionEntry)>;

// =============================================================================
// EVENTS
// =============================================================================

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Element(ElementHandle),
}

/// Event kinds a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerMove,
    PointerEnter,
    PointerLeave,
    Scroll,
}

/// Event payload. Pointer positions are client (viewport) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    PointerMove { client: Vec2 },
    PointerEnter { client: Vec2 },
    PointerLeave { client: Vec2 },
    Scroll { scroll_y: f64 },
}

impl HostEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            HostEvent::PointerMove { .. } => EventKind::PointerMove,
            HostEvent::PointerEnter { .. } => EventKind::PointerEnter,
            HostEvent::PointerLeave { .. } => EventKind::PointerLeave,
            HostEvent::Scroll { .. } => EventKind::Scroll,
        }
    }

    /// Pointer position, for pointer events.
    pub fn client(&self) -> Option<Vec2> {
        match *self {
            HostEvent::PointerMove { client }
            | HostEvent::PointerEnter { client }
            | HostEvent::PointerLeave { client } => Some(client),
            HostEvent::Scroll { .. } => None,
        }
    }
}

pub type EventHandler = Rc<dyn Fn(&HostEvent)>;

/// Frame callback, receives the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64)>;

pub type TimerCallback = Box<dyn FnOnce()>;

// =============================================================================
// CAPABILITY TRAITS
// =============================================================================

/// Element geometry and mutation.
pub trait ElementHost {
    /// Whether the handle still refers to a live element.
    fn element_exists(&self, element: ElementHandle) -> bool;

    /// Look up an element by its anchor id.
    fn element_by_id(&self, id: &str) -> Option<ElementHandle>;

    /// Current box in client (viewport) coordinates. `None` once removed.
    fn bounding_rect(&self, element: ElementHandle) -> Option<Rect>;

    /// Write a transform. No-op for removed elements.
    fn set_transform(&self, element: ElementHandle, transform: Transform);

    /// Add a class. No-op for removed elements.
    fn add_class(&self, element: ElementHandle, class: &str);

    /// Remove a class. No-op for removed elements.
    fn remove_class(&self, element: ElementHandle, class: &str);

    /// Current vertical scroll offset of the page.
    fn scroll_y(&self) -> f64;
}

/// Viewport intersection detection.
pub trait IntersectionHost {
    fn observe(
        &self,
        element: ElementHandle,
        options: ObserverOptions,
        callback: IntersectionCallback,
    ) -> Option<ObserverId>;

    /// Stop an observation. Unknown ids are ignored.
    fn unobserve(&self, id: ObserverId);
}

/// Per-display-refresh callbacks.
pub trait FrameHost {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameId>;

    /// Cancel a pending frame. Unknown ids are ignored.
    fn cancel_frame(&self, id: FrameId);
}

/// One-shot delayed callbacks.
pub trait TimerHost {
    fn set_timeout(&self, delay_ms: f64, callback: TimerCallback) -> Option<TimerId>;

    /// Cancel a pending timeout. Unknown ids are ignored.
    fn clear_timeout(&self, id: TimerId);
}

/// Event listener registration.
pub trait EventHost {
    fn add_listener(
        &self,
        target: EventTarget,
        kind: EventKind,
        flags: ListenerFlags,
        handler: EventHandler,
    ) -> Option<ListenerId>;

    /// Remove a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);
}

/// Hosts that own the page's element boxes and can add new ones.
///
/// Controllers never need this; only page mounting does.
pub trait DocumentHost {
    /// Create an element with an optional anchor id and a document-space box.
    fn create_element(&self, id: Option<&str>, rect: Rect) -> ElementHandle;

    fn viewport_width(&self) -> f64;
}

/// Everything a controller may need.
pub trait Host: ElementHost + IntersectionHost + FrameHost + TimerHost + EventHost {}

impl<T> Host for T where T: ElementHost + IntersectionHost + FrameHost + TimerHost + EventHost + ?Sized {}

/// Shared host reference held by controllers.
pub type SharedHost = Rc<dyn Host>;
