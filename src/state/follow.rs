//! Follow Module - pointer-driven tilt and magnetic effects
//!
//! Both effects share one shape: pointer events set a *target* offset, and a
//! per-frame loop eases the *current* offset toward it and writes the
//! resulting transform. Only the target computation and the parameters
//! differ:
//!
//! - **Tilt** rotates a card in proportion to the pointer's offset from its
//!   center, so the edge under the pointer dips away from the viewer.
//! - **Magnetic** pulls a button toward the pointer while it is within an
//!   attraction radius, stronger the closer the pointer gets.
//!
//! The frame loop keeps running while attached even when the target is
//! steady; it is also what eases the element back to rest after the pointer
//! leaves.
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::state::follow::{FollowController, FollowKind};
//!
//! let tilt = FollowController::attach(host.clone(), card, FollowKind::tilt());
//! host.pointer_move(Vec2::new(150.0, 120.0));
//! host.run_frames(30);
//! tilt.teardown();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::host::{EventKind, EventTarget, FrameId, HostEvent, ListenerId, SharedHost};
use crate::types::{ElementHandle, ListenerFlags, Rect, Transform, Vec2};

/// Distance below which an eased offset counts as settled.
pub const SETTLE_EPSILON: f64 = 0.01;

// =============================================================================
// PARAMETERS
// =============================================================================

/// Tilt effect parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltParams {
    /// Pixels of horizontal pointer offset per degree of Y rotation.
    pub divisor_x: f64,
    /// Pixels of vertical pointer offset per degree of X rotation.
    pub divisor_y: f64,
    pub easing: f64,
    pub perspective_px: f64,
    pub lift_px: f64,
    pub scale: f64,
}

impl Default for TiltParams {
    fn default() -> Self {
        Self {
            divisor_x: 12.0,
            divisor_y: 12.0,
            easing: 0.15,
            perspective_px: 1200.0,
            lift_px: 20.0,
            scale: 1.02,
        }
    }
}

/// Magnetic effect parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagneticParams {
    /// Attraction radius around the element center, in pixels.
    pub radius: f64,
    /// Fraction of the remaining radius applied as displacement.
    pub attraction: f64,
    pub easing: f64,
}

impl Default for MagneticParams {
    fn default() -> Self {
        Self {
            radius: 80.0,
            attraction: 0.3,
            easing: 0.18,
        }
    }
}

/// Which effect a controller drives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FollowKind {
    Tilt(TiltParams),
    Magnetic(MagneticParams),
}

impl FollowKind {
    pub fn tilt() -> Self {
        FollowKind::Tilt(TiltParams::default())
    }

    pub fn magnetic() -> Self {
        FollowKind::Magnetic(MagneticParams::default())
    }

    /// Per-frame easing factor.
    pub fn easing(&self) -> f64 {
        match self {
            FollowKind::Tilt(p) => p.easing,
            FollowKind::Magnetic(p) => p.easing,
        }
    }

    /// Transform for a rendered offset.
    pub fn transform(&self, current: Vec2) -> Transform {
        match self {
            FollowKind::Tilt(p) => Transform::Tilt {
                rotate_x: current.x,
                rotate_y: current.y,
                perspective_px: p.perspective_px,
                lift_px: p.lift_px,
                scale: p.scale,
            },
            FollowKind::Magnetic(_) => Transform::Translate {
                x: current.x,
                y: current.y,
            },
        }
    }

    /// Apply a pointer event to a follow state. `rect` is the element's
    /// current client box.
    pub fn handle_event(&self, state: &mut FollowState, rect: Rect, event: &HostEvent) {
        match *event {
            HostEvent::PointerEnter { .. } => state.hovering = true,
            HostEvent::PointerLeave { .. } => {
                state.hovering = false;
                state.target = Vec2::ZERO;
            }
            HostEvent::PointerMove { client } => match self {
                FollowKind::Tilt(p) => state.target = tilt_target(rect, client, p),
                FollowKind::Magnetic(p) => {
                    if state.hovering {
                        state.target = magnetic_target(rect, client, p);
                    }
                }
            },
            HostEvent::Scroll { .. } => {}
        }
    }
}

// =============================================================================
// TARGETS
// =============================================================================

fn ratio(value: f64, divisor: f64) -> f64 {
    if divisor == 0.0 { 0.0 } else { value / divisor }
}

/// Tilt target `(rotate_x, rotate_y)` in degrees for a pointer position.
///
/// Pointer below center tips the top toward the viewer (positive X);
/// pointer right of center turns the right edge away (negative Y).
pub fn tilt_target(rect: Rect, client: Vec2, params: &TiltParams) -> Vec2 {
    let x = client.x - rect.left;
    let y = client.y - rect.top;
    let center_x = rect.width / 2.0;
    let center_y = rect.height / 2.0;

    Vec2::new(
        ratio(y - center_y, params.divisor_y),
        ratio(center_x - x, params.divisor_x),
    )
}

/// Magnetic displacement toward the pointer.
///
/// Zero outside the attraction radius and exactly at the center.
pub fn magnetic_target(rect: Rect, client: Vec2, params: &MagneticParams) -> Vec2 {
    let delta = client - rect.center();
    let distance = delta.length();

    if distance <= 0.0 || distance >= params.radius {
        return Vec2::ZERO;
    }

    delta * ((params.radius - distance) * params.attraction / distance)
}

// =============================================================================
// FOLLOW STATE
// =============================================================================

/// Eased offset of one element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FollowState {
    /// Offset being eased toward.
    pub target: Vec2,
    /// Offset currently rendered.
    pub current: Vec2,
    pub hovering: bool,
}

impl FollowState {
    /// One easing step, independently per axis.
    #[inline]
    pub fn step(&mut self, easing: f64) {
        self.current = self.current + (self.target - self.current) * easing;
    }

    /// Distance left to the target.
    pub fn remaining(&self) -> f64 {
        self.current.distance(self.target)
    }

    pub fn is_settled(&self, epsilon: f64) -> bool {
        self.remaining() < epsilon
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

struct FollowInner {
    state: FollowState,
    frame: Option<FrameId>,
    listeners: Vec<ListenerId>,
    frames_rendered: u64,
    torn_down: bool,
}

/// Pointer-follow effect attached to one element. Tears down on drop.
pub struct FollowController {
    host: SharedHost,
    element: ElementHandle,
    kind: FollowKind,
    active: bool,
    inner: Rc<RefCell<FollowInner>>,
}

impl FollowController {
    /// Attach an effect to `element` and start its frame loop.
    ///
    /// A missing element or a host without frame scheduling yields an inert
    /// controller: no listeners, no loop, no transform writes.
    pub fn attach(host: SharedHost, element: ElementHandle, kind: FollowKind) -> Self {
        let mut controller = Self {
            host,
            element,
            kind,
            active: false,
            inner: Rc::new(RefCell::new(FollowInner {
                state: FollowState::default(),
                frame: None,
                listeners: Vec::new(),
                frames_rendered: 0,
                torn_down: false,
            })),
        };

        if !controller.host.element_exists(element) {
            debug!(element = %element, "follow attach on missing element, ignoring");
            return controller;
        }

        if !schedule_frame(&controller.host, &controller.inner, element, kind) {
            debug!(element = %element, "frame scheduling unavailable, element will not animate");
            return controller;
        }
        controller.active = true;

        let mut listeners = Vec::with_capacity(3);
        for event_kind in [EventKind::PointerMove, EventKind::PointerEnter, EventKind::PointerLeave] {
            let weak_host = Rc::downgrade(&controller.host);
            let weak_inner = Rc::downgrade(&controller.inner);
            let handler = move |event: &HostEvent| {
                let (Some(host), Some(inner)) = (weak_host.upgrade(), weak_inner.upgrade()) else {
                    return;
                };
                let Some(rect) = host.bounding_rect(element) else {
                    return;
                };
                let mut inner = inner.borrow_mut();
                if inner.torn_down {
                    return;
                }
                kind.handle_event(&mut inner.state, rect, event);
            };
            if let Some(id) = controller.host.add_listener(
                EventTarget::Element(element),
                event_kind,
                ListenerFlags::PASSIVE,
                Rc::new(handler),
            ) {
                listeners.push(id);
            }
        }
        controller.inner.borrow_mut().listeners = listeners;

        trace!(element = %element, ?kind, "follow attached");
        controller
    }

    pub fn element(&self) -> ElementHandle {
        self.element
    }

    pub fn kind(&self) -> FollowKind {
        self.kind
    }

    /// Whether the frame loop was started.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the frame loop is scheduled right now.
    pub fn is_running(&self) -> bool {
        self.inner.borrow().frame.is_some()
    }

    pub fn state(&self) -> FollowState {
        self.inner.borrow().state
    }

    /// Frames that wrote a transform.
    pub fn frames_rendered(&self) -> u64 {
        self.inner.borrow().frames_rendered
    }

    /// Cancel the frame loop and remove listeners. Idempotent; no transform
    /// is written after this returns.
    pub fn teardown(&self) {
        let (frame, listeners) = {
            let mut inner = self.inner.borrow_mut();
            if inner.torn_down {
                return;
            }
            inner.torn_down = true;
            (inner.frame.take(), std::mem::take(&mut inner.listeners))
        };
        if let Some(id) = frame {
            self.host.cancel_frame(id);
        }
        for id in listeners {
            self.host.remove_listener(id);
        }
        trace!(element = %self.element, "follow torn down");
    }
}

impl Drop for FollowController {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Queue the next frame of the loop. Returns `false` if the host refused.
fn schedule_frame(
    host: &SharedHost,
    inner: &Rc<RefCell<FollowInner>>,
    element: ElementHandle,
    kind: FollowKind,
) -> bool {
    let weak_host = Rc::downgrade(host);
    let weak_inner = Rc::downgrade(inner);

    let id = host.request_frame(Box::new(move |_timestamp: f64| {
        let (Some(host), Some(inner)) = (weak_host.upgrade(), weak_inner.upgrade()) else {
            return;
        };
        let transform = {
            let mut state = inner.borrow_mut();
            if state.torn_down {
                return;
            }
            state.frame = None;
            state.state.step(kind.easing());
            state.frames_rendered += 1;
            kind.transform(state.state.current)
        };
        host.set_transform(element, transform);
        schedule_frame(&host, &inner, element, kind);
    }));

    match id {
        Some(id) => {
            inner.borrow_mut().frame = Some(id);
            true
        }
        None => false,
    }
}

// =============================================================================
// TESTS
// =============================================================================
