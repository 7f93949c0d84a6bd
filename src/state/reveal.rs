//! Reveal Module - one-shot scroll reveal
//!
//! Observes an element's intersection with the viewport and, the first time
//! enough of it is visible, adds a reveal class after a delay. The reveal is
//! latched: it fires at most once per attachment, observation stops right
//! after the trigger, and scrolling away never hides the element again.
//!
//! # API
//!
//! - `RevealTrigger::attach(host, element, options)` - start observing
//! - `RevealTrigger::attach_with(host, element, options, on_reveal)` - plus a callback
//! - `teardown()` - stop observing and cancel a pending reveal (idempotent)
//! - `RevealOptions::section()` / `card()` / `feature()` - page presets
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::state::reveal::{RevealOptions, RevealTrigger};
//!
//! let trigger = RevealTrigger::attach(host.clone(), card, RevealOptions::card().with_delay(100.0));
//! host.run_frames(20);
//! assert!(trigger.is_revealed());
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::host::{Host, IntersectionEntry, ObserverId, ObserverOptions, SharedHost, TimerId};
use crate::types::{ElementHandle, Insets};

// =============================================================================
// OPTIONS
// =============================================================================

/// Class added by section and feature-card reveals.
pub const SECTION_REVEAL_CLASS: &str = "animate-in";

/// Class added by card reveals.
pub const CARD_REVEAL_CLASS: &str = "card-animate-in";

/// How and when an element reveals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealOptions {
    /// Visible fraction needed to trigger, in `[0, 1]`.
    pub threshold: f64,
    /// Applied to the viewport before intersecting (negative shrinks it).
    pub root_margin: Insets,
    /// Delay between trigger and reveal.
    pub delay_ms: f64,
    /// Upper bound of the deterministic per-element jitter added to the
    /// delay. Zero disables jitter.
    pub jitter_ms: f64,
    /// Class added to the element on reveal.
    pub class_name: String,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self::section()
    }
}

impl RevealOptions {
    /// Whole page sections: trigger early, 100px above the viewport bottom.
    pub fn section() -> Self {
        Self {
            threshold: 0.05,
            root_margin: Insets::bottom(-100.0),
            delay_ms: 0.0,
            jitter_ms: 0.0,
            class_name: SECTION_REVEAL_CLASS.to_string(),
        }
    }

    /// Grid cards: jittered so neighbours revealed together desynchronize.
    pub fn card() -> Self {
        Self {
            threshold: 0.15,
            root_margin: Insets::bottom(-50.0),
            delay_ms: 0.0,
            jitter_ms: 50.0,
            class_name: CARD_REVEAL_CLASS.to_string(),
        }
    }

    /// Project feature cards: need to be well inside the viewport.
    pub fn feature() -> Self {
        Self {
            threshold: 0.2,
            root_margin: Insets::all(-80.0),
            delay_ms: 0.0,
            jitter_ms: 0.0,
            class_name: SECTION_REVEAL_CLASS.to_string(),
        }
    }

    pub fn with_delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }
}

/// Deterministic jitter in `[0, bound_ms)` for an element.
///
/// Derived from the handle alone so identical pages jitter identically.
pub fn reveal_jitter_ms(element: ElementHandle, bound_ms: f64) -> f64 {
    if bound_ms <= 0.0 {
        return 0.0;
    }
    let seed = (element.index() as u64)
        .wrapping_mul(7919)
        .wrapping_add(104_729)
        % 1000;
    seed as f64 / 1000.0 * bound_ms
}

// =============================================================================
// STATE
// =============================================================================

/// Snapshot of one revealable element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealableElement {
    pub element: ElementHandle,
    pub has_triggered: bool,
    /// Effective delay (configured delay plus jitter, floored at zero).
    pub delay_ms: f64,
}

pub type RevealCallback = Box<dyn FnOnce(ElementHandle)>;

struct RevealInner {
    has_triggered: bool,
    revealed: bool,
    reveal_count: u32,
    torn_down: bool,
    observer: Option<ObserverId>,
    timer: Option<TimerId>,
    on_reveal: Option<RevealCallback>,
}

// =============================================================================
// TRIGGER
// =============================================================================

/// One-shot reveal attached to one element. Tears down on drop.
pub struct RevealTrigger {
    host: SharedHost,
    element: ElementHandle,
    delay_ms: f64,
    inner: Rc<RefCell<RevealInner>>,
}

impl RevealTrigger {
    /// Start observing `element`.
    ///
    /// A missing element or a host without intersection detection yields an
    /// inert trigger that never reveals.
    pub fn attach(host: SharedHost, element: ElementHandle, options: RevealOptions) -> Self {
        Self::attach_inner(host, element, options, None)
    }

    /// Like [`attach`](Self::attach), calling `on_reveal` when the reveal
    /// is applied.
    pub fn attach_with<F>(host: SharedHost, element: ElementHandle, options: RevealOptions, on_reveal: F) -> Self
    where
        F: FnOnce(ElementHandle) + 'static,
    {
        Self::attach_inner(host, element, options, Some(Box::new(on_reveal)))
    }

    fn attach_inner(
        host: SharedHost,
        element: ElementHandle,
        options: RevealOptions,
        on_reveal: Option<RevealCallback>,
    ) -> Self {
        let delay_ms = (options.delay_ms + reveal_jitter_ms(element, options.jitter_ms)).max(0.0);
        let trigger = Self {
            host,
            element,
            delay_ms,
            inner: Rc::new(RefCell::new(RevealInner {
                has_triggered: false,
                revealed: false,
                reveal_count: 0,
                torn_down: false,
                observer: None,
                timer: None,
                on_reveal,
            })),
        };

        if !trigger.host.element_exists(element) {
            debug!(element = %element, "reveal attach on missing element, ignoring");
            return trigger;
        }

        let weak_host = Rc::downgrade(&trigger.host);
        let weak_inner = Rc::downgrade(&trigger.inner);
        let threshold = options.threshold;
        let class_name = options.class_name.clone();
        let callback = move |entry: &IntersectionEntry| {
            let (Some(host), Some(inner)) = (weak_host.upgrade(), weak_inner.upgrade()) else {
                return;
            };
            on_entry(&host, &inner, entry, threshold, delay_ms, &class_name);
        };

        let observer = trigger.host.observe(
            element,
            ObserverOptions {
                threshold: options.threshold,
                root_margin: options.root_margin,
            },
            Box::new(callback),
        );

        match observer {
            None => debug!(element = %element, "intersection detection unavailable, element will not reveal"),
            Some(id) => {
                let mut inner = trigger.inner.borrow_mut();
                // A host may deliver the first entry synchronously.
                if inner.has_triggered {
                    trigger.host.unobserve(id);
                } else {
                    inner.observer = Some(id);
                }
            }
        }

        trace!(element = %element, delay_ms, "reveal attached");
        trigger
    }

    pub fn element(&self) -> ElementHandle {
        self.element
    }

    /// Effective delay between trigger and reveal.
    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    pub fn has_triggered(&self) -> bool {
        self.inner.borrow().has_triggered
    }

    pub fn is_revealed(&self) -> bool {
        self.inner.borrow().revealed
    }

    /// Number of reveals applied so far (0 or 1).
    pub fn reveal_count(&self) -> u32 {
        self.inner.borrow().reveal_count
    }

    /// Whether the element is still being watched.
    pub fn is_observing(&self) -> bool {
        self.inner.borrow().observer.is_some()
    }

    pub fn state(&self) -> RevealableElement {
        RevealableElement {
            element: self.element,
            has_triggered: self.has_triggered(),
            delay_ms: self.delay_ms,
        }
    }

    /// Stop observing and cancel a pending reveal. Idempotent.
    pub fn teardown(&self) {
        let (observer, timer) = {
            let mut inner = self.inner.borrow_mut();
            if inner.torn_down {
                return;
            }
            inner.torn_down = true;
            (inner.observer.take(), inner.timer.take())
        };
        if let Some(id) = observer {
            self.host.unobserve(id);
        }
        if let Some(id) = timer {
            self.host.clear_timeout(id);
        }
        trace!(element = %self.element, "reveal torn down");
    }
}

impl Drop for RevealTrigger {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn on_entry(
    host: &Rc<dyn Host>,
    inner: &Rc<RefCell<RevealInner>>,
    entry: &IntersectionEntry,
    threshold: f64,
    delay_ms: f64,
    class_name: &str,
) {
    {
        let mut state = inner.borrow_mut();
        if state.has_triggered || state.torn_down {
            return;
        }
        if !entry.is_intersecting || entry.intersection_ratio < threshold {
            return;
        }
        state.has_triggered = true;
        if let Some(id) = state.observer.take() {
            host.unobserve(id);
        }
    }
    debug!(element = %entry.target, ratio = entry.intersection_ratio, delay_ms, "reveal triggered");

    let element = entry.target;
    let weak_host: Weak<dyn Host> = Rc::downgrade(host);
    let weak_inner = Rc::downgrade(inner);
    let class = class_name.to_string();
    let timer = host.set_timeout(
        delay_ms,
        Box::new(move || {
            if let (Some(host), Some(inner)) = (weak_host.upgrade(), weak_inner.upgrade()) {
                apply_reveal(&host, &inner, element, &class);
            }
        }),
    );

    match timer {
        Some(id) => inner.borrow_mut().timer = Some(id),
        None => apply_reveal(host, inner, element, class_name),
    }
}

fn apply_reveal(host: &Rc<dyn Host>, inner: &Rc<RefCell<RevealInner>>, element: ElementHandle, class_name: &str) {
    let on_reveal = {
        let mut state = inner.borrow_mut();
        if state.torn_down || state.revealed {
            return;
        }
        state.timer = None;
        state.revealed = true;
        state.reveal_count += 1;
        state.on_reveal.take()
    };
    host.add_class(element, class_name);
    trace!(element = %element, class_name, "revealed");
    if let Some(callback) = on_reveal {
        callback(element);
    }
}

// =============================================================================
// TESTS
// =============================================================================
