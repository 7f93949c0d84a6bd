//! Scroll-Spy - which section is under the navigation bar
//!
//! Tracks two facts about the page scroll position:
//!
//! - whether the page has scrolled past a small threshold (the navigation bar
//!   switches to its compact style), and
//! - which section currently straddles a horizontal reference line just
//!   below the navigation bar.
//!
//! Scroll events only mark the state dirty; the recomputation happens on the
//! next frame, with at most one frame pending at a time. Hosts without frame
//! scheduling recompute synchronously on every scroll event.
//!
//! # API
//!
//! - `compute_nav_state(prev, scroll_y, config, lookup)` - Pure recompute
//! - `active_section(config, lookup)` - First straddling section
//! - `ScrollSpy::attach(host, config)` - Live spy with teardown

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::host::{EventKind, EventTarget, FrameId, HostEvent, ListenerId, SharedHost};
use crate::types::{ListenerFlags, Rect};

/// Section anchors in priority order.
pub const NAV_SECTIONS: [&str; 5] = ["about", "skills", "projects", "experience", "contact"];

// =============================================================================
// CONFIG & STATE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollSpyConfig {
    /// Scroll offset past which the page counts as scrolled (exclusive).
    pub scrolled_threshold_px: f64,
    /// Client-space y of the reference line.
    pub reference_line_px: f64,
    /// Section anchors, first match wins.
    pub sections: Vec<String>,
    /// Clear the active section when nothing straddles the line, instead of
    /// keeping the last one.
    pub clear_when_none: bool,
}

impl Default for ScrollSpyConfig {
    fn default() -> Self {
        Self {
            scrolled_threshold_px: 50.0,
            reference_line_px: 100.0,
            sections: NAV_SECTIONS.iter().map(|s| s.to_string()).collect(),
            clear_when_none: false,
        }
    }
}

/// Navigation state derived from the scroll position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrollNavState {
    pub scrolled_past_threshold: bool,
    pub active_section_id: Option<String>,
}

// =============================================================================
// PURE COMPUTATION
// =============================================================================

/// First section, in config order, whose client box straddles the reference
/// line (both edges inclusive). Sections the lookup cannot find are skipped.
pub fn active_section<F>(config: &ScrollSpyConfig, mut lookup: F) -> Option<&str>
where
    F: FnMut(&str) -> Option<Rect>,
{
    let line = config.reference_line_px;
    config
        .sections
        .iter()
        .find(|id| lookup(id.as_str()).is_some_and(|rect| rect.top <= line && rect.bottom() >= line))
        .map(String::as_str)
}

/// Recompute the navigation state.
pub fn compute_nav_state<F>(
    prev: &ScrollNavState,
    scroll_y: f64,
    config: &ScrollSpyConfig,
    lookup: F,
) -> ScrollNavState
where
    F: FnMut(&str) -> Option<Rect>,
{
    let active_section_id = match active_section(config, lookup) {
        Some(id) => Some(id.to_string()),
        None if config.clear_when_none => None,
        None => prev.active_section_id.clone(),
    };

    ScrollNavState {
        scrolled_past_threshold: scroll_y > config.scrolled_threshold_px,
        active_section_id,
    }
}

/// Recompute against a host's current geometry.
fn compute_from_host(host: &SharedHost, prev: &ScrollNavState, config: &ScrollSpyConfig) -> ScrollNavState {
    compute_nav_state(prev, host.scroll_y(), config, |id| {
        host.element_by_id(id).and_then(|el| host.bounding_rect(el))
    })
}

// =============================================================================
// LIVE SPY
// =============================================================================

pub type NavChangeCallback = Rc<dyn Fn(&ScrollNavState)>;

struct SpyInner {
    state: ScrollNavState,
    pending_frame: Option<FrameId>,
    listener: Option<ListenerId>,
    on_change: Option<NavChangeCallback>,
    recomputes: u64,
    torn_down: bool,
}

/// Live scroll spy bound to a host. Tears down on drop.
pub struct ScrollSpy {
    host: SharedHost,
    config: Rc<ScrollSpyConfig>,
    inner: Rc<RefCell<SpyInner>>,
}

impl ScrollSpy {
    pub fn attach(host: SharedHost, config: ScrollSpyConfig) -> Self {
        Self::attach_inner(host, config, None)
    }

    /// Attach with a callback fired after each change of state.
    /// Not fired for the initial state.
    pub fn attach_with(host: SharedHost, config: ScrollSpyConfig, on_change: NavChangeCallback) -> Self {
        Self::attach_inner(host, config, Some(on_change))
    }

    fn attach_inner(host: SharedHost, config: ScrollSpyConfig, on_change: Option<NavChangeCallback>) -> Self {
        let config = Rc::new(config);
        let initial = compute_from_host(&host, &ScrollNavState::default(), &config);
        debug!(
            scrolled = initial.scrolled_past_threshold,
            active = ?initial.active_section_id,
            "scroll spy attached"
        );

        let inner = Rc::new(RefCell::new(SpyInner {
            state: initial,
            pending_frame: None,
            listener: None,
            on_change,
            recomputes: 1,
            torn_down: false,
        }));

        let weak_host = Rc::downgrade(&host);
        let weak_inner = Rc::downgrade(&inner);
        let handler_config = config.clone();
        let handler = move |_event: &HostEvent| {
            let (Some(host), Some(inner)) = (weak_host.upgrade(), weak_inner.upgrade()) else {
                return;
            };
            on_scroll(&host, &inner, &handler_config);
        };
        let listener = host.add_listener(
            EventTarget::Window,
            EventKind::Scroll,
            ListenerFlags::PASSIVE,
            Rc::new(handler),
        );
        if listener.is_none() {
            debug!("event listeners unavailable, scroll spy frozen at initial state");
        }
        inner.borrow_mut().listener = listener;

        Self { host, config, inner }
    }

    pub fn state(&self) -> ScrollNavState {
        self.inner.borrow().state.clone()
    }

    pub fn config(&self) -> &ScrollSpyConfig {
        &self.config
    }

    /// Number of recomputations, including the one at attach.
    pub fn recomputes(&self) -> u64 {
        self.inner.borrow().recomputes
    }

    pub fn has_pending_frame(&self) -> bool {
        self.inner.borrow().pending_frame.is_some()
    }

    /// Remove the scroll listener and cancel any pending frame. Idempotent.
    pub fn teardown(&self) {
        let (frame, listener) = {
            let mut inner = self.inner.borrow_mut();
            if inner.torn_down {
                return;
            }
            inner.torn_down = true;
            inner.on_change = None;
            (inner.pending_frame.take(), inner.listener.take())
        };
        if let Some(id) = frame {
            self.host.cancel_frame(id);
        }
        if let Some(id) = listener {
            self.host.remove_listener(id);
        }
        trace!("scroll spy torn down");
    }
}

impl Drop for ScrollSpy {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn on_scroll(host: &SharedHost, inner: &Rc<RefCell<SpyInner>>, config: &Rc<ScrollSpyConfig>) {
    {
        let state = inner.borrow();
        if state.torn_down || state.pending_frame.is_some() {
            return;
        }
    }

    let weak_host = Rc::downgrade(host);
    let weak_inner = Rc::downgrade(inner);
    let frame_config = config.clone();
    let frame = host.request_frame(Box::new(move |_timestamp: f64| {
        let (Some(host), Some(inner)) = (weak_host.upgrade(), weak_inner.upgrade()) else {
            return;
        };
        inner.borrow_mut().pending_frame = None;
        recompute(&host, &inner, &frame_config);
    }));

    match frame {
        Some(id) => inner.borrow_mut().pending_frame = Some(id),
        None => recompute(host, inner, config),
    }
}

fn recompute(host: &SharedHost, inner: &Rc<RefCell<SpyInner>>, config: &ScrollSpyConfig) {
    let prev = {
        let state = inner.borrow();
        if state.torn_down {
            return;
        }
        state.state.clone()
    };

    let next = compute_from_host(host, &prev, config);

    let callback = {
        let mut state = inner.borrow_mut();
        state.recomputes += 1;
        if next == prev {
            return;
        }
        state.state = next.clone();
        state.on_change.clone()
    };

    trace!(
        scrolled = next.scrolled_past_threshold,
        active = ?next.active_section_id,
        "nav state changed"
    );
    if let Some(callback) = callback {
        callback(&next);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Facilities, SimulatedHost};
    use crate::types::ElementHandle;
    use std::cell::Cell;

    /// Five 600px sections starting at y=700, below a 700px hero.
    fn setup() -> (Rc<SimulatedHost>, Vec<ElementHandle>) {
        let host = Rc::new(SimulatedHost::new(1280.0, 800.0));
        host.create_element(Some("home"), Rect::new(0.0, 0.0, 1280.0, 700.0));
        let sections = NAV_SECTIONS
            .iter()
            .enumerate()
            .map(|(i, id)| host.create_element(Some(id), Rect::new(0.0, 700.0 + i as f64 * 600.0, 1280.0, 600.0)))
            .collect();
        (host, sections)
    }

    fn rects<'a>(pairs: &'a [(&'a str, f64, f64)]) -> impl FnMut(&str) -> Option<Rect> + 'a {
        move |id| {
            pairs
                .iter()
                .find(|(name, _, _)| *name == id)
                .map(|(_, top, bottom)| Rect::new(0.0, *top, 100.0, bottom - top))
        }
    }

    // -------------------------------------------------------------------------
    // Pure computation
    // -------------------------------------------------------------------------

    #[test]
    fn test_threshold_is_exclusive() {
        let config = ScrollSpyConfig::default();
        let prev = ScrollNavState::default();
        assert!(!compute_nav_state(&prev, 50.0, &config, |_| None).scrolled_past_threshold);
        assert!(compute_nav_state(&prev, 50.5, &config, |_| None).scrolled_past_threshold);
    }

    #[test]
    fn test_first_section_wins_tie() {
        let config = ScrollSpyConfig::default();
        // "about" ends exactly on the line, "skills" starts exactly on it.
        let pairs = [("about", -500.0, 100.0), ("skills", 100.0, 700.0)];
        assert_eq!(active_section(&config, rects(&pairs)), Some("about"));
    }

    #[test]
    fn test_missing_sections_are_skipped() {
        let config = ScrollSpyConfig::default();
        let pairs = [("projects", 50.0, 400.0)];
        assert_eq!(active_section(&config, rects(&pairs)), Some("projects"));
    }

    #[test]
    fn test_no_match_keeps_previous() {
        let config = ScrollSpyConfig::default();
        let prev = ScrollNavState {
            scrolled_past_threshold: true,
            active_section_id: Some("skills".to_string()),
        };
        let next = compute_nav_state(&prev, 0.0, &config, |_| None);
        assert_eq!(next.active_section_id.as_deref(), Some("skills"));
        assert!(!next.scrolled_past_threshold);
    }

    #[test]
    fn test_no_match_clears_when_configured() {
        let config = ScrollSpyConfig {
            clear_when_none: true,
            ..ScrollSpyConfig::default()
        };
        let prev = ScrollNavState {
            scrolled_past_threshold: false,
            active_section_id: Some("skills".to_string()),
        };
        assert_eq!(compute_nav_state(&prev, 0.0, &config, |_| None).active_section_id, None);
    }

    // -------------------------------------------------------------------------
    // Live spy
    // -------------------------------------------------------------------------

    #[test]
    fn test_initial_state_at_attach() {
        let (host, _) = setup();
        host.scroll_to(700.0);
        let spy = ScrollSpy::attach(host.clone(), ScrollSpyConfig::default());

        let state = spy.state();
        assert!(state.scrolled_past_threshold);
        assert_eq!(state.active_section_id.as_deref(), Some("about"));
        assert_eq!(spy.recomputes(), 1);
    }

    #[test]
    fn test_recompute_happens_on_next_frame() {
        let (host, _) = setup();
        let spy = ScrollSpy::attach(host.clone(), ScrollSpyConfig::default());
        assert_eq!(spy.state(), ScrollNavState::default());

        // about spans client [0, 600] at scroll 700.
        host.scroll_to(700.0);
        assert!(spy.has_pending_frame());
        assert_eq!(spy.state(), ScrollNavState::default());

        host.run_frame();
        assert!(!spy.has_pending_frame());
        assert_eq!(spy.state().active_section_id.as_deref(), Some("about"));
    }

    #[test]
    fn test_one_pending_frame_per_burst() {
        let (host, _) = setup();
        let spy = ScrollSpy::attach(host.clone(), ScrollSpyConfig::default());

        for y in [100.0, 400.0, 800.0, 1300.0] {
            host.scroll_to(y);
        }
        assert_eq!(host.pending_frames(), 1);

        host.run_frame();
        assert_eq!(spy.recomputes(), 2);
        // skills spans document [1300, 1900], client [0, 600].
        assert_eq!(spy.state().active_section_id.as_deref(), Some("skills"));
    }

    #[test]
    fn test_synchronous_without_frames() {
        let host = Rc::new(SimulatedHost::with_facilities(
            1280.0,
            800.0,
            Facilities::EVENTS | Facilities::INTERSECTION | Facilities::TIMERS,
        ));
        host.create_element(Some("about"), Rect::new(0.0, 700.0, 1280.0, 600.0));
        let spy = ScrollSpy::attach(host.clone(), ScrollSpyConfig::default());

        host.scroll_to(650.0);
        let state = spy.state();
        assert!(state.scrolled_past_threshold);
        assert_eq!(state.active_section_id.as_deref(), Some("about"));
    }

    #[test]
    fn test_keeps_previous_between_sections() {
        let host = Rc::new(SimulatedHost::new(1280.0, 800.0));
        host.create_element(Some("about"), Rect::new(0.0, 200.0, 1280.0, 300.0));
        host.create_element(Some("skills"), Rect::new(0.0, 1000.0, 1280.0, 300.0));
        let spy = ScrollSpy::attach(host.clone(), ScrollSpyConfig::default());
        assert_eq!(spy.state().active_section_id, None);

        host.scroll_to(300.0);
        host.run_frame();
        assert_eq!(spy.state().active_section_id.as_deref(), Some("about"));

        // Gap between sections: about ended above the line, skills below it.
        host.scroll_to(600.0);
        host.run_frame();
        assert_eq!(spy.state().active_section_id.as_deref(), Some("about"));
    }

    #[test]
    fn test_change_callback_only_on_change() {
        let (host, _) = setup();
        let changes = Rc::new(Cell::new(0));
        let changes_clone = changes.clone();
        let spy = ScrollSpy::attach_with(
            host.clone(),
            ScrollSpyConfig::default(),
            Rc::new(move |_: &ScrollNavState| changes_clone.set(changes_clone.get() + 1)),
        );

        host.scroll_to(10.0);
        host.run_frame();
        assert_eq!(changes.get(), 0);

        host.scroll_to(60.0);
        host.run_frame();
        assert_eq!(changes.get(), 1);

        host.scroll_to(70.0);
        host.run_frame();
        assert_eq!(changes.get(), 1);
        assert_eq!(spy.recomputes(), 4);
    }

    #[test]
    fn test_listener_is_passive() {
        let (host, _) = setup();
        let _spy = ScrollSpy::attach(host.clone(), ScrollSpyConfig::default());
        assert_eq!(host.listeners_on(EventTarget::Window), 1);
        assert!(host.all_passive(EventTarget::Window));
    }

    #[test]
    fn test_teardown_cancels_pending_frame() {
        let (host, _) = setup();
        let spy = ScrollSpy::attach(host.clone(), ScrollSpyConfig::default());

        host.scroll_to(700.0);
        assert_eq!(host.pending_frames(), 1);

        spy.teardown();
        spy.teardown();
        assert_eq!(host.pending_frames(), 0);
        assert_eq!(host.listener_count(), 0);

        host.scroll_to(1400.0);
        host.run_frame();
        assert_eq!(spy.state(), ScrollNavState::default());
    }
}
