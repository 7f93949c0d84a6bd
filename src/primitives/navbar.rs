//! Navbar - navigation links fed by the scroll spy.
//!
//! The bar switches to its compact style once the page has scrolled a
//! little, and highlights the link of the section currently under it.
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::primitives::navbar;
//!
//! let nav = navbar(&host, nav_element, ScrollSpyConfig::default());
//! host.scroll_to(900.0);
//! host.run_frame();
//! let active: Vec<_> = nav.links().into_iter().filter(|l| l.active).collect();
//! ```

use std::rc::Rc;

use tracing::trace;

use crate::host::SharedHost;
use crate::state::{ScrollNavState, ScrollSpy, ScrollSpyConfig};
use crate::types::ElementHandle;

use super::types::{NAVBAR_CLASS, NAVBAR_SCROLLED_CLASS};

/// Call-to-action link shown at the right of the bar.
pub const NAV_CTA_LABEL: &str = "Get in Touch";
pub const NAV_CTA_HREF: &str = "#contact";

// =============================================================================
// LINKS
// =============================================================================

/// One in-page navigation link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub section_id: String,
    pub href: String,
    pub label: String,
    pub active: bool,
}

/// Link label for a section anchor: first letter upper-cased.
pub fn nav_label(section_id: &str) -> String {
    let mut chars = section_id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Links for every configured section, marking the active one.
pub fn nav_links(config: &ScrollSpyConfig, state: &ScrollNavState) -> Vec<NavLink> {
    config
        .sections
        .iter()
        .map(|id| NavLink {
            section_id: id.clone(),
            href: format!("#{id}"),
            label: nav_label(id),
            active: state.active_section_id.as_deref() == Some(id.as_str()),
        })
        .collect()
}

/// Class list of the bar element for a state.
pub fn navbar_class(state: &ScrollNavState) -> String {
    if state.scrolled_past_threshold {
        format!("{NAVBAR_CLASS} {NAVBAR_SCROLLED_CLASS}")
    } else {
        NAVBAR_CLASS.to_string()
    }
}

fn apply_scrolled_class(host: &SharedHost, element: ElementHandle, state: &ScrollNavState) {
    if state.scrolled_past_threshold {
        host.add_class(element, NAVBAR_SCROLLED_CLASS);
    } else {
        host.remove_class(element, NAVBAR_SCROLLED_CLASS);
    }
}

// =============================================================================
// NAVBAR
// =============================================================================

/// Mounted navigation bar.
pub struct Navbar {
    element: ElementHandle,
    spy: ScrollSpy,
}

impl Navbar {
    pub fn element(&self) -> ElementHandle {
        self.element
    }

    pub fn state(&self) -> ScrollNavState {
        self.spy.state()
    }

    pub fn links(&self) -> Vec<NavLink> {
        nav_links(self.spy.config(), &self.spy.state())
    }

    pub fn active_section(&self) -> Option<String> {
        self.spy.state().active_section_id
    }

    /// Stop tracking scroll. Idempotent.
    pub fn unmount(&self) {
        self.spy.teardown();
    }
}

/// Attach a scroll spy to the bar element and keep its scrolled class in
/// sync.
pub fn navbar(host: &SharedHost, element: ElementHandle, config: ScrollSpyConfig) -> Navbar {
    host.add_class(element, NAVBAR_CLASS);

    let weak_host = Rc::downgrade(host);
    let on_change = move |state: &ScrollNavState| {
        let Some(host) = weak_host.upgrade() else {
            return;
        };
        trace!(active = ?state.active_section_id, "navbar updated");
        apply_scrolled_class(&host, element, state);
    };
    let spy = ScrollSpy::attach_with(host.clone(), config, Rc::new(on_change));
    apply_scrolled_class(host, element, &spy.state());

    Navbar { element, spy }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SimulatedHost;
    use crate::state::NAV_SECTIONS;
    use crate::types::Rect;

    fn setup() -> (Rc<SimulatedHost>, SharedHost, ElementHandle) {
        let sim = Rc::new(SimulatedHost::new(1280.0, 800.0));
        let host: SharedHost = sim.clone();
        let nav = sim.create_element(Some("nav"), Rect::new(0.0, 0.0, 1280.0, 72.0));
        for (i, id) in NAV_SECTIONS.iter().enumerate() {
            sim.create_element(Some(id), Rect::new(0.0, 800.0 + i as f64 * 500.0, 1280.0, 500.0));
        }
        (sim, host, nav)
    }

    #[test]
    fn test_nav_label() {
        assert_eq!(nav_label("about"), "About");
        assert_eq!(nav_label("experience"), "Experience");
        assert_eq!(nav_label(""), "");
    }

    #[test]
    fn test_nav_links_mark_active() {
        let state = ScrollNavState {
            scrolled_past_threshold: true,
            active_section_id: Some("projects".to_string()),
        };
        let links = nav_links(&ScrollSpyConfig::default(), &state);
        assert_eq!(links.len(), 5);
        assert_eq!(links[0].href, "#about");
        assert_eq!(links[0].label, "About");
        let active: Vec<_> = links.iter().filter(|l| l.active).map(|l| l.section_id.as_str()).collect();
        assert_eq!(active, vec!["projects"]);
    }

    #[test]
    fn test_navbar_class() {
        let mut state = ScrollNavState::default();
        assert_eq!(navbar_class(&state), "navbar");
        state.scrolled_past_threshold = true;
        assert_eq!(navbar_class(&state), "navbar navbar-scrolled");
    }

    #[test]
    fn test_scrolled_class_toggles() {
        let (sim, host, nav) = setup();
        let bar = navbar(&host, nav, ScrollSpyConfig::default());
        assert!(sim.has_class(nav, NAVBAR_CLASS));
        assert!(!sim.has_class(nav, NAVBAR_SCROLLED_CLASS));

        sim.scroll_to(120.0);
        sim.run_frame();
        assert!(sim.has_class(nav, NAVBAR_SCROLLED_CLASS));

        sim.scroll_to(0.0);
        sim.run_frame();
        assert!(!sim.has_class(nav, NAVBAR_SCROLLED_CLASS));
        assert!(!bar.state().scrolled_past_threshold);
    }

    #[test]
    fn test_active_link_follows_scroll() {
        let (sim, host, nav) = setup();
        let bar = navbar(&host, nav, ScrollSpyConfig::default());
        assert_eq!(bar.active_section(), None);

        // skills spans document [1300, 1800].
        sim.scroll_to(1250.0);
        sim.run_frame();
        assert_eq!(bar.active_section().as_deref(), Some("skills"));
        assert!(bar.links().iter().any(|l| l.section_id == "skills" && l.active));
    }

    #[test]
    fn test_unmount_stops_updates() {
        let (sim, host, nav) = setup();
        let bar = navbar(&host, nav, ScrollSpyConfig::default());
        bar.unmount();
        bar.unmount();

        sim.scroll_to(500.0);
        sim.run_frame();
        assert!(!sim.has_class(nav, NAVBAR_SCROLLED_CLASS));
    }
}
