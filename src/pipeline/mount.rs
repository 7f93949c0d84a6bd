//! Mount API - Attach the animation layer to a whole page.
//!
//! Lays the page out for the host's viewport, creates one host element per
//! placed block, then attaches the primitive each block's role calls for.
//! The returned [`PageHandle`] owns every controller; dropping it (or
//! calling [`PageHandle::teardown`]) detaches them all.
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::pipeline::mount_page;
//!
//! let host = Rc::new(SimulatedHost::new(1280.0, 800.0));
//! let page = mount_page(host.clone(), &content, &MotionConfig::default())?;
//!
//! host.scroll_to(900.0);
//! host.run_frame();
//! println!("active: {:?}", page.navbar().active_section());
//!
//! page.teardown();
//! ```

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::MotionConfig;
use crate::content::PortfolioContent;
use crate::error::FolioResult;
use crate::host::{DocumentHost, Host, SharedHost};
use crate::layout::layout_page;
use crate::primitives::{
    animated_card, animated_section, feature_card, magnetic_button, navbar, tilt_card, AnimatedCardProps,
    AnimatedSectionProps, FeatureCardProps, MagneticButtonProps, Mounted, Navbar, TiltCardProps,
};
use crate::types::{ElementHandle, Rect};

use super::blueprint::{page_blueprint, BlockRole, NAVBAR_HEIGHT_PX};

/// Id given to the navigation bar element.
pub const NAV_ELEMENT_ID: &str = "nav";

// =============================================================================
// Page Handle
// =============================================================================

/// Everything attached by [`mount_page`].
pub struct PageHandle {
    mounted: Vec<Mounted>,
    navbar: Navbar,
    elements: Vec<(BlockRole, ElementHandle)>,
    height: f64,
    torn_down: Cell<bool>,
}

impl PageHandle {
    /// Host element created for the first block with `role`.
    pub fn element_for(&self, role: &BlockRole) -> Option<ElementHandle> {
        self.elements.iter().find(|(r, _)| r == role).map(|(_, el)| *el)
    }

    /// Blocks in layout pre-order with their elements.
    pub fn elements(&self) -> &[(BlockRole, ElementHandle)] {
        &self.elements
    }

    pub fn navbar(&self) -> &Navbar {
        &self.navbar
    }

    /// Total document height of the laid-out page.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Primitives currently attached.
    pub fn mounted_count(&self) -> usize {
        self.mounted.iter().filter(|m| m.is_mounted()).count()
    }

    pub fn is_mounted(&self) -> bool {
        !self.torn_down.get()
    }

    /// Detach every primitive and the navbar. Idempotent.
    pub fn teardown(&self) {
        if self.torn_down.replace(true) {
            return;
        }
        for mounted in &self.mounted {
            mounted.unmount();
        }
        self.navbar.unmount();
        debug!(primitives = self.mounted.len(), "page torn down");
    }
}

impl Drop for PageHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

// =============================================================================
// Mount Function
// =============================================================================

fn attach_role(
    host: &SharedHost,
    role: &BlockRole,
    element: ElementHandle,
    config: &MotionConfig,
) -> Option<Mounted> {
    let reveal = &config.reveal;
    let stagger = |index: usize| index as f64 * reveal.stagger_ms;
    let card = |delay_ms: f64| AnimatedCardProps {
        delay_ms,
        reveal: reveal.card.clone(),
    };

    let mounted = match role {
        BlockRole::Section(_) => animated_section(host, element, AnimatedSectionProps {
            delay_ms: 0.0,
            reveal: reveal.section.clone(),
        }),
        BlockRole::AboutCard | BlockRole::ContactForm => animated_card(host, element, card(0.0)),
        BlockRole::SkillTilt(_) => tilt_card(host, element, TiltCardProps { params: config.tilt }),
        BlockRole::SkillCard(i) | BlockRole::ExperienceCard(i) | BlockRole::ContactMethod(i) => {
            animated_card(host, element, card(stagger(*i)))
        }
        BlockRole::ProjectCard(i) => feature_card(host, element, FeatureCardProps {
            delay_ms: stagger(*i),
            reveal: reveal.feature.clone(),
        }),
        BlockRole::SendButton => magnetic_button(host, element, MagneticButtonProps {
            params: config.magnetic,
        }),
        _ => return None,
    };
    Some(mounted)
}

/// Lay out `content` for the host viewport and attach every primitive.
///
/// Fails only when the viewport cannot be laid out. Missing host
/// facilities degrade individual primitives, never the mount.
pub fn mount_page<H>(host: Rc<H>, content: &PortfolioContent, config: &MotionConfig) -> FolioResult<PageHandle>
where
    H: Host + DocumentHost + 'static,
{
    let viewport_width = host.viewport_width();
    let layout = layout_page(viewport_width, &page_blueprint(content, viewport_width))?;

    let mut elements = Vec::with_capacity(layout.blocks.len());
    for block in &layout.blocks {
        let element = host.create_element(block.payload.anchor(), block.rect);
        elements.push((block.payload.clone(), element));
    }

    let nav_element = host.create_element(
        Some(NAV_ELEMENT_ID),
        Rect::new(0.0, 0.0, viewport_width, NAVBAR_HEIGHT_PX),
    );

    for id in &config.scroll_spy.sections {
        if host.element_by_id(id).is_none() {
            warn!(section = %id, "nav section has no element on the page");
        }
    }

    let shared: SharedHost = host;
    let mounted: Vec<Mounted> = elements
        .iter()
        .filter_map(|(role, element)| attach_role(&shared, role, *element, config))
        .collect();
    let navbar = navbar(&shared, nav_element, config.scroll_spy.clone());

    info!(
        blocks = elements.len(),
        primitives = mounted.len(),
        height = layout.height,
        "page mounted"
    );

    Ok(PageHandle {
        mounted,
        navbar,
        elements,
        height: layout.height,
        torn_down: Cell::new(false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FolioError, LayoutError};
    use crate::host::{ElementHost, Facilities, SimulatedHost};
    use crate::primitives::{ANIMATED_SECTION_CLASS, TILT_CARD_CLASS};
    use crate::state::SECTION_REVEAL_CLASS;
    use crate::types::{Transform, Vec2};

    fn setup() -> (Rc<SimulatedHost>, PageHandle) {
        let host = Rc::new(SimulatedHost::new(1280.0, 800.0));
        let page = mount_page(host.clone(), &PortfolioContent::placeholder(), &MotionConfig::default()).unwrap();
        (host, page)
    }

    fn rect_of(host: &SimulatedHost, element: ElementHandle) -> Rect {
        host.bounding_rect(element).unwrap()
    }

    #[test]
    fn test_one_element_per_block() {
        let (_host, page) = setup();
        let content = PortfolioContent::placeholder();
        let skills = page
            .elements()
            .iter()
            .filter(|(r, _)| matches!(r, BlockRole::SkillCard(_)))
            .count();
        assert_eq!(skills, content.skills.categories.len());
        assert!(page.element_for(&BlockRole::SendButton).is_some());
        assert!(page.height() > 800.0);
    }

    #[test]
    fn test_sections_tagged_and_anchored() {
        let (host, page) = setup();
        let about = host.element_by_id("about").unwrap();
        assert_eq!(Some(about), page.element_for(&BlockRole::Section("about".to_string())));
        assert!(host.has_class(about, ANIMATED_SECTION_CLASS));
        assert!(host.element_by_id(NAV_ELEMENT_ID).is_some());
    }

    #[test]
    fn test_scrolling_reveals_sections() {
        let (host, page) = setup();
        let contact = page.element_for(&BlockRole::Section("contact".to_string())).unwrap();
        host.run_frame();
        host.advance(10.0);
        assert!(!host.has_class(contact, SECTION_REVEAL_CLASS));

        let top = rect_of(&host, contact).top;
        host.scroll_to(top - 50.0);
        host.run_frame();
        host.advance(10.0);
        assert!(host.has_class(contact, SECTION_REVEAL_CLASS));
        assert_eq!(page.navbar().active_section().as_deref(), Some("contact"));
    }

    #[test]
    fn test_configured_section_delay_applies() {
        let config = MotionConfig::from_toml_str("[reveal.section]\ndelay_ms = 500.0").unwrap();
        let host = Rc::new(SimulatedHost::new(1280.0, 800.0));
        let page = mount_page(host.clone(), &PortfolioContent::placeholder(), &config).unwrap();
        let about = page.element_for(&BlockRole::Section("about".to_string())).unwrap();

        let top = rect_of(&host, about).top;
        host.scroll_to(top - 50.0);
        host.run_frame();
        host.advance(50.0);
        assert!(!host.has_class(about, SECTION_REVEAL_CLASS));

        host.advance(500.0);
        assert!(host.has_class(about, SECTION_REVEAL_CLASS));
    }

    #[test]
    fn test_tilt_card_follows_pointer() {
        let (host, page) = setup();
        let tilt = page.element_for(&BlockRole::SkillTilt(0)).unwrap();
        assert!(host.has_class(tilt, TILT_CARD_CLASS));

        let rect = rect_of(&host, tilt);
        host.scroll_to(rect.top - 100.0);
        host.run_frame();
        host.pointer_move(Vec2::new(rect.left + 10.0, 110.0));
        host.run_frames(5);
        assert!(matches!(host.transform(tilt), Some(Transform::Tilt { .. })));
    }

    #[test]
    fn test_teardown_detaches_everything() {
        let (host, page) = setup();
        assert!(page.mounted_count() > 0);
        assert!(host.listener_count() > 0);

        page.teardown();
        page.teardown();
        assert!(!page.is_mounted());
        assert_eq!(page.mounted_count(), 0);
        assert_eq!(host.observer_count(), 0);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn test_drop_tears_down() {
        let (host, page) = setup();
        drop(page);
        assert_eq!(host.observer_count(), 0);
        assert_eq!(host.listener_count(), 0);
    }

    #[test]
    fn test_degraded_host_still_mounts() {
        let host = Rc::new(SimulatedHost::with_facilities(1280.0, 800.0, Facilities::EVENTS));
        let page = mount_page(host.clone(), &PortfolioContent::placeholder(), &MotionConfig::default()).unwrap();
        assert_eq!(host.observer_count(), 0);

        // Scroll spy falls back to synchronous recomputes.
        host.scroll_to(150.0);
        assert!(page.navbar().state().scrolled_past_threshold);
    }

    #[test]
    fn test_invalid_viewport_rejected() {
        let host = Rc::new(SimulatedHost::new(0.0, 800.0));
        let result = mount_page(host, &PortfolioContent::placeholder(), &MotionConfig::default());
        assert!(matches!(result, Err(FolioError::Layout(LayoutError::InvalidViewport(_)))));
    }
}
