//! Reveal primitives - sections and cards that animate in once visible.
//!
//! Thin wrappers over [`RevealTrigger`]: each tags the element with its base
//! class so the stylesheet can hold it in the pre-reveal state, then attaches
//! a trigger with the preset for that block.
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::primitives::{animated_card, AnimatedCardProps};
//!
//! for (i, element) in cards.iter().enumerate() {
//!     mounted.push(animated_card(&host, *element, AnimatedCardProps {
//!         delay_ms: i as f64 * 100.0,
//!         ..Default::default()
//!     }));
//! }
//! ```

use tracing::debug;

use crate::host::SharedHost;
use crate::state::{RevealOptions, RevealTrigger};
use crate::types::ElementHandle;

use super::types::{
    AnimatedCardProps, AnimatedSectionProps, FeatureCardProps, Mounted, ANIMATED_CARD_CLASS,
    ANIMATED_SECTION_CLASS, FEATURE_CARD_CLASS,
};

fn mount_reveal(host: &SharedHost, element: ElementHandle, base_class: &str, options: RevealOptions) -> Mounted {
    host.add_class(element, base_class);
    let class_name = options.class_name.clone();
    let trigger = RevealTrigger::attach(host.clone(), element, options);

    // An inert trigger would leave the base class hiding the element.
    if !trigger.is_observing() && !trigger.has_triggered() {
        debug!(element = %element, "reveal unavailable, showing element");
        host.add_class(element, &class_name);
    }
    Mounted::new(element, Box::new(move || trigger.teardown()))
}

/// Preset delay plus the per-block delay.
fn combined(reveal: RevealOptions, delay_ms: f64) -> RevealOptions {
    let delay_ms = reveal.delay_ms + delay_ms;
    reveal.with_delay(delay_ms)
}

/// Page section revealed with the section preset.
pub fn animated_section(host: &SharedHost, element: ElementHandle, props: AnimatedSectionProps) -> Mounted {
    mount_reveal(host, element, ANIMATED_SECTION_CLASS, combined(props.reveal, props.delay_ms))
}

/// Grid card revealed with the card preset (stagger delay plus jitter).
pub fn animated_card(host: &SharedHost, element: ElementHandle, props: AnimatedCardProps) -> Mounted {
    mount_reveal(host, element, ANIMATED_CARD_CLASS, combined(props.reveal, props.delay_ms))
}

/// Project card revealed with the feature preset.
pub fn feature_card(host: &SharedHost, element: ElementHandle, props: FeatureCardProps) -> Mounted {
    mount_reveal(host, element, FEATURE_CARD_CLASS, combined(props.reveal, props.delay_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::host::{Facilities, SimulatedHost};
    use crate::state::{CARD_REVEAL_CLASS, SECTION_REVEAL_CLASS};
    use crate::types::Rect;

    fn setup() -> (Rc<SimulatedHost>, SharedHost) {
        let sim = Rc::new(SimulatedHost::new(1280.0, 800.0));
        let host: SharedHost = sim.clone();
        (sim, host)
    }

    #[test]
    fn test_section_reveals_when_visible() {
        let (sim, host) = setup();
        let el = sim.create_element(Some("about"), Rect::new(0.0, 100.0, 1280.0, 500.0));

        let mounted = animated_section(&host, el, AnimatedSectionProps::default());
        assert!(sim.has_class(el, ANIMATED_SECTION_CLASS));
        assert!(!sim.has_class(el, SECTION_REVEAL_CLASS));

        sim.run_frame();
        sim.advance(1.0);
        assert!(sim.has_class(el, SECTION_REVEAL_CLASS));
        assert!(mounted.is_mounted());
    }

    #[test]
    fn test_card_waits_for_stagger_delay() {
        let (sim, host) = setup();
        let el = sim.create_element(None, Rect::new(0.0, 100.0, 300.0, 200.0));

        let _mounted = animated_card(&host, el, AnimatedCardProps {
            delay_ms: 300.0,
            ..Default::default()
        });

        sim.run_frame();
        sim.advance(250.0);
        assert!(!sim.has_class(el, CARD_REVEAL_CLASS));

        // Delay plus at most 50ms of jitter.
        sim.advance(100.0);
        assert!(sim.has_class(el, CARD_REVEAL_CLASS));
    }

    #[test]
    fn test_feature_card_needs_inset_viewport() {
        let (sim, host) = setup();
        // Top edge sits inside the 80px inset band at the bottom of the viewport.
        let el = sim.create_element(None, Rect::new(100.0, 740.0, 400.0, 300.0));
        let _mounted = feature_card(&host, el, FeatureCardProps::default());

        sim.run_frames(2);
        sim.advance(10.0);
        assert!(!sim.has_class(el, SECTION_REVEAL_CLASS));

        sim.scroll_to(400.0);
        sim.run_frame();
        sim.advance(10.0);
        assert!(sim.has_class(el, SECTION_REVEAL_CLASS));
    }

    #[test]
    fn test_props_delay_adds_to_preset_delay() {
        let (sim, host) = setup();
        let el = sim.create_element(None, Rect::new(0.0, 100.0, 1280.0, 500.0));

        let _mounted = animated_section(&host, el, AnimatedSectionProps {
            delay_ms: 100.0,
            reveal: RevealOptions::section().with_delay(400.0),
        });

        sim.run_frame();
        sim.advance(450.0);
        assert!(!sim.has_class(el, SECTION_REVEAL_CLASS));
        sim.advance(60.0);
        assert!(sim.has_class(el, SECTION_REVEAL_CLASS));
    }

    #[test]
    fn test_without_intersection_content_stays_visible() {
        let sim = Rc::new(SimulatedHost::with_facilities(
            1280.0,
            800.0,
            Facilities::FRAMES | Facilities::TIMERS | Facilities::EVENTS,
        ));
        let host: SharedHost = sim.clone();
        let section = sim.create_element(Some("about"), Rect::new(0.0, 1200.0, 1280.0, 500.0));
        let card = sim.create_element(None, Rect::new(0.0, 1300.0, 300.0, 200.0));

        let _section = animated_section(&host, section, AnimatedSectionProps::default());
        let _card = animated_card(&host, card, AnimatedCardProps::default());

        assert_eq!(sim.classes(section), vec![ANIMATED_SECTION_CLASS, SECTION_REVEAL_CLASS]);
        assert_eq!(sim.classes(card), vec![ANIMATED_CARD_CLASS, CARD_REVEAL_CLASS]);
    }

    #[test]
    fn test_unmount_before_visible_never_reveals() {
        let (sim, host) = setup();
        let el = sim.create_element(None, Rect::new(0.0, 2000.0, 300.0, 200.0));
        let mounted = animated_section(&host, el, AnimatedSectionProps::default());

        mounted.unmount();
        assert_eq!(sim.observer_count(), 0);

        sim.scroll_to(1800.0);
        sim.run_frame();
        sim.advance(10.0);
        assert!(!sim.has_class(el, SECTION_REVEAL_CLASS));
    }
}
