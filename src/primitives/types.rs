//! Primitive types - Props, class names and the mounted handle.
//!
//! Every primitive takes an element that already exists on the host (the
//! markup rendered it) and attaches the behavior that element needs. The
//! returned [`Mounted`] detaches it again.

use std::cell::RefCell;

use crate::state::{MagneticParams, RevealOptions, TiltParams};
use crate::types::ElementHandle;

// =============================================================================
// Class Names
// =============================================================================

pub const ANIMATED_SECTION_CLASS: &str = "animated-section";
pub const ANIMATED_CARD_CLASS: &str = "animated-card";
pub const FEATURE_CARD_CLASS: &str = "feature-card";
pub const TILT_CARD_CLASS: &str = "tilt-card";
pub const MAGNETIC_BUTTON_CLASS: &str = "magnetic-btn";
pub const NAVBAR_CLASS: &str = "navbar";
pub const NAVBAR_SCROLLED_CLASS: &str = "navbar-scrolled";
pub const NAV_LINK_CLASS: &str = "nav-link";
pub const SPARKLES_CLASS: &str = "sparkles";
pub const SPARKLE_CLASS: &str = "sparkle";
pub const FLOATING_GRADIENTS_CLASS: &str = "floating-gradients";

/// Background blobs of the floating gradient layer, one class each.
pub const FLOATING_GRADIENT_BLOBS: [&str; 3] = ["blob-1", "blob-2", "blob-3"];

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by primitives.
pub type Cleanup = Box<dyn FnOnce()>;

/// A primitive attached to one element.
///
/// `unmount` runs the cleanup once; dropping the handle unmounts too.
pub struct Mounted {
    element: ElementHandle,
    cleanup: RefCell<Option<Cleanup>>,
}

impl Mounted {
    pub fn new(element: ElementHandle, cleanup: Cleanup) -> Self {
        Self {
            element,
            cleanup: RefCell::new(Some(cleanup)),
        }
    }

    pub fn element(&self) -> ElementHandle {
        self.element
    }

    pub fn is_mounted(&self) -> bool {
        self.cleanup.borrow().is_some()
    }

    pub fn unmount(&self) {
        let cleanup = self.cleanup.borrow_mut().take();
        if let Some(cleanup) = cleanup {
            cleanup();
        }
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for Mounted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mounted")
            .field("element", &self.element)
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

// =============================================================================
// Props
// =============================================================================

/// Section that fades in once scrolled into view.
#[derive(Debug, Clone)]
pub struct AnimatedSectionProps {
    /// Added to the preset's own delay.
    pub delay_ms: f64,
    pub reveal: RevealOptions,
}

impl Default for AnimatedSectionProps {
    fn default() -> Self {
        Self {
            delay_ms: 0.0,
            reveal: RevealOptions::section(),
        }
    }
}

/// Card revealed with a stagger delay and a little jitter.
#[derive(Debug, Clone)]
pub struct AnimatedCardProps {
    pub delay_ms: f64,
    pub reveal: RevealOptions,
}

impl Default for AnimatedCardProps {
    fn default() -> Self {
        Self {
            delay_ms: 0.0,
            reveal: RevealOptions::card(),
        }
    }
}

/// Larger card revealed once well inside the viewport.
#[derive(Debug, Clone)]
pub struct FeatureCardProps {
    pub delay_ms: f64,
    pub reveal: RevealOptions,
}

impl Default for FeatureCardProps {
    fn default() -> Self {
        Self {
            delay_ms: 0.0,
            reveal: RevealOptions::feature(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TiltCardProps {
    pub params: TiltParams,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MagneticButtonProps {
    pub params: MagneticParams,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_unmount_runs_cleanup_once() {
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();
        let mounted = Mounted::new(
            ElementHandle::from_index(3),
            Box::new(move || calls_clone.set(calls_clone.get() + 1)),
        );

        assert!(mounted.is_mounted());
        mounted.unmount();
        mounted.unmount();
        assert!(!mounted.is_mounted());
        drop(mounted);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_drop_unmounts() {
        let calls = Rc::new(Cell::new(0));
        let calls_clone = calls.clone();
        {
            let _mounted = Mounted::new(
                ElementHandle::from_index(0),
                Box::new(move || calls_clone.set(calls_clone.get() + 1)),
            );
        }
        assert_eq!(calls.get(), 1);
    }
}
