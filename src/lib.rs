//! # spark-folio
//!
//! Animation layer for a single-page portfolio site.
//!
//! ## Architecture
//!
//! Every behavior is a small controller that owns its own state and reaches
//! the page only through a [`Host`](host::Host): intersection detection,
//! per-frame callbacks, timers and event listeners. A host that lacks one of
//! these degrades the controllers that need it instead of failing.
//!
//! The page itself is data:
//! ```text
//! PortfolioContent → blueprint → Taffy layout → host elements → primitives
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Geometry, element handles, transforms
//! - [`host`] - Host capability traits, the simulated host, terminal bridge
//! - [`state`] - Reveal trigger, pointer-follow controller, scroll spy
//! - [`primitives`] - Page blocks built on the controllers, plus sparkles
//! - [`layout`] - Page layout on Taffy and text height estimates
//! - [`pipeline`] - Blueprint, static markup and page mounting
//! - [`content`] - The portfolio content record
//! - [`config`] - Motion tuning loaded from TOML

pub mod config;
pub mod content;
pub mod error;
pub mod host;
pub mod layout;
pub mod pipeline;
pub mod primitives;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{MotionConfig, RevealConfig};
pub use content::PortfolioContent;
pub use error::{ConfigError, ContentError, FolioError, FolioResult, LayoutError};

pub use host::{DocumentHost, Facilities, Host, SharedHost, SimulatedHost};

pub use layout::{layout_page, LayoutBlock, PageLayout, PlacedBlock, TextMetrics};

pub use pipeline::{mount_page, page_blueprint, render_markup, BlockRole, PageHandle};

pub use primitives::{
    animated_card, animated_section, feature_card, magnetic_button, navbar, tilt_card, Mounted, Navbar,
    ParticleSpec, SparkleParams,
};

pub use state::{
    // Reveal
    RevealOptions, RevealTrigger,
    // Follow
    FollowController, FollowKind, MagneticParams, TiltParams,
    // Scroll spy
    ScrollNavState, ScrollSpy, ScrollSpyConfig,
};
