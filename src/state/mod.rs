//! State Module - Per-element animation controllers
//!
//! Each controller owns its own state and reaches the page only through a
//! [`Host`](crate::host::Host):
//!
//! - **Reveal** - One-shot class toggle when an element scrolls into view
//! - **Follow** - Eased tilt / magnetic transforms driven by the pointer
//! - **Scroll Spy** - "Scrolled" flag and the active navigation section

pub mod follow;
pub mod reveal;
pub mod scroll_spy;

pub use follow::*;
pub use reveal::*;
pub use scroll_spy::*;
