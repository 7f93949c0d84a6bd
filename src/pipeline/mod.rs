//! Page Pipeline
//!
//! Connects the content record to a live host page.
//!
//! # Pipeline Architecture
//!
//! ```text
//! PortfolioContent → page_blueprint → layout_page → host elements → primitives
//!                  ↘ render_markup (static HTML skeleton)
//! ```
//!
//! ## Data Flow
//!
//! 1. **blueprint** - Content becomes a block tree tagged with roles
//! 2. **layout** - Taffy resolves every block to a document-space box
//! 3. **mount** - One host element per block, then the primitive its role calls for
//!
//! [`render_markup`] is the static counterpart: the same page as HTML with
//! the base classes and sparkle variables the animation layer expects.

pub mod blueprint;
pub mod markup;
pub mod mount;

pub use blueprint::{grid_columns, page_blueprint, BlockRole, NAVBAR_HEIGHT_PX};
pub use markup::{escape_html, render_markup, Markup};
pub use mount::{mount_page, PageHandle, NAV_ELEMENT_ID};
