//! Layout Module - Document-space boxes for page blocks.
//!
//! Uses [Taffy](https://github.com/DioxusLabs/taffy) to resolve the vertical
//! flow of the page:
//!
//! 1. The caller describes the page as a tree of [`LayoutBlock`]s
//! 2. Widths are resolved top-down from the viewport width
//! 3. Taffy computes positions and content heights
//! 4. Positions come back as absolute document-space [`Rect`](crate::types::Rect)s
//!
//! Text-only blocks are sized with the estimates in `text_measure`.
//!
//! # Example
//!
//! ```ignore
//! use spark_folio::layout::{layout_page, LayoutBlock};
//!
//! let root = LayoutBlock::column("page", vec![
//!     LayoutBlock::leaf("hero", 700.0),
//!     LayoutBlock::grid("cards", 3, cards).with_gap(24.0),
//! ]);
//! let layout = layout_page(1280.0, &root)?;
//! ```

mod page;
mod text_measure;

pub use page::*;
pub use text_measure::*;
