//! Page layout - stack page blocks into document-space boxes.
//!
//! Blocks form a tree. A block either has a fixed height (a leaf) or sizes
//! to its children, which it stacks in a column or wraps into an
//! equal-width grid. Widths flow top-down from the viewport; taffy resolves
//! the vertical flow.

use taffy::{
    AvailableSpace, Dimension, Display, FlexDirection, FlexWrap, LengthPercentage, NodeId,
    Rect as TaffyRect, Size, Style, TaffyTree,
};

use crate::error::LayoutError;
use crate::types::{Insets, Rect};

// =============================================================================
// Blocks
// =============================================================================

/// One node of the page tree, carrying a caller-defined payload.
#[derive(Debug, Clone)]
pub struct LayoutBlock<T> {
    pub payload: T,
    /// Fixed height. `None` sizes to children.
    pub height: Option<f64>,
    /// Grid columns for children; 1 stacks them.
    pub columns: usize,
    pub padding: Insets,
    pub gap: f64,
    pub children: Vec<LayoutBlock<T>>,
}

impl<T> LayoutBlock<T> {
    pub fn leaf(payload: T, height: f64) -> Self {
        Self {
            payload,
            height: Some(height),
            columns: 1,
            padding: Insets::ZERO,
            gap: 0.0,
            children: Vec::new(),
        }
    }

    pub fn column(payload: T, children: Vec<LayoutBlock<T>>) -> Self {
        Self {
            payload,
            height: None,
            columns: 1,
            padding: Insets::ZERO,
            gap: 0.0,
            children,
        }
    }

    pub fn grid(payload: T, columns: usize, children: Vec<LayoutBlock<T>>) -> Self {
        Self {
            columns: columns.max(1),
            ..Self::column(payload, children)
        }
    }

    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }
}

/// A block with its resolved document-space box.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBlock<T> {
    pub payload: T,
    pub rect: Rect,
    /// Nesting depth, root is 0.
    pub depth: usize,
}

/// Resolved page, blocks in tree pre-order.
#[derive(Debug, Clone)]
pub struct PageLayout<T> {
    pub blocks: Vec<PlacedBlock<T>>,
    pub width: f64,
    pub height: f64,
}

impl<T> PageLayout<T> {
    /// First block whose payload matches.
    pub fn find<P>(&self, mut predicate: P) -> Option<&PlacedBlock<T>>
    where
        P: FnMut(&T) -> bool,
    {
        self.blocks.iter().find(|b| predicate(&b.payload))
    }
}

// =============================================================================
// Style
// =============================================================================

fn length(value: f64) -> LengthPercentage {
    LengthPercentage::Length(value as f32)
}

fn build_style<T>(block: &LayoutBlock<T>, width: f64) -> Style {
    let grid = block.columns > 1;
    Style {
        display: Display::Flex,
        flex_direction: if grid { FlexDirection::Row } else { FlexDirection::Column },
        flex_wrap: if grid { FlexWrap::Wrap } else { FlexWrap::NoWrap },
        flex_shrink: 0.0,
        size: Size {
            width: Dimension::Length(width as f32),
            height: match block.height {
                Some(h) => Dimension::Length(h as f32),
                None => Dimension::Auto,
            },
        },
        padding: TaffyRect {
            left: length(block.padding.left),
            right: length(block.padding.right),
            top: length(block.padding.top),
            bottom: length(block.padding.bottom),
        },
        gap: Size {
            width: length(block.gap),
            height: length(block.gap),
        },
        ..Default::default()
    }
}

/// Width of each child of a block that is `width` wide.
fn child_width<T>(block: &LayoutBlock<T>, width: f64) -> f64 {
    let inner = (width - block.padding.left - block.padding.right).max(0.0);
    if block.columns <= 1 {
        return inner;
    }
    let gaps = block.gap * (block.columns - 1) as f64;
    // Floor keeps a full row from wrapping on float error.
    ((inner - gaps) / block.columns as f64).max(0.0).floor()
}

fn build_node<T>(tree: &mut TaffyTree<()>, block: &LayoutBlock<T>, width: f64) -> Result<NodeId, LayoutError> {
    let style = build_style(block, width);
    if block.children.is_empty() {
        return Ok(tree.new_leaf(style)?);
    }

    let child_width = child_width(block, width);
    let children = block
        .children
        .iter()
        .map(|child| build_node(tree, child, child_width))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tree.new_with_children(style, &children)?)
}

fn collect<T: Clone>(
    tree: &TaffyTree<()>,
    block: &LayoutBlock<T>,
    node: NodeId,
    origin: (f64, f64),
    depth: usize,
    out: &mut Vec<PlacedBlock<T>>,
) -> Result<(), LayoutError> {
    let layout = tree.layout(node)?;
    let left = origin.0 + layout.location.x as f64;
    let top = origin.1 + layout.location.y as f64;
    out.push(PlacedBlock {
        payload: block.payload.clone(),
        rect: Rect::new(left, top, layout.size.width as f64, layout.size.height as f64),
        depth,
    });

    let children = tree.children(node)?;
    for (child, child_node) in block.children.iter().zip(children) {
        collect(tree, child, child_node, (left, top), depth + 1, out)?;
    }
    Ok(())
}

// =============================================================================
// Layout
// =============================================================================

/// Lay out a page tree for a viewport width.
pub fn layout_page<T: Clone>(viewport_width: f64, root: &LayoutBlock<T>) -> Result<PageLayout<T>, LayoutError> {
    if !viewport_width.is_finite() || viewport_width <= 0.0 {
        return Err(LayoutError::InvalidViewport(viewport_width));
    }

    let mut tree: TaffyTree<()> = TaffyTree::new();
    let root_node = build_node(&mut tree, root, viewport_width)?;
    tree.compute_layout(
        root_node,
        Size {
            width: AvailableSpace::Definite(viewport_width as f32),
            height: AvailableSpace::MaxContent,
        },
    )?;

    let mut blocks = Vec::new();
    collect(&tree, root, root_node, (0.0, 0.0), 0, &mut blocks)?;
    let height = blocks.first().map(|b| b.rect.height).unwrap_or(0.0);

    Ok(PageLayout {
        blocks,
        width: viewport_width,
        height,
    })
}
