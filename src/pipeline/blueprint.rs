//! Page blueprint - the block tree of the portfolio page.
//!
//! Turns the content record into a [`LayoutBlock`] tree tagged with
//! [`BlockRole`]s. Heights of text blocks are estimated from the content;
//! grids collapse to fewer columns on narrow viewports.

use crate::content::PortfolioContent;
use crate::layout::{text_advance, text_height_px, LayoutBlock, TextMetrics};
use crate::types::Insets;

/// Height of the fixed navigation bar.
pub const NAVBAR_HEIGHT_PX: f64 = 72.0;

const CONTAINER_MAX_PX: f64 = 1200.0;
const CONTAINER_MIN_GUTTER_PX: f64 = 24.0;
const SECTION_PADDING_PX: f64 = 100.0;
const GRID_GAP_PX: f64 = 24.0;
const CARD_PADDING_PX: f64 = 32.0;
const BUTTON_HEIGHT_PX: f64 = 52.0;
const TAG_HEIGHT_PX: f64 = 34.0;
const TAG_GAP_PX: f64 = 8.0;
const TAG_PADDING_PX: f64 = 28.0;

/// What a block is on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockRole {
    Page,
    Hero,
    HeroText,
    HeroButtons,
    HeroButton(usize),
    HeroStats,
    /// Anchored content section.
    Section(String),
    SectionHeader,
    Grid,
    AboutCard,
    /// Tilt wrapper around the skill card with the same index.
    SkillTilt(usize),
    SkillCard(usize),
    ProjectCard(usize),
    ExperienceCard(usize),
    ContactMethod(usize),
    ContactForm,
    FormFields,
    SendButton,
    Footer,
}

impl BlockRole {
    /// Anchor id, for sections.
    pub fn anchor(&self) -> Option<&str> {
        match self {
            BlockRole::Section(id) => Some(id.as_str()),
            _ => None,
        }
    }
}

// =============================================================================
// Sizing helpers
// =============================================================================

/// Horizontal gutter that centers a max-width container.
fn gutter(viewport_width: f64) -> f64 {
    ((viewport_width - CONTAINER_MAX_PX) / 2.0).max(CONTAINER_MIN_GUTTER_PX)
}

/// Columns for a grid that shows `max` columns on wide screens.
pub fn grid_columns(viewport_width: f64, max: usize) -> usize {
    let columns = if viewport_width >= 1024.0 {
        max
    } else if viewport_width >= 640.0 {
        max.min(2)
    } else {
        1
    };
    columns.max(1)
}

/// Width of each cell of a grid spanning `width`.
fn cell_width(width: f64, columns: usize) -> f64 {
    let columns = columns.max(1);
    ((width - GRID_GAP_PX * (columns - 1) as f64) / columns as f64).max(0.0).floor()
}

/// Height of a wrapped row of tags inside `width`.
fn tags_height(tags: &[String], width: f64, metrics: &TextMetrics) -> f64 {
    if tags.is_empty() {
        return 0.0;
    }
    let mut rows = 1.0;
    let mut line = 0.0;
    for tag in tags {
        let tag_width = text_advance(tag) as f64 * metrics.glyph_width_px * 0.8 + TAG_PADDING_PX;
        if line > 0.0 && line + TAG_GAP_PX + tag_width > width {
            rows += 1.0;
            line = tag_width;
        } else {
            line += if line > 0.0 { TAG_GAP_PX } else { 0.0 } + tag_width;
        }
    }
    rows * TAG_HEIGHT_PX + (rows - 1.0) * TAG_GAP_PX
}

fn section_header(title: &str, subtitle: Option<&str>, width: f64) -> LayoutBlock<BlockRole> {
    let body = TextMetrics::body();
    let heading = TextMetrics::heading();
    let mut height = 32.0 + 16.0 + text_height_px(title, width, &heading) + 48.0;
    if let Some(subtitle) = subtitle {
        height += 16.0 + text_height_px(subtitle, width, &body);
    }
    LayoutBlock::leaf(BlockRole::SectionHeader, height)
}

fn section(id: &str, viewport_width: f64, children: Vec<LayoutBlock<BlockRole>>) -> LayoutBlock<BlockRole> {
    let gutter = gutter(viewport_width);
    LayoutBlock::column(BlockRole::Section(id.to_string()), children)
        .with_padding(Insets::new(SECTION_PADDING_PX, gutter, SECTION_PADDING_PX, gutter))
}

fn grid(columns: usize, children: Vec<LayoutBlock<BlockRole>>) -> LayoutBlock<BlockRole> {
    LayoutBlock::grid(BlockRole::Grid, columns, children).with_gap(GRID_GAP_PX)
}

// =============================================================================
// Sections
// =============================================================================

fn hero(content: &PortfolioContent, width: f64, inner: f64) -> LayoutBlock<BlockRole> {
    let body = TextMetrics::body();
    let heading = TextMetrics::heading();
    let hero = &content.hero;

    let text_height = text_height_px(&hero.headline, inner, &heading)
        + 24.0
        + 40.0
        + 24.0
        + text_height_px(&hero.description, inner.min(720.0), &body);

    let buttons = hero
        .cta_buttons
        .iter()
        .enumerate()
        .map(|(i, _)| LayoutBlock::leaf(BlockRole::HeroButton(i), BUTTON_HEIGHT_PX))
        .collect::<Vec<_>>();
    let button_columns = buttons.len().max(1);

    let stat_columns = grid_columns(width, hero.stats.len().max(1));
    let stat_rows = hero.stats.len().div_ceil(stat_columns).max(1);
    let stats_height = stat_rows as f64 * 80.0 + (stat_rows - 1) as f64 * GRID_GAP_PX;

    let gutter = gutter(width);
    LayoutBlock::column(
        BlockRole::Hero,
        vec![
            LayoutBlock::leaf(BlockRole::HeroText, text_height),
            LayoutBlock::grid(BlockRole::HeroButtons, button_columns, buttons).with_gap(16.0),
            LayoutBlock::leaf(BlockRole::HeroStats, stats_height),
        ],
    )
    .with_padding(Insets::new(NAVBAR_HEIGHT_PX + 80.0, gutter, 80.0, gutter))
    .with_gap(40.0)
}

fn about(content: &PortfolioContent, width: f64, inner: f64) -> LayoutBlock<BlockRole> {
    let about = &content.about;
    let card_height = text_height_px(&about.content, inner - 2.0 * CARD_PADDING_PX, &TextMetrics::body())
        + 2.0 * CARD_PADDING_PX;
    section(
        "about",
        width,
        vec![
            section_header(&about.title, Some(about.description.as_str()), inner),
            LayoutBlock::leaf(BlockRole::AboutCard, card_height),
        ],
    )
}

fn skills(content: &PortfolioContent, width: f64, inner: f64) -> LayoutBlock<BlockRole> {
    let body = TextMetrics::body();
    let columns = grid_columns(width, 3);
    let text_width = cell_width(inner, columns) - 2.0 * CARD_PADDING_PX;

    // Grid rows stretch to their tallest card; give every card that height
    // so each tilt wrapper and its card share one box.
    let height = content
        .skills
        .categories
        .iter()
        .map(|category| {
            body.line_height_px + 16.0 + tags_height(&category.skills, text_width, &body) + 2.0 * CARD_PADDING_PX
        })
        .fold(0.0, f64::max);

    let cards = (0..content.skills.categories.len())
        .map(|i| {
            LayoutBlock::column(
                BlockRole::SkillTilt(i),
                vec![LayoutBlock::leaf(BlockRole::SkillCard(i), height)],
            )
        })
        .collect();

    section(
        "skills",
        width,
        vec![section_header(&content.skills.title, None, inner), grid(columns, cards)],
    )
}

fn projects(content: &PortfolioContent, width: f64, inner: f64) -> LayoutBlock<BlockRole> {
    let body = TextMetrics::body();
    let title = TextMetrics {
        glyph_width_px: 11.0,
        line_height_px: 32.0,
    };
    let columns = grid_columns(width, 2);
    let text_width = cell_width(inner, columns) - 2.0 * CARD_PADDING_PX;

    let cards = content
        .projects
        .items
        .iter()
        .enumerate()
        .map(|(i, project)| {
            let height = 180.0
                + 2.0 * CARD_PADDING_PX
                + text_height_px(&project.title, text_width, &title)
                + 12.0
                + text_height_px(&project.description, text_width, &body)
                + 20.0
                + tags_height(&project.tags, text_width, &body)
                + 20.0
                + 40.0;
            LayoutBlock::leaf(BlockRole::ProjectCard(i), height)
        })
        .collect();

    section(
        "projects",
        width,
        vec![section_header(&content.projects.title, None, inner), grid(columns, cards)],
    )
}

fn experience(content: &PortfolioContent, width: f64, inner: f64) -> LayoutBlock<BlockRole> {
    let body = TextMetrics::body();
    let text_width = inner - 2.0 * CARD_PADDING_PX;
    let items = content
        .experience
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let height = 56.0 + 16.0 + text_height_px(&item.description, text_width, &body) + 2.0 * CARD_PADDING_PX;
            LayoutBlock::leaf(BlockRole::ExperienceCard(i), height)
        })
        .collect();

    section(
        "experience",
        width,
        vec![
            section_header(&content.experience.title, None, inner),
            LayoutBlock::column(BlockRole::Grid, items).with_gap(GRID_GAP_PX),
        ],
    )
}

fn contact(content: &PortfolioContent, width: f64, inner: f64) -> LayoutBlock<BlockRole> {
    let contact = &content.contact;
    let methods = contact
        .methods
        .iter()
        .enumerate()
        .map(|(i, _)| LayoutBlock::leaf(BlockRole::ContactMethod(i), 150.0))
        .collect();

    // Name, email and message fields above the send button.
    let form = LayoutBlock::column(
        BlockRole::ContactForm,
        vec![
            LayoutBlock::leaf(BlockRole::FormFields, 80.0 + 20.0 + 80.0 + 20.0 + 160.0),
            LayoutBlock::leaf(BlockRole::SendButton, BUTTON_HEIGHT_PX),
        ],
    )
    .with_padding(Insets::all(CARD_PADDING_PX))
    .with_gap(20.0);

    section(
        "contact",
        width,
        vec![
            section_header(&contact.title, Some(contact.description.as_str()), inner),
            grid(grid_columns(width, 3), methods).with_padding(Insets::bottom(60.0)),
            form,
        ],
    )
}

// =============================================================================
// Page
// =============================================================================

/// Block tree of the whole page (navigation bar excluded; it is fixed).
pub fn page_blueprint(content: &PortfolioContent, viewport_width: f64) -> LayoutBlock<BlockRole> {
    let inner = (viewport_width - 2.0 * gutter(viewport_width)).max(0.0);

    let children = vec![
        hero(content, viewport_width, inner),
        about(content, viewport_width, inner),
        skills(content, viewport_width, inner),
        projects(content, viewport_width, inner),
        experience(content, viewport_width, inner),
        contact(content, viewport_width, inner),
        LayoutBlock::leaf(BlockRole::Footer, 280.0),
    ];
    LayoutBlock::column(BlockRole::Page, children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout_page;
    use crate::state::NAV_SECTIONS;

    #[test]
    fn test_grid_columns_collapse() {
        assert_eq!(grid_columns(1280.0, 3), 3);
        assert_eq!(grid_columns(800.0, 3), 2);
        assert_eq!(grid_columns(400.0, 3), 1);
        assert_eq!(grid_columns(1280.0, 0), 1);
    }

    #[test]
    fn test_sections_in_nav_order() {
        let content = PortfolioContent::placeholder();
        let layout = layout_page(1280.0, &page_blueprint(&content, 1280.0)).unwrap();

        let anchors: Vec<_> = layout.blocks.iter().filter_map(|b| b.payload.anchor()).collect();
        assert_eq!(anchors, NAV_SECTIONS.to_vec());

        // Sections stack without overlap.
        let tops: Vec<_> = layout
            .blocks
            .iter()
            .filter(|b| b.payload.anchor().is_some())
            .map(|b| (b.rect.top, b.rect.bottom()))
            .collect();
        for pair in tops.windows(2) {
            assert!(pair[0].1 <= pair[1].0);
        }
    }

    #[test]
    fn test_one_block_per_content_item() {
        let content = PortfolioContent::placeholder();
        let layout = layout_page(1280.0, &page_blueprint(&content, 1280.0)).unwrap();
        let count = |f: fn(&BlockRole) -> bool| layout.blocks.iter().filter(|b| f(&b.payload)).count();

        assert_eq!(count(|r| matches!(r, BlockRole::SkillCard(_))), content.skills.categories.len());
        assert_eq!(count(|r| matches!(r, BlockRole::SkillTilt(_))), content.skills.categories.len());
        assert_eq!(count(|r| matches!(r, BlockRole::ProjectCard(_))), content.projects.items.len());
        assert_eq!(count(|r| matches!(r, BlockRole::ExperienceCard(_))), content.experience.items.len());
        assert_eq!(count(|r| matches!(r, BlockRole::ContactMethod(_))), content.contact.methods.len());
        assert_eq!(count(|r| matches!(r, BlockRole::SendButton)), 1);
    }

    #[test]
    fn test_tilt_wrapper_matches_card() {
        let content = PortfolioContent::placeholder();
        let layout = layout_page(1280.0, &page_blueprint(&content, 1280.0)).unwrap();
        let tilt = layout.find(|r| *r == BlockRole::SkillTilt(0)).unwrap();
        let card = layout.find(|r| *r == BlockRole::SkillCard(0)).unwrap();
        assert_eq!(tilt.rect, card.rect);
    }

    #[test]
    fn test_container_is_centered() {
        let content = PortfolioContent::placeholder();
        let layout = layout_page(1600.0, &page_blueprint(&content, 1600.0)).unwrap();
        let card = layout.find(|r| *r == BlockRole::AboutCard).unwrap();
        assert_eq!(card.rect.left, 200.0);
        assert_eq!(card.rect.width, 1200.0);
    }
}
