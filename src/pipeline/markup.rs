//! Static markup - the server-rendered page skeleton.
//!
//! Produces the HTML the animation layer attaches to: section anchors, the
//! base classes each primitive expects, and inline sparkle CSS variables.
//! Output is a pure function of the content and config, so two renders of
//! the same inputs are byte-identical.

use std::fmt::Write;

use crate::config::MotionConfig;
use crate::content::PortfolioContent;
use crate::primitives::{
    generate_all_with, nav_links, ANIMATED_CARD_CLASS, ANIMATED_SECTION_CLASS, FEATURE_CARD_CLASS,
    FLOATING_GRADIENTS_CLASS, FLOATING_GRADIENT_BLOBS, MAGNETIC_BUTTON_CLASS, NAVBAR_CLASS, NAV_CTA_HREF,
    NAV_CTA_LABEL, NAV_LINK_CLASS, SPARKLES_CLASS, SPARKLE_CLASS, TILT_CARD_CLASS,
};
use crate::state::ScrollNavState;

// =============================================================================
// Writer
// =============================================================================

/// Escape text for element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Minimal indented HTML writer.
#[derive(Debug, Default)]
pub struct Markup {
    out: String,
    depth: usize,
}

impl Markup {
    pub fn new() -> Self {
        Self::default()
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
    }

    fn tag(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.indent();
        self.out.push('<');
        self.out.push_str(tag);
        for (name, value) in attrs {
            // Writing to a String cannot fail.
            let _ = write!(self.out, " {name}=\"{}\"", escape_html(value));
        }
        self.out.push('>');
    }

    /// Open an element; children follow on their own lines.
    pub fn open(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.tag(tag, attrs);
        self.out.push('\n');
        self.depth += 1;
    }

    pub fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        let _ = writeln!(self.out, "</{tag}>");
    }

    /// Element with escaped text content on one line.
    pub fn text(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) {
        self.tag(tag, attrs);
        let _ = writeln!(self.out, "{}</{tag}>", escape_html(text));
    }

    /// Element with no content.
    pub fn empty(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.tag(tag, attrs);
        let _ = writeln!(self.out, "</{tag}>");
    }

    /// Void element such as `input`; no closing tag.
    pub fn void(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.tag(tag, attrs);
        self.out.push('\n');
    }

    pub fn finish(self) -> String {
        self.out
    }
}

// =============================================================================
// Fragments
// =============================================================================

fn sparkles(m: &mut Markup, config: &MotionConfig) {
    m.open("div", &[("class", SPARKLES_CLASS), ("aria-hidden", "true")]);
    for particle in generate_all_with(config.sparkles.count, &config.sparkles) {
        m.empty("div", &[("class", SPARKLE_CLASS), ("style", particle.style().as_str())]);
    }
    m.close("div");
}

fn floating_gradients(m: &mut Markup) {
    m.open("div", &[("class", FLOATING_GRADIENTS_CLASS), ("aria-hidden", "true")]);
    for blob in FLOATING_GRADIENT_BLOBS {
        m.empty("div", &[("class", format!("gradient-blob {blob}").as_str())]);
    }
    m.close("div");
}

fn navbar(m: &mut Markup, config: &MotionConfig) {
    m.open("nav", &[("class", NAVBAR_CLASS)]);
    m.open("div", &[("class", "container nav-container")]);
    m.text("a", &[("href", "/"), ("class", "logo")], "<Dev />");
    m.open("div", &[("class", "nav-links")]);
    for link in nav_links(&config.scroll_spy, &ScrollNavState::default()) {
        m.text("a", &[("href", link.href.as_str()), ("class", NAV_LINK_CLASS)], &link.label);
    }
    m.close("div");
    m.open("div", &[("class", "nav-cta")]);
    m.text("a", &[("href", NAV_CTA_HREF), ("class", "btn btn-primary")], NAV_CTA_LABEL);
    m.close("div");
    m.close("div");
    m.close("nav");
}

fn section_open(m: &mut Markup, id: &str, class: &str) {
    m.open("section", &[("id", id), ("class", format!("{ANIMATED_SECTION_CLASS} {class}").as_str())]);
    m.open("div", &[("class", "container")]);
}

fn section_close(m: &mut Markup) {
    m.close("div");
    m.close("section");
}

fn section_header(m: &mut Markup, tag: &str, title: &str, subtitle: Option<&str>) {
    m.open("div", &[("class", "section-header")]);
    m.text("span", &[("class", "section-tag animate-tag")], tag);
    m.text("h2", &[], title);
    if let Some(subtitle) = subtitle {
        m.text("p", &[("class", "section-subtitle")], subtitle);
    }
    m.close("div");
}

fn card_class(extra: &str) -> String {
    if extra.is_empty() {
        ANIMATED_CARD_CLASS.to_string()
    } else {
        format!("{ANIMATED_CARD_CLASS} {extra}")
    }
}

fn hero(m: &mut Markup, content: &PortfolioContent) {
    let hero = &content.hero;
    m.open("section", &[("class", "hero")]);
    floating_gradients(m);
    m.open("div", &[("class", "container hero-content")]);
    m.text("h1", &[], &hero.headline);
    m.text("div", &[("class", "hero-badge")], &hero.badge);
    m.text("p", &[], &hero.description);

    m.open("div", &[("class", "hero-buttons")]);
    for button in &hero.cta_buttons {
        let class = if button.is_secondary() { "btn btn-secondary" } else { "btn btn-primary" };
        m.text("a", &[("href", button.href.as_str()), ("class", class)], &button.text);
    }
    m.close("div");

    m.open("div", &[("class", "hero-stats")]);
    for stat in &hero.stats {
        m.open("div", &[("class", "stat-item")]);
        m.text("span", &[("class", "stat-number")], &stat.number);
        m.text("span", &[("class", "stat-label")], &stat.label);
        m.close("div");
    }
    m.close("div");

    m.close("div");
    m.close("section");
}

fn about(m: &mut Markup, content: &PortfolioContent) {
    let about = &content.about;
    section_open(m, "about", "about-section");
    section_header(m, &about.title, "Who I Am", Some(about.description.as_str()));
    m.open("div", &[("class", card_class("about-content").as_str())]);
    m.text("p", &[], &about.content);
    m.close("div");
    section_close(m);
}

fn skills(m: &mut Markup, content: &PortfolioContent) {
    section_open(m, "skills", "skills-section");
    section_header(m, "My Stack", &content.skills.title, None);
    m.open("div", &[("class", "skills-grid")]);
    for category in &content.skills.categories {
        m.open("div", &[("class", format!("{TILT_CARD_CLASS} skill-card-wrapper").as_str())]);
        m.open("div", &[("class", card_class("skill-card").as_str())]);
        m.text("div", &[("class", "skill-category")], &category.name);
        m.open("div", &[("class", "skill-items")]);
        for skill in &category.skills {
            m.text("span", &[("class", "skill-tag")], skill);
        }
        m.close("div");
        m.close("div");
        m.close("div");
    }
    m.close("div");
    section_close(m);
}

fn projects(m: &mut Markup, content: &PortfolioContent) {
    section_open(m, "projects", "projects-section");
    section_header(m, "Portfolio", &content.projects.title, None);
    m.open("div", &[("class", "projects-grid")]);
    for project in &content.projects.items {
        m.open("div", &[("class", format!("{FEATURE_CARD_CLASS} project-card-wrapper").as_str())]);
        m.open("div", &[("class", "project-card")]);
        m.text("div", &[("class", "project-image")], &project.emoji);
        m.open("div", &[("class", "project-content")]);
        m.text("h3", &[("class", "project-title")], &project.title);
        m.text("p", &[("class", "project-description")], &project.description);
        m.open("div", &[("class", "project-tags")]);
        for tag in &project.tags {
            m.text("span", &[("class", "project-tag")], tag);
        }
        m.close("div");
        m.open("div", &[("class", "project-links")]);
        for link in &project.links {
            m.text("a", &[("href", link.href.as_str()), ("class", "project-link")], &link.text);
        }
        m.close("div");
        m.close("div");
        m.close("div");
        m.close("div");
    }
    m.close("div");
    section_close(m);
}

fn experience(m: &mut Markup, content: &PortfolioContent) {
    section_open(m, "experience", "experience-section");
    section_header(m, "Career", &content.experience.title, None);
    m.open("div", &[("class", "experience-timeline")]);
    for item in &content.experience.items {
        m.open("div", &[("class", card_class("experience-item").as_str())]);
        m.open("div", &[("class", "experience-header")]);
        m.text("h3", &[("class", "experience-title")], &item.title);
        m.text("span", &[("class", "experience-company")], &item.company);
        m.text("span", &[("class", "experience-date")], &item.duration);
        m.close("div");
        m.text("p", &[("class", "experience-description")], &item.description);
        m.close("div");
    }
    m.close("div");
    section_close(m);
}

fn contact(m: &mut Markup, content: &PortfolioContent) {
    let contact = &content.contact;
    section_open(m, "contact", "contact-section");
    section_header(m, "Get in Touch", &contact.title, Some(contact.description.as_str()));

    m.open("div", &[("class", "contact-methods")]);
    for method in &contact.methods {
        m.open("div", &[("class", card_class("contact-method").as_str())]);
        m.text("div", &[("class", "contact-icon")], &method.icon);
        m.text("h3", &[], &method.kind);
        m.text("p", &[], &method.value);
        m.close("div");
    }
    m.close("div");

    m.open("div", &[("class", card_class("contact-form").as_str())]);
    m.open("form", &[]);
    for (label, kind) in [("Name", "text"), ("Email", "email")] {
        m.open("div", &[("class", "form-group")]);
        m.text("label", &[("class", "form-label")], label);
        m.void("input", &[("type", kind), ("class", "form-input"), ("required", "")]);
        m.close("div");
    }
    m.open("div", &[("class", "form-group")]);
    m.text("label", &[("class", "form-label")], "Message");
    m.empty("textarea", &[("class", "form-textarea"), ("required", "")]);
    m.close("div");
    m.text("button", &[("type", "submit"), ("class", MAGNETIC_BUTTON_CLASS)], "Send Message");
    m.close("form");
    m.close("div");

    section_close(m);
}

fn footer(m: &mut Markup, content: &PortfolioContent) {
    m.open("footer", &[("class", "footer")]);
    m.open("div", &[("class", "container")]);

    m.open("div", &[("class", "footer-links")]);
    for (href, label) in [("#about", "About"), ("#projects", "Projects"), ("#experience", "Experience"), ("#contact", "Contact")] {
        m.text("a", &[("href", href), ("class", "footer-link")], label);
    }
    m.close("div");

    m.open("div", &[("class", "social-links")]);
    for link in &content.social {
        m.text(
            "a",
            &[
                ("href", link.url.as_str()),
                ("class", "social-link"),
                ("target", "_blank"),
                ("rel", "noopener noreferrer"),
                ("title", link.name.as_str()),
            ],
            &link.icon,
        );
    }
    m.close("div");

    m.text("p", &[("class", "footer-bottom")], &format!("© {}. All rights reserved.", content.personal.name));
    m.close("div");
    m.close("footer");
}

// =============================================================================
// Page
// =============================================================================

/// Render the full page body.
pub fn render_markup(content: &PortfolioContent, config: &MotionConfig) -> String {
    let mut m = Markup::new();
    m.open("main", &[("class", "portfolio")]);
    sparkles(&mut m, config);
    navbar(&mut m, config);
    hero(&mut m, content);
    about(&mut m, content);
    skills(&mut m, content);
    projects(&mut m, content);
    experience(&mut m, content);
    contact(&mut m, content);
    footer(&mut m, content);
    m.close("main");
    m.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render() -> String {
        render_markup(&PortfolioContent::placeholder(), &MotionConfig::default())
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_markup_writer_nesting() {
        let mut m = Markup::new();
        m.open("div", &[("class", "a")]);
        m.text("p", &[], "x < y");
        m.close("div");
        assert_eq!(m.finish(), "<div class=\"a\">\n  <p>x &lt; y</p>\n</div>\n");
    }

    #[test]
    fn test_render_is_deterministic() {
        assert_eq!(render(), render());
    }

    #[test]
    fn test_section_anchors_present() {
        let html = render();
        for id in ["about", "skills", "projects", "experience", "contact"] {
            assert!(html.contains(&format!("<section id=\"{id}\"")), "missing section {id}");
            assert!(html.contains(&format!("href=\"#{id}\"")), "missing nav link {id}");
        }
    }

    #[test]
    fn test_sparkle_variables() {
        let html = render();
        assert_eq!(html.matches("class=\"sparkle\"").count(), 40);
        assert!(html.contains("--sparkle-delay: 0s; --sparkle-x: 5%; --sparkle-y: 10%; --sparkle-scale: 0.4"));
    }

    #[test]
    fn test_sparkle_count_follows_config() {
        let mut config = MotionConfig::default();
        config.sparkles.count = 12;
        let html = render_markup(&PortfolioContent::placeholder(), &config);
        assert_eq!(html.matches("class=\"sparkle\"").count(), 12);
    }

    #[test]
    fn test_primitive_classes() {
        let content = PortfolioContent::placeholder();
        let html = render();
        assert_eq!(
            html.matches(&format!("class=\"{TILT_CARD_CLASS} ")).count(),
            content.skills.categories.len()
        );
        assert_eq!(
            html.matches(&format!("class=\"{FEATURE_CARD_CLASS} ")).count(),
            content.projects.items.len()
        );
        assert_eq!(html.matches(MAGNETIC_BUTTON_CLASS).count(), 1);
        assert_eq!(html.matches("gradient-blob").count(), 3);
    }

    #[test]
    fn test_content_is_escaped() {
        let mut content = PortfolioContent::placeholder();
        content.hero.headline = "<script>alert(1)</script>".to_string();
        let html = render_markup(&content, &MotionConfig::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
