//! Content Provider - the portfolio record rendered by the page.
//!
//! The record is read once at render time and never mutated. Field names
//! serialize in camelCase so an existing JSON export of the page content
//! loads unchanged.
//!
//! # API
//!
//! - `PortfolioContent::placeholder()` - Built-in record (also `Default`)
//! - `PortfolioContent::from_json_str(json)` - Parse a record
//! - `PortfolioContent::load(path)` - Read and parse a JSON file

mod placeholder;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ContentError;

// =============================================================================
// RECORD
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioContent {
    pub personal: Personal,
    pub hero: Hero,
    pub about: About,
    pub skills: Skills,
    pub projects: Projects,
    pub experience: Experience,
    pub contact: Contact,
    #[serde(default)]
    pub social: Vec<SocialLink>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Personal {
    pub name: String,
    pub title: String,
    pub subtitle: String,
    pub bio: String,
    pub email: String,
    pub phone: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hero {
    pub badge: String,
    pub headline: String,
    pub description: String,
    pub cta_buttons: Vec<CtaButton>,
    pub stats: Vec<Stat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaButton {
    pub text: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl CtaButton {
    pub fn is_secondary(&self) -> bool {
        self.variant.as_deref() == Some("secondary")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub number: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct About {
    pub title: String,
    pub description: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub title: String,
    pub categories: Vec<SkillCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Projects {
    pub title: String,
    pub items: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u32,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub title: String,
    pub items: Vec<ExperienceItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceItem {
    pub id: u32,
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub title: String,
    pub description: String,
    pub methods: Vec<ContactMethod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMethod {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub icon: String,
}

// =============================================================================
// LOADING
// =============================================================================

impl PortfolioContent {
    /// Built-in sample record.
    pub fn placeholder() -> Self {
        placeholder::content()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = Self::from_json_str(&json)?;
        debug!(path = %path.display(), projects = content.projects.items.len(), "content loaded");
        Ok(content)
    }

    pub fn to_json_string(&self) -> Result<String, ContentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for PortfolioContent {
    fn default() -> Self {
        Self::placeholder()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_has_every_section() {
        let content = PortfolioContent::placeholder();
        assert!(!content.personal.name.is_empty());
        assert!(!content.hero.cta_buttons.is_empty());
        assert!(!content.skills.categories.is_empty());
        assert!(!content.projects.items.is_empty());
        assert!(!content.experience.items.is_empty());
        assert!(!content.contact.methods.is_empty());
        assert!(!content.social.is_empty());
    }

    #[test]
    fn test_json_uses_camel_case_keys() {
        let json = PortfolioContent::placeholder().to_json_string().unwrap();
        assert!(json.contains("\"ctaButtons\""));
        assert!(!json.contains("\"cta_buttons\""));
        assert!(json.contains("\"type\""));
    }

    #[test]
    fn test_json_roundtrip_preserves_record() {
        let content = PortfolioContent::placeholder();
        let json = content.to_json_string().unwrap();
        assert_eq!(PortfolioContent::from_json_str(&json).unwrap(), content);
    }

    #[test]
    fn test_minimal_record_fills_defaults() {
        let json = r##"{
            "personal": { "name": "Sam Example" },
            "hero": { "headline": "Hello", "ctaButtons": [{ "text": "Work", "href": "#projects" }] },
            "about": {},
            "skills": {},
            "projects": {},
            "experience": {},
            "contact": {}
        }"##;
        let content = PortfolioContent::from_json_str(json).unwrap();
        assert_eq!(content.personal.name, "Sam Example");
        assert!(!content.hero.cta_buttons[0].is_secondary());
        assert!(content.social.is_empty());
        assert!(content.projects.items.is_empty());
    }

    #[test]
    fn test_missing_top_level_key_is_an_error() {
        let err = PortfolioContent::from_json_str(r#"{ "personal": {} }"#).unwrap_err();
        assert!(matches!(err, ContentError::Json(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PortfolioContent::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
    }
}
