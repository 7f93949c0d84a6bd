//! Motion configuration.
//!
//! Every tunable of the animation layer in one record. All fields default to
//! the values the page ships with, so a config file only needs the keys it
//! changes:
//!
//! ```toml
//! [tilt]
//! easing = 0.2
//!
//! [reveal.card]
//! jitter_ms = 0.0
//!
//! [scroll_spy]
//! clear_when_none = true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::primitives::SparkleParams;
use crate::state::{MagneticParams, RevealOptions, ScrollSpyConfig, TiltParams};
use crate::types::Insets;

// =============================================================================
// REVEAL PRESETS
// =============================================================================

/// Partial [`RevealOptions`]; unset keys fall back to a preset rather than to
/// `RevealOptions::default()`.
#[derive(Debug, Default, Deserialize)]
struct RevealPatch {
    threshold: Option<f64>,
    root_margin: Option<Insets>,
    delay_ms: Option<f64>,
    jitter_ms: Option<f64>,
    class_name: Option<String>,
}

impl RevealPatch {
    fn apply(self, base: RevealOptions) -> RevealOptions {
        RevealOptions {
            threshold: self.threshold.unwrap_or(base.threshold),
            root_margin: self.root_margin.unwrap_or(base.root_margin),
            delay_ms: self.delay_ms.unwrap_or(base.delay_ms),
            jitter_ms: self.jitter_ms.unwrap_or(base.jitter_ms),
            class_name: self.class_name.unwrap_or(base.class_name),
        }
    }
}

fn section_preset<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RevealOptions, D::Error> {
    Ok(RevealPatch::deserialize(deserializer)?.apply(RevealOptions::section()))
}

fn card_preset<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RevealOptions, D::Error> {
    Ok(RevealPatch::deserialize(deserializer)?.apply(RevealOptions::card()))
}

fn feature_preset<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RevealOptions, D::Error> {
    Ok(RevealPatch::deserialize(deserializer)?.apply(RevealOptions::feature()))
}

/// Reveal presets per block kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    #[serde(deserialize_with = "section_preset")]
    pub section: RevealOptions,
    #[serde(deserialize_with = "card_preset")]
    pub card: RevealOptions,
    #[serde(deserialize_with = "feature_preset")]
    pub feature: RevealOptions,
    /// Extra delay per card index within a grid.
    pub stagger_ms: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            section: RevealOptions::section(),
            card: RevealOptions::card(),
            feature: RevealOptions::feature(),
            stagger_ms: 100.0,
        }
    }
}

// =============================================================================
// MOTION CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub reveal: RevealConfig,
    pub tilt: TiltParams,
    pub magnetic: MagneticParams,
    pub sparkles: SparkleParams,
    pub scroll_spy: ScrollSpyConfig,
}

impl MotionConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        debug!(path = %path.display(), "motion config loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_is_default() {
        assert_eq!(MotionConfig::from_toml_str("").unwrap(), MotionConfig::default());
    }

    #[test]
    fn test_defaults_match_page() {
        let config = MotionConfig::default();
        assert_eq!(config.reveal.section.threshold, 0.05);
        assert_eq!(config.reveal.card.threshold, 0.15);
        assert_eq!(config.reveal.feature.threshold, 0.2);
        assert_eq!(config.tilt.easing, 0.15);
        assert_eq!(config.magnetic.radius, 80.0);
        assert_eq!(config.sparkles.count, 40);
        assert_eq!(config.scroll_spy.reference_line_px, 100.0);
    }

    #[test]
    fn test_partial_override() {
        let config = MotionConfig::from_toml_str(
            r#"
            [tilt]
            easing = 0.2

            [reveal.card]
            jitter_ms = 0.0

            [scroll_spy]
            clear_when_none = true
            sections = ["about", "contact"]
            "#,
        )
        .unwrap();

        assert_eq!(config.tilt.easing, 0.2);
        assert_eq!(config.tilt.divisor_x, 12.0);
        assert_eq!(config.reveal.card.jitter_ms, 0.0);
        assert_eq!(config.reveal.card.threshold, 0.15);
        assert_eq!(config.reveal.card.class_name, "card-animate-in");
        assert_eq!(config.reveal.feature, RevealOptions::feature());
        assert!(config.scroll_spy.clear_when_none);
        assert_eq!(config.scroll_spy.sections, vec!["about", "contact"]);
    }

    #[test]
    fn test_invalid_toml() {
        let err = MotionConfig::from_toml_str("[tilt\neasing = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = MotionConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
