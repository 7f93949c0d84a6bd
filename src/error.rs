//! Error types.
//!
//! The animation layer itself never fails: missing elements and missing host
//! facilities degrade silently. Errors only come from the edges that read
//! files or run layout.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a [`MotionConfig`](crate::config::MotionConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failure to load [`PortfolioContent`](crate::content::PortfolioContent).
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("failed to read content {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid content: {0}")]
    Json(#[from] serde_json::Error),
}

/// Page layout failure.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("layout engine error: {0}")]
    Taffy(#[from] taffy::TaffyError),

    #[error("viewport must have a positive width, got {0}")]
    InvalidViewport(f64),
}

/// Umbrella error for page-level operations.
#[derive(Error, Debug)]
pub enum FolioError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

pub type FolioResult<T> = Result<T, FolioError>;
