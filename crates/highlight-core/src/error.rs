//! Error types for the highlight engine
//!
//! Degenerate input never ends up here: empty series, zero variance and
//! misaligned lengths all degrade to "no events". Only contract violations
//! at the caller-facing boundary and configuration problems are errors.

use std::path::PathBuf;

/// Result type alias for highlight operations
pub type Result<T> = std::result::Result<T, HighlightError>;

#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    /// The caller handed over a feature series that breaks its contract
    #[error("invalid input: {field} {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    /// Configuration values out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read config file '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HighlightError {
    pub(crate) fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
