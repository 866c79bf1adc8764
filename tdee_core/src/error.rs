//! Error types for the tdee_core library.

use crate::{SelectionKind, Stage};
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for tdee_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A selection did not match any entry of its factor table
    #[error("Invalid {kind} selected: '{selection}'")]
    InvalidSelection {
        kind: SelectionKind,
        selection: String,
    },

    /// A stage was triggered while it is still hidden
    #[error("{0} stage is not available until the previous stage has been calculated")]
    StageUnavailable(Stage),

    /// An input value fell outside its accepted range
    #[error("{field} must be between {min} and {max} (got {value})")]
    InputOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
