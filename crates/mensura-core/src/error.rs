//! Error types for the mensura-core library.
//!
//! Extraction itself never fails: a field, date or boundary that cannot be
//! determined is represented as data. These errors only surface at the edges
//! (loading configuration, compiling user-supplied phrases).

use thiserror::Error;

/// Main error type for the mensura library.
#[derive(Error, Debug)]
pub enum MensuraError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A configured phrase or keyword could not be turned into a pattern.
    #[error("invalid pattern for {name}: {source}")]
    Pattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the mensura library.
pub type Result<T> = std::result::Result<T, MensuraError>;
