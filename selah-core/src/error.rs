//! Error types for selah-core

use thiserror::Error;

/// Main error type for the selah-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Cache store error
    #[error("cache store error: {0}")]
    Cache(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Record carries none of the known date fields
    #[error("no date field on {category} record")]
    MissingDate { category: &'static str },

    /// Unknown time range literal at the API boundary
    #[error("invalid time range: {0}")]
    InvalidTimeRange(String),

    /// Narrative-generator service error
    #[error("generator error: {0}")]
    Generator(String),
}

/// Result type alias for selah-core
pub type Result<T> = std::result::Result<T, Error>;
