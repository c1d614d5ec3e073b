//! Error types for statusbrief-core

use thiserror::Error;

/// Main error type for the statusbrief-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing or invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Tracker responded with a non-success status
    #[error("tracker fetch failed ({status}): {body}")]
    Fetch { status: u16, body: String },

    /// Tracker was unreachable
    #[error("tracker connection error: {0}")]
    Connectivity(String),

    /// Generation backend call failed
    #[error("generation error: {0}")]
    Generation(String),

    /// Email delivery failure
    #[error("delivery error: {0}")]
    Delivery(String),
}

/// Result type alias for statusbrief-core
pub type Result<T> = std::result::Result<T, Error>;
