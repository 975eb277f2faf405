//! Error types for tally

use thiserror::Error;

/// Result type alias for tally operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for tally operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Publishing step outputs failed
    #[error("Failed to write output {name}: {reason}")]
    Output { name: String, reason: String },

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}
