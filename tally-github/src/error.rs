//! Error types for GitHub operations

use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during GitHub operations
///
/// Errors that come back from the API display as the message GitHub sent,
/// so a failed step reports what the forge said and nothing else.
#[derive(Error, Debug)]
pub enum Error {
    /// GitHub API error
    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: octocrab::Error,
    },

    /// Authentication error
    #[error("{0}")]
    Auth(String),

    /// Rate limit exceeded
    #[error("{0}")]
    RateLimited(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Classify an octocrab error by the message GitHub sent back
    pub(crate) fn from_api(err: octocrab::Error) -> Self {
        let message = describe(&err);

        if !matches!(err, octocrab::Error::GitHub { .. }) {
            return Error::Api {
                message,
                source: err,
            };
        }

        let lower = message.to_lowercase();
        if lower.contains("rate limit") {
            Error::RateLimited(message)
        } else if lower.contains("bad credentials") {
            Error::Auth(message)
        } else {
            Error::Api {
                message,
                source: err,
            }
        }
    }
}

/// Human-readable text for an octocrab error
///
/// octocrab's own `Display` appends a captured backtrace, which has no place
/// in a step's failure message.
pub(crate) fn describe(err: &octocrab::Error) -> String {
    if let octocrab::Error::GitHub { source, .. } = err {
        return source.message.clone();
    }

    if let Some(inner) = std::error::Error::source(err) {
        return inner.to_string();
    }

    strip_backtrace(&err.to_string())
}

fn strip_backtrace(text: &str) -> String {
    match text.split_once("\nFound at") {
        Some((head, _)) => head.trim_end().to_string(),
        None => text.to_string(),
    }
}
