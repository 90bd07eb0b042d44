//! Error types for bookmerge-core

use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for bookmerge operations
pub type Result<T> = std::result::Result<T, BookmergeError>;

/// Main error type for bookmerge operations
#[derive(Error, Debug)]
pub enum BookmergeError {
    /// A record in the input does not have the documented shape
    #[error("Malformed record #{index} ({title:?}): {reason}")]
    MalformedRecord {
        index: usize,
        title: String,
        reason: String,
    },

    /// The input as a whole is not something we can read records from
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// JSON encoding/decoding errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BookmergeError {
    pub(crate) fn malformed(index: usize, title: &str, reason: impl Into<String>) -> Self {
        BookmergeError::MalformedRecord {
            index,
            title: title.to_string(),
            reason: reason.into(),
        }
    }
}
