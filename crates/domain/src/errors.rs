//! Error types used throughout the client

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for ArchivesSpace client operations
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum AspaceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("ArchivesSpace server responded {status}: {message}")]
    Communication {
        /// HTTP status code returned by the server
        status: u16,
        /// Response body (or a summary of it)
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AspaceError {
    /// Classify a non-success HTTP status into the matching error variant.
    ///
    /// 404 becomes [`AspaceError::NotFound`], 401/403 become
    /// [`AspaceError::Auth`], everything else is surfaced as
    /// [`AspaceError::Communication`] with the raw status.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => Self::NotFound(message),
            401 | 403 => Self::Auth(message),
            _ => Self::Communication { status, message },
        }
    }
}

/// Result type alias for ArchivesSpace client operations
pub type Result<T> = std::result::Result<T, AspaceError>;
