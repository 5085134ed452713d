use crate::shared::{ConfigError, SharedError};
use thiserror::Error;

/// Errors produced by the admin layer.
#[derive(Error, Debug)]
pub enum AdminError {
    /// Transport failure talking to the script (connect, timeout, body read).
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The script answered with a non-success HTTP status.
    #[error("Remote store returned {status}: {body}")]
    Status { status: u16, body: String },

    /// A fetched collection could not be decoded.
    #[error("Cannot decode {what}: {message}")]
    Decode { what: &'static str, message: String },

    /// The script acknowledged a write as refused.
    #[error("Write rejected: {0}")]
    Rejected(String),

    /// Local cache database error.
    #[error("Cache error: {0}")]
    Cache(#[from] sqlx::Error),

    /// Generic I/O error (e.g. creating the cache directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Shared(#[from] SharedError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AdminError {
    pub fn decode(what: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            what,
            message: message.into(),
        }
    }

    /// Whether the failure came from talking to the remote store
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            AdminError::Http(_) | AdminError::Status { .. } | AdminError::Decode { .. } | AdminError::Rejected(_)
        )
    }
}

/// Convenience alias used throughout the admin layer.
pub type Result<T> = std::result::Result<T, AdminError>;
