//! Error types for rcplace-canvas

use rcplace_replay::DispatchError;
use thiserror::Error;

/// Canvas client error type
#[derive(Debug, Error)]
pub enum Error {
    /// Client could not be configured
    #[error("configuration error: {0}")]
    Config(String),

    /// Network error
    #[error("network error: {0}")]
    Network(String),

    /// Timeout
    #[error("timeout after {0}ms")]
    Timeout(u64),

    /// The canvas answered with a non-success status
    #[error("api error: status {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body (truncated)
        message: String,
    },

    /// Response body could not be parsed
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// Status code, if the canvas answered
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the canvas refused the write because of its per-user rate limit
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self.status(), Some(425 | 429))
    }
}

impl From<Error> for DispatchError {
    fn from(err: Error) -> Self {
        match err {
            Error::Api { status, message } => Self::Rejected { status, message },
            other => Self::Unreachable(other.to_string()),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
