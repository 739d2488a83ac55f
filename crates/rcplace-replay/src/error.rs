//! Error types for rcplace-replay
//!
//! Only [`Error::Source`] aborts a replay. Everything that can go wrong with
//! a single record is carried as data ([`SkipReason`], [`RangeError`],
//! [`DispatchError`]) so the scheduler can count it and move on.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Fatal replay error
#[derive(Debug, Error)]
pub enum Error {
    /// The log source could not be opened or read
    #[error("log source error: {0}")]
    Source(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Source(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Payload field of a write record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Linear offset into the grid
    Position,
    /// Palette index
    Color,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position => f.write_str("position"),
            Self::Color => f.write_str("color"),
        }
    }
}

/// A decoded value outside its domain
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{field} {value} out of range [0, {limit})")]
pub struct RangeError {
    /// Field that failed the check
    pub field: Field,
    /// Offending value
    pub value: i64,
    /// Exclusive upper bound
    pub limit: i64,
}

/// Why a record was dropped instead of replayed
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Input ended in the middle of a record
    #[error("record truncated: missing {expected}")]
    Truncated {
        /// The line that was still expected
        expected: &'static str,
    },

    /// A framing line did not have the expected shape
    #[error("unexpected framing line {line:?}, expected {expected}")]
    UnexpectedFraming {
        /// What the decoder was looking for
        expected: &'static str,
        /// The line actually read
        line: String,
    },

    /// A payload token is not an integer
    #[error("malformed {field} token {token:?}")]
    MalformedInteger {
        /// Field being decoded
        field: Field,
        /// Raw token after prefix stripping
        token: String,
    },

    /// A new begin marker appeared before the record was complete
    #[error("record interrupted by a new begin marker")]
    Interrupted,

    /// The record decoded but a field is out of range
    #[error("{0}")]
    Rejected(RangeError),
}

impl SkipReason {
    /// True when the record was dropped by range validation rather than framing
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

impl From<RangeError> for SkipReason {
    fn from(err: RangeError) -> Self {
        Self::Rejected(err)
    }
}

/// A single tile write that the canvas did not accept
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The service answered with a non-success status
    #[error("status {status}: {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// The service could not be reached
    #[error("canvas unreachable: {0}")]
    Unreachable(String),
}

impl DispatchError {
    /// Status code, if the service answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Unreachable(_) => None,
        }
    }
}
