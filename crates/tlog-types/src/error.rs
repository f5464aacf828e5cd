//! Error types for tlog-types

use crate::kind::ErrorKind;
use thiserror::Error;

/// Errors that can occur while decoding transparency log data
#[derive(Error, Debug)]
pub enum Error {
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid encoding (hex, base64, digest length)
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Invalid checkpoint format, with the 1-based line that caused it
    #[error("Invalid checkpoint at line {line}: {reason}")]
    InvalidCheckpoint { line: usize, reason: String },

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Two encodings of the same log state disagree
    #[error("Inconsistent log data: {0}")]
    Inconsistent(String),
}

impl Error {
    pub(crate) fn checkpoint(line: usize, reason: impl Into<String>) -> Self {
        Error::InvalidCheckpoint {
            line,
            reason: reason.into(),
        }
    }

    /// The verdict category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidCheckpoint { .. } | Error::Inconsistent(_) => {
                ErrorKind::MalformedCheckpoint
            }
            Error::Json(_) | Error::InvalidEncoding(_) | Error::MissingField(_) => {
                ErrorKind::InvalidInput
            }
        }
    }
}

/// Result type for tlog-types operations
pub type Result<T> = std::result::Result<T, Error>;
