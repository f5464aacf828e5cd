//! Error types for tlog-merkle

use thiserror::Error;
use tlog_types::ErrorKind;

/// Errors that can occur in Merkle tree operations
#[derive(Error, Debug)]
pub enum Error {
    /// Proof length, leaf index or tree sizes do not fit together
    #[error("Invalid proof shape: {0}")]
    InvalidProofShape(String),

    /// A reconstructed root differs from the expected one
    #[error("{which} root mismatch: expected {expected}, computed {actual}")]
    ProofMismatch {
        which: &'static str,
        expected: String,
        actual: String,
    },

    /// Hex or base64 input could not be decoded
    #[error("Encoding error: {0}")]
    Encoding(#[from] tlog_types::Error),
}

impl Error {
    /// The verdict category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidProofShape(_) => ErrorKind::InvalidProofShape,
            Error::ProofMismatch { .. } => ErrorKind::ProofMismatch,
            Error::Encoding(e) => e.kind(),
        }
    }
}

/// Result type for Merkle tree operations
pub type Result<T> = std::result::Result<T, Error>;
