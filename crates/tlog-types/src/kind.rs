//! Verdict categories shared by every verification layer
//!
//! Each crate in the workspace has its own error enum, but all of them
//! collapse into one of these kinds so callers can map a failure to an exit
//! status or an audit record without matching on crate-specific variants.

use std::fmt;

/// The category of a verification failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Proof length, index or size is inconsistent with the declared parameters
    InvalidProofShape,
    /// A reconstructed root disagrees with the expected root
    ProofMismatch,
    /// Checkpoint text does not follow the signed-note format
    MalformedCheckpoint,
    /// No trusted key verified a checkpoint signature
    UntrustedCheckpoint,
    /// Two checkpoints were produced by different logs
    OriginMismatch,
    /// Caller-supplied material (JSON, keys, encodings) could not be decoded
    InvalidInput,
}

impl ErrorKind {
    /// Process exit status for this kind. Every kind maps to a distinct,
    /// non-zero value.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::InvalidProofShape => 2,
            ErrorKind::ProofMismatch => 3,
            ErrorKind::MalformedCheckpoint => 4,
            ErrorKind::UntrustedCheckpoint => 5,
            ErrorKind::OriginMismatch => 6,
            ErrorKind::InvalidInput => 7,
        }
    }

    /// Stable identifier for log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidProofShape => "invalid_proof_shape",
            ErrorKind::ProofMismatch => "proof_mismatch",
            ErrorKind::MalformedCheckpoint => "malformed_checkpoint",
            ErrorKind::UntrustedCheckpoint => "untrusted_checkpoint",
            ErrorKind::OriginMismatch => "origin_mismatch",
            ErrorKind::InvalidInput => "invalid_input",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
