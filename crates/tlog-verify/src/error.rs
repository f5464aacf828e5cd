//! Error types for tlog-verify

use thiserror::Error;
use tlog_types::ErrorKind;

/// The part of a verification that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// The checkpoint an entry is verified against
    Checkpoint,
    /// The older checkpoint of a consistency check
    OldCheckpoint,
    /// The newer checkpoint of a consistency check
    NewCheckpoint,
    /// The inclusion or consistency proof
    Proof,
    /// Decoding the caller's entry or response material
    Input,
}

impl Stage {
    /// Human-readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Checkpoint => "checkpoint",
            Stage::OldCheckpoint => "old checkpoint",
            Stage::NewCheckpoint => "new checkpoint",
            Stage::Proof => "proof",
            Stage::Input => "input",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during verification
#[derive(Error, Debug)]
pub enum Error {
    /// A checkpoint could not be parsed or is not trusted
    #[error("{stage} verification failed: {source}")]
    Checkpoint {
        stage: Stage,
        #[source]
        source: tlog_crypto::Error,
    },

    /// The Merkle proof is malformed or does not lead to the checkpoint root
    #[error("Proof verification failed: {0}")]
    Proof(#[from] tlog_merkle::Error),

    /// The two checkpoints of a consistency check come from different logs
    #[error("Checkpoint origins differ: {old:?} vs {new:?}")]
    OriginMismatch { old: String, new: String },

    /// A proof was computed for a different tree size than the checkpoint's
    #[error("{which} proof is for tree size {proof_size}, checkpoint has {checkpoint_size}")]
    TreeSizeMismatch {
        which: &'static str,
        proof_size: u64,
        checkpoint_size: u64,
    },

    /// The root hash shipped with a proof differs from the checkpoint root
    #[error("Proof root hash {proof} does not match checkpoint root hash {checkpoint}")]
    RootMismatch { proof: String, checkpoint: String },

    /// Entry or response material could not be decoded
    #[error("Invalid input: {0}")]
    Input(#[from] tlog_types::Error),

    /// Required material is absent from a log response
    #[error("Missing {0}")]
    Missing(String),
}

impl Error {
    pub(crate) fn checkpoint(stage: Stage) -> impl FnOnce(tlog_crypto::Error) -> Error {
        move |source| Error::Checkpoint { stage, source }
    }

    /// The verdict category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Checkpoint { source, .. } => source.kind(),
            Error::Proof(e) => e.kind(),
            Error::OriginMismatch { .. } => ErrorKind::OriginMismatch,
            Error::TreeSizeMismatch { .. } => ErrorKind::InvalidProofShape,
            Error::RootMismatch { .. } => ErrorKind::ProofMismatch,
            Error::Input(e) => e.kind(),
            Error::Missing(_) => ErrorKind::InvalidInput,
        }
    }

    /// The stage that failed
    pub fn stage(&self) -> Stage {
        match self {
            Error::Checkpoint { stage, .. } => *stage,
            Error::Proof(_) | Error::TreeSizeMismatch { .. } | Error::RootMismatch { .. } => {
                Stage::Proof
            }
            Error::OriginMismatch { .. } => Stage::NewCheckpoint,
            Error::Input(_) | Error::Missing(_) => Stage::Input,
        }
    }

    /// Process exit code for command-line front ends
    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}

/// Result type for verification operations
pub type Result<T> = std::result::Result<T, Error>;
