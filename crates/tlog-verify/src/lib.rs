//! Transparency log entry inclusion and checkpoint consistency verification
//!
//! This is the main entry point for verifying transparency log material.
//! It combines the Merkle proof verifier with checkpoint signature
//! verification and reports every failure with the stage that failed and a
//! stable [`ErrorKind`](tlog_types::ErrorKind).

pub mod error;
pub mod verify;

// Re-export core crates
pub use tlog_crypto as crypto;
pub use tlog_merkle as merkle;
pub use tlog_types as types;

pub use error::{Error, Result, Stage};
pub use tlog_crypto::{SignaturePolicy, TrustedKey, TrustedKeys};
pub use tlog_types::{
    parse_checkpoint, Checkpoint, ConsistencyProof, ErrorKind, InclusionProof, LogEntry, LogInfo,
};
pub use verify::{
    verify_checkpoint_consistency, verify_entry_inclusion, VerificationPolicy, Verifier,
};
