//! Core types and data structures for transparency log verification
//!
//! This crate provides the value types shared by the Merkle proof verifier,
//! the checkpoint signature verifier and the high-level verification API:
//! digests, key hints, the checkpoint model, Rekor response models and the
//! error kinds every layer reports.

pub mod checkpoint;
pub mod encoding;
pub mod error;
pub mod kind;
pub mod rekor;

pub use checkpoint::{format_checkpoint_body, parse_checkpoint, Checkpoint, CheckpointSignature};
pub use encoding::{KeyHint, Sha256Hash};
pub use error::{Error, Result};
pub use kind::ErrorKind;
pub use rekor::{ConsistencyProof, EntryVerification, InclusionProof, LogEntry, LogInfo};
