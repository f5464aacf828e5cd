//! Cryptographic primitives for transparency log checkpoints
//!
//! This crate provides trusted key handling, signature verification and the
//! checkpoint signature verifier, using aws-lc-rs as the cryptographic
//! backend. Key generation and signing are included so logs, witnesses and
//! test suites can produce signed checkpoints.

pub mod checkpoint;
pub mod error;
pub mod hash;
pub mod keyring;
pub mod signing;
pub mod verification;

pub use checkpoint::{
    sign_checkpoint, sign_checkpoint_body, verify_checkpoint_signature, SignaturePolicy,
};
pub use error::{Error, Result};
pub use hash::{sha256, sha256_concat};
pub use keyring::{ecdsa_key_hint, ed25519_key_hint, TrustedKey, TrustedKeys};
pub use signing::{KeyPair, SigningScheme};
pub use verification::{verify_signature, VerificationKey};
