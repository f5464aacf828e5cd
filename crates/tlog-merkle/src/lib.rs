//! RFC 6962 Merkle tree proofs for transparency logs
//!
//! This crate implements the Merkle tree hashing rules of RFC 6962 and
//! verification of inclusion and consistency proofs, following the
//! algorithms of RFC 9162 section 2.1.3 and 2.1.4.
//!
//! Verification is pure: every function takes its inputs by reference and
//! returns a verdict without touching shared state, so it may be called from
//! any number of threads at once.

pub mod error;
pub mod proof;
pub mod tree;

pub use error::{Error, Result};
pub use proof::{
    consistency_proof_len, inclusion_proof_len, root_from_inclusion_proof, verify_consistency,
    verify_inclusion, verify_inclusion_hex,
};
pub use tree::{
    bit_length, empty_root, leaf_hash, node_hash, MerkleTree, HASH_SIZE, LEAF_HASH_PREFIX,
    NODE_HASH_PREFIX,
};
