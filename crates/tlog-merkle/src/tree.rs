//! Merkle tree hashing utilities
//!
//! Implements RFC 6962 compliant Merkle tree hashing with:
//! - Domain separation via prefixes (0x00 for leaf, 0x01 for node)
//! - SHA-256 hash function
//!
//! [`MerkleTree`] is a reference implementation of the RFC 6962 tree hash
//! and proof generation over a full set of leaves. A verifier never needs it,
//! but auditors holding a complete copy of the log can recompute roots and
//! proofs with it, and the test suites use it as an oracle.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use tlog_types::Sha256Hash;

/// Prefix for leaf nodes in RFC 6962 Merkle tree
pub const LEAF_HASH_PREFIX: u8 = 0x00;

/// Prefix for internal nodes in RFC 6962 Merkle tree
pub const NODE_HASH_PREFIX: u8 = 0x01;

/// Hash size in bytes (SHA-256)
pub const HASH_SIZE: usize = 32;

/// Hash a leaf node
///
/// Returns: SHA256(0x00 || leaf_data)
pub fn leaf_hash(data: &[u8]) -> Sha256Hash {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_HASH_PREFIX]);
    hasher.update(data);
    Sha256Hash::from_bytes(hasher.finalize().into())
}

/// Hash two child nodes to create a parent node
///
/// Returns: SHA256(0x01 || left || right)
pub fn node_hash(left: &Sha256Hash, right: &Sha256Hash) -> Sha256Hash {
    let mut hasher = Sha256::new();
    hasher.update([NODE_HASH_PREFIX]);
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    Sha256Hash::from_bytes(hasher.finalize().into())
}

/// Root of the empty tree: SHA256 of the empty string
pub fn empty_root() -> Sha256Hash {
    Sha256Hash::from_bytes(Sha256::digest(b"").into())
}

/// Calculate the position of the most significant bit
pub fn bit_length(n: u64) -> u32 {
    if n == 0 {
        0
    } else {
        64 - n.leading_zeros()
    }
}

/// Largest power of two strictly smaller than `n` (n >= 2)
fn split_point(n: usize) -> usize {
    debug_assert!(n >= 2);
    1 << (bit_length((n - 1) as u64) - 1)
}

/// An in-memory Merkle tree over a complete list of leaf hashes
#[derive(Debug, Clone, Default)]
pub struct MerkleTree {
    leaves: Vec<Sha256Hash>,
}

impl MerkleTree {
    /// Build a tree from raw entries, hashing each as a leaf
    pub fn from_entries<I, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        Self {
            leaves: entries.into_iter().map(|e| leaf_hash(e.as_ref())).collect(),
        }
    }

    /// Build a tree from already computed leaf hashes
    pub fn from_leaf_hashes(leaves: Vec<Sha256Hash>) -> Self {
        Self { leaves }
    }

    /// Append a raw entry
    pub fn push(&mut self, entry: &[u8]) {
        self.leaves.push(leaf_hash(entry));
    }

    /// Number of leaves
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Whether the tree has no leaves
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Leaf hash at `index`
    pub fn leaf(&self, index: usize) -> Option<&Sha256Hash> {
        self.leaves.get(index)
    }

    /// Root hash of the whole tree
    pub fn root(&self) -> Sha256Hash {
        subtree_root(&self.leaves)
    }

    /// Root hash of the tree formed by the first `tree_size` leaves
    pub fn root_at(&self, tree_size: u64) -> Result<Sha256Hash> {
        let n = self.prefix_len(tree_size)?;
        Ok(subtree_root(&self.leaves[..n]))
    }

    /// Audit path for `leaf_index` in the tree of the first `tree_size` leaves
    pub fn inclusion_proof(&self, leaf_index: u64, tree_size: u64) -> Result<Vec<Sha256Hash>> {
        let n = self.prefix_len(tree_size)?;
        if leaf_index >= tree_size {
            return Err(Error::InvalidProofShape(format!(
                "leaf index {} >= tree size {}",
                leaf_index, tree_size
            )));
        }
        let mut proof = Vec::new();
        audit_path(leaf_index as usize, &self.leaves[..n], &mut proof);
        Ok(proof)
    }

    /// Consistency proof from `first_size` to `second_size`
    pub fn consistency_proof(&self, first_size: u64, second_size: u64) -> Result<Vec<Sha256Hash>> {
        let n = self.prefix_len(second_size)?;
        if first_size > second_size {
            return Err(Error::InvalidProofShape(format!(
                "first size {} > second size {}",
                first_size, second_size
            )));
        }
        let mut proof = Vec::new();
        if first_size > 0 && first_size < second_size {
            subproof(first_size as usize, &self.leaves[..n], true, &mut proof);
        }
        Ok(proof)
    }

    fn prefix_len(&self, tree_size: u64) -> Result<usize> {
        match usize::try_from(tree_size) {
            Ok(n) if n <= self.leaves.len() => Ok(n),
            _ => Err(Error::InvalidProofShape(format!(
                "tree size {} exceeds {} leaves",
                tree_size,
                self.leaves.len()
            ))),
        }
    }
}

/// MTH(D[n])
fn subtree_root(leaves: &[Sha256Hash]) -> Sha256Hash {
    match leaves.len() {
        0 => empty_root(),
        1 => leaves[0],
        n => {
            let k = split_point(n);
            node_hash(&subtree_root(&leaves[..k]), &subtree_root(&leaves[k..]))
        }
    }
}

/// PATH(m, D[n]), appended leaf-first
fn audit_path(m: usize, leaves: &[Sha256Hash], out: &mut Vec<Sha256Hash>) {
    let n = leaves.len();
    if n <= 1 {
        return;
    }
    let k = split_point(n);
    if m < k {
        audit_path(m, &leaves[..k], out);
        out.push(subtree_root(&leaves[k..]));
    } else {
        audit_path(m - k, &leaves[k..], out);
        out.push(subtree_root(&leaves[..k]));
    }
}

/// SUBPROOF(m, D[n], b)
fn subproof(m: usize, leaves: &[Sha256Hash], complete: bool, out: &mut Vec<Sha256Hash>) {
    let n = leaves.len();
    if m == n {
        if !complete {
            out.push(subtree_root(leaves));
        }
        return;
    }
    let k = split_point(n);
    if m <= k {
        subproof(m, &leaves[..k], complete, out);
        out.push(subtree_root(&leaves[k..]));
    } else {
        subproof(m - k, &leaves[k..], false, out);
        out.push(subtree_root(&leaves[..k]));
    }
}
