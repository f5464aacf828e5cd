//! Merkle proof verification
//!
//! Implements inclusion proof and consistency proof verification as specified
//! in RFC 6962 and RFC 9162. Proof shapes are checked from the index and size
//! arithmetic alone, before any hashing, so a malformed proof is reported as
//! such rather than as a root mismatch.

use crate::error::{Error, Result};
use crate::tree::{bit_length, leaf_hash, node_hash};
use tlog_types::Sha256Hash;

/// Verify an inclusion proof for a leaf in a Merkle tree
///
/// # Arguments
/// * `leaf_hash` - The hash of the leaf entry
/// * `leaf_index` - Index of the leaf in the tree (0-based)
/// * `tree_size` - Total number of leaves in the tree
/// * `audit_path` - The sibling hashes from the leaf towards the root
/// * `expected_root` - The expected root hash to verify against
pub fn verify_inclusion(
    leaf_hash: &Sha256Hash,
    leaf_index: u64,
    tree_size: u64,
    audit_path: &[Sha256Hash],
    expected_root: &Sha256Hash,
) -> Result<()> {
    let root = root_from_inclusion_proof(leaf_hash, leaf_index, tree_size, audit_path)?;
    verify_match("inclusion", expected_root, &root)
}

/// Reconstruct the root implied by an inclusion proof
pub fn root_from_inclusion_proof(
    leaf_hash: &Sha256Hash,
    leaf_index: u64,
    tree_size: u64,
    audit_path: &[Sha256Hash],
) -> Result<Sha256Hash> {
    let expected_len = inclusion_proof_len(leaf_index, tree_size)?;
    if audit_path.len() != expected_len {
        return Err(Error::InvalidProofShape(format!(
            "expected {} proof hashes for leaf {} in tree of size {}, got {}",
            expected_len,
            leaf_index,
            tree_size,
            audit_path.len()
        )));
    }

    // RFC 9162 section 2.1.3.2
    let mut index = leaf_index;
    let mut last_node = tree_size - 1;
    let mut hash = *leaf_hash;

    for proof_hash in audit_path {
        if last_node == 0 {
            return Err(Error::InvalidProofShape(
                "proof has more hashes than the path to the root".to_string(),
            ));
        }
        if index & 1 == 1 || index == last_node {
            // Sibling is on the left
            hash = node_hash(proof_hash, &hash);
            if index & 1 == 0 {
                // Rightmost node without a sibling: climb until it is a right child
                while index & 1 == 0 && index != 0 {
                    index >>= 1;
                    last_node >>= 1;
                }
            }
        } else {
            hash = node_hash(&hash, proof_hash);
        }
        index >>= 1;
        last_node >>= 1;
    }

    if last_node != 0 {
        return Err(Error::InvalidProofShape(
            "proof ended before reaching the root".to_string(),
        ));
    }

    Ok(hash)
}

/// Number of hashes an inclusion proof for `leaf_index` in a tree of
/// `tree_size` leaves must contain
pub fn inclusion_proof_len(leaf_index: u64, tree_size: u64) -> Result<usize> {
    if tree_size == 0 {
        return Err(Error::InvalidProofShape(
            "tree size cannot be zero".to_string(),
        ));
    }
    if leaf_index >= tree_size {
        return Err(Error::InvalidProofShape(format!(
            "leaf index {} >= tree size {}",
            leaf_index, tree_size
        )));
    }
    let (inner, border) = decompose_inclusion_proof(leaf_index, tree_size);
    Ok(inner + border)
}

/// Verify inclusion of a raw entry using hex-encoded hashes, as served by
/// the Rekor REST API
pub fn verify_inclusion_hex(
    entry: &[u8],
    leaf_index: u64,
    tree_size: u64,
    audit_path_hex: &[String],
    expected_root_hex: &str,
) -> Result<()> {
    let audit_path = audit_path_hex
        .iter()
        .map(|h| Sha256Hash::from_hex(h))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let expected_root = Sha256Hash::from_hex(expected_root_hex)?;

    verify_inclusion(
        &leaf_hash(entry),
        leaf_index,
        tree_size,
        &audit_path,
        &expected_root,
    )
}

/// Verify a consistency proof between two tree states
///
/// # Arguments
/// * `first_size` - Size of the older tree
/// * `first_root` - Root hash of the older tree
/// * `second_size` - Size of the newer tree
/// * `second_root` - Root hash of the newer tree
/// * `path` - The hashes in the consistency proof
pub fn verify_consistency(
    first_size: u64,
    first_root: &Sha256Hash,
    second_size: u64,
    second_root: &Sha256Hash,
    path: &[Sha256Hash],
) -> Result<()> {
    if first_size > second_size {
        return Err(Error::InvalidProofShape(format!(
            "first size {} > second size {}",
            first_size, second_size
        )));
    }

    // Everything is consistent with an empty history
    if first_size == 0 {
        if !path.is_empty() {
            tracing::debug!(
                "ignoring {} proof hashes for consistency from an empty tree",
                path.len()
            );
        }
        return Ok(());
    }

    if first_size == second_size {
        if !path.is_empty() {
            return Err(Error::InvalidProofShape(
                "proof should be empty for same-size trees".to_string(),
            ));
        }
        return verify_match("first", first_root, second_root);
    }

    // Normal case: 0 < first_size < second_size
    if path.is_empty() {
        return Err(Error::InvalidProofShape(
            "proof cannot be empty for different-size trees".to_string(),
        ));
    }

    let layout = ConsistencyLayout::new(first_size, second_size);
    if path.len() != layout.len() {
        return Err(Error::InvalidProofShape(format!(
            "expected {} proof hashes from size {} to {}, got {}",
            layout.len(),
            first_size,
            second_size,
            path.len()
        )));
    }

    // The proof starts with the root of the largest complete subtree shared
    // by both trees, unless that subtree is the whole first tree
    let (seed, rest) = if layout.seed_is_first_root {
        (first_root, path)
    } else {
        (&path[0], &path[1..])
    };
    let (inner, border) = rest.split_at(layout.inner);

    let first = chain_border_right(&chain_inner_right(seed, inner, layout.mask), border);
    verify_match("first", first_root, &first)?;

    let second = chain_border_right(&chain_inner(seed, inner, layout.mask), border);
    verify_match("second", second_root, &second)
}

/// Number of hashes a consistency proof from `first_size` to `second_size`
/// must contain
pub fn consistency_proof_len(first_size: u64, second_size: u64) -> Result<usize> {
    if first_size > second_size {
        return Err(Error::InvalidProofShape(format!(
            "first size {} > second size {}",
            first_size, second_size
        )));
    }
    if first_size == 0 || first_size == second_size {
        return Ok(0);
    }
    Ok(ConsistencyLayout::new(first_size, second_size).len())
}

/// How a consistency proof between two sizes splits into its parts
struct ConsistencyLayout {
    seed_is_first_root: bool,
    inner: usize,
    border: usize,
    mask: u64,
}

impl ConsistencyLayout {
    /// Requires 0 < first_size < second_size
    fn new(first_size: u64, second_size: u64) -> Self {
        // Level of the largest complete subtree ending at first_size
        let shift = first_size.trailing_zeros();
        let (inner, border) = decompose_inclusion_proof(first_size - 1, second_size);
        Self {
            seed_is_first_root: first_size == 1u64 << shift,
            inner: inner.saturating_sub(shift as usize),
            border,
            mask: (first_size - 1) >> shift,
        }
    }

    fn len(&self) -> usize {
        usize::from(!self.seed_is_first_root) + self.inner + self.border
    }
}

/// Split the path of `index` in a tree of `tree_size` into the levels below
/// the point where it leaves the last node's path (inner) and the levels
/// along the right border above it
fn decompose_inclusion_proof(index: u64, tree_size: u64) -> (usize, usize) {
    let inner = bit_length(index ^ (tree_size - 1));
    let border = index.checked_shr(inner).unwrap_or(0).count_ones();
    (inner as usize, border as usize)
}

/// Chain hashes along the inner proof path, placing each on the side
/// given by the corresponding bit of `index`
fn chain_inner(seed: &Sha256Hash, proof: &[Sha256Hash], index: u64) -> Sha256Hash {
    let mut hash = *seed;
    for (i, p) in proof.iter().enumerate() {
        if (index >> i) & 1 == 0 {
            hash = node_hash(&hash, p);
        } else {
            hash = node_hash(p, &hash);
        }
    }
    hash
}

/// Chain only the left siblings of the inner path
///
/// Right siblings cover leaves beyond the older tree, so they are skipped
fn chain_inner_right(seed: &Sha256Hash, proof: &[Sha256Hash], index: u64) -> Sha256Hash {
    let mut hash = *seed;
    for (i, p) in proof.iter().enumerate() {
        if (index >> i) & 1 == 1 {
            hash = node_hash(p, &hash);
        }
    }
    hash
}

/// Chain hashes along the right border (all proof hashes go on the left)
fn chain_border_right(seed: &Sha256Hash, proof: &[Sha256Hash]) -> Sha256Hash {
    let mut hash = *seed;
    for p in proof {
        hash = node_hash(p, &hash);
    }
    hash
}

fn verify_match(which: &'static str, expected: &Sha256Hash, actual: &Sha256Hash) -> Result<()> {
    if !expected.ct_eq(actual) {
        return Err(Error::ProofMismatch {
            which,
            expected: expected.to_hex(),
            actual: actual.to_hex(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::MerkleTree;
    use tlog_types::ErrorKind;

    #[test]
    fn test_decompose_inclusion_proof() {
        // tree_size=1, index=0: no proof needed
        assert_eq!(decompose_inclusion_proof(0, 1), (0, 0));

        // tree_size=2, index=0: one inner sibling
        assert_eq!(decompose_inclusion_proof(0, 2), (1, 0));

        // tree_size=2, index=1: the last leaf, one left border sibling
        assert_eq!(decompose_inclusion_proof(1, 2), (0, 1));

        // tree_size=5, index=4: promoted to the top, one border sibling
        assert_eq!(decompose_inclusion_proof(4, 5), (0, 1));

        // tree_size=7, index=2: three inner siblings, no border
        assert_eq!(decompose_inclusion_proof(2, 7), (3, 0));

        // tree_size=6, index=5: one inner sibling, then one border hash
        assert_eq!(decompose_inclusion_proof(5, 6), (0, 2));
    }

    #[test]
    fn test_decompose_does_not_overflow() {
        let (inner, border) = decompose_inclusion_proof(0, u64::MAX);
        assert_eq!((inner, border), (64, 0));
        assert_eq!(inclusion_proof_len(u64::MAX - 1, u64::MAX).unwrap(), 63);
    }

    #[test]
    fn test_chain_border_right() {
        let seed = Sha256Hash::from_bytes([0u8; 32]);
        assert_eq!(chain_border_right(&seed, &[]), seed);

        let proof = [Sha256Hash::from_bytes([1u8; 32])];
        assert_eq!(chain_border_right(&seed, &proof), node_hash(&proof[0], &seed));
    }

    #[test]
    fn test_verify_inclusion_single_leaf() {
        // Tree with single leaf: root = leaf_hash(data)
        let hash = leaf_hash(b"test");
        assert!(verify_inclusion(&hash, 0, 1, &[], &hash).is_ok());
    }

    #[test]
    fn test_verify_inclusion_two_leaves() {
        let hash0 = leaf_hash(b"leaf0");
        let hash1 = leaf_hash(b"leaf1");
        let root = node_hash(&hash0, &hash1);

        assert!(verify_inclusion(&hash0, 0, 2, &[hash1], &root).is_ok());
        assert!(verify_inclusion(&hash1, 1, 2, &[hash0], &root).is_ok());

        // swapped siblings produce a different root
        let err = verify_inclusion(&hash1, 0, 2, &[hash0], &root).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProofMismatch);
    }

    #[test]
    fn test_verify_inclusion_bad_shapes() {
        let hash = leaf_hash(b"x");
        let cases: &[(u64, u64, usize)] = &[
            (0, 0, 0), // empty tree
            (1, 1, 0), // index out of range
            (5, 3, 2), // index out of range
            (0, 1, 1), // too long
            (0, 2, 0), // too short
            (0, 8, 4), // too long
            (7, 8, 2), // too short
        ];
        for &(index, size, len) in cases {
            let path = vec![hash; len];
            let err = verify_inclusion(&hash, index, size, &path, &hash).unwrap_err();
            assert_eq!(
                err.kind(),
                ErrorKind::InvalidProofShape,
                "index {} size {} len {}",
                index,
                size,
                len
            );
        }
    }

    #[test]
    fn test_verify_inclusion_hex() {
        let tree = MerkleTree::from_entries([b"a", b"b", b"c"]);
        let proof: Vec<String> = tree
            .inclusion_proof(1, 3)
            .unwrap()
            .iter()
            .map(|h| h.to_hex())
            .collect();
        assert!(verify_inclusion_hex(b"b", 1, 3, &proof, &tree.root().to_hex()).is_ok());

        let err = verify_inclusion_hex(b"b", 1, 3, &["zz".to_string()], &tree.root().to_hex())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_consistency_same_size() {
        let root = leaf_hash(b"a");
        let other = leaf_hash(b"b");
        assert!(verify_consistency(1, &root, 1, &root, &[]).is_ok());

        let err = verify_consistency(1, &root, 1, &other, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProofMismatch);

        let err = verify_consistency(1, &root, 1, &root, &[other]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidProofShape);
    }

    #[test]
    fn test_consistency_from_empty_tree() {
        let a = leaf_hash(b"a");
        let b = leaf_hash(b"b");
        assert!(verify_consistency(0, &a, 5, &b, &[]).is_ok());
        assert!(verify_consistency(0, &a, 5, &b, &[a, b]).is_ok());
        assert!(verify_consistency(0, &a, 0, &b, &[]).is_ok());
    }

    #[test]
    fn test_consistency_shrinking_tree() {
        let a = leaf_hash(b"a");
        let err = verify_consistency(3, &a, 2, &a, &[a]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidProofShape);
    }

    #[test]
    fn test_consistency_proof_len() {
        assert_eq!(consistency_proof_len(0, 9).unwrap(), 0);
        assert_eq!(consistency_proof_len(4, 4).unwrap(), 0);
        // 1 -> 2: first root is the seed, one inner hash
        assert_eq!(consistency_proof_len(1, 2).unwrap(), 1);
        // 3 -> 7: RFC 6962 example, [c, d, g, l]
        assert_eq!(consistency_proof_len(3, 7).unwrap(), 4);
        // 4 -> 7: RFC 6962 example, [l]
        assert_eq!(consistency_proof_len(4, 7).unwrap(), 1);
        // 6 -> 7: RFC 6962 example, [i, j, k]
        assert_eq!(consistency_proof_len(6, 7).unwrap(), 3);
        assert!(consistency_proof_len(7, 6).is_err());
    }

    #[test]
    fn test_consistency_rfc6962_example() {
        let tree = MerkleTree::from_entries((0u8..7).map(|i| [i]));
        for first in 1..=7u64 {
            let proof = tree.consistency_proof(first, 7).unwrap();
            assert_eq!(proof.len(), consistency_proof_len(first, 7).unwrap());
            verify_consistency(
                first,
                &tree.root_at(first).unwrap(),
                7,
                &tree.root(),
                &proof,
            )
            .unwrap_or_else(|e| panic!("{} -> 7: {}", first, e));
        }
    }
}
