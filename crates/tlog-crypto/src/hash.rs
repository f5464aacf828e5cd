//! SHA-256 through aws-lc-rs, used for key hints

use aws_lc_rs::digest::{digest, Context, Digest, SHA256};
use tlog_types::Sha256Hash;

/// SHA-256 of `data`
pub fn sha256(data: &[u8]) -> Sha256Hash {
    to_hash(digest(&SHA256, data))
}

/// SHA-256 of the concatenation of `parts`
pub fn sha256_concat(parts: &[&[u8]]) -> Sha256Hash {
    let mut context = Context::new(&SHA256);
    for part in parts {
        context.update(part);
    }
    to_hash(context.finish())
}

fn to_hash(digest: Digest) -> Sha256Hash {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(digest.as_ref());
    Sha256Hash::from_bytes(bytes)
}
