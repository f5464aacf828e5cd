//! Checkpoint (signed tree head) types
//!
//! A checkpoint is a signed commitment to the state of a transparency log,
//! encoded in the signed-note text format.
//! Format specified in: https://github.com/C2SP/C2SP/blob/main/tlog-checkpoint.md
//!
//! ```text
//! <origin>
//! <tree_size>
//! <root_hash_base64>
//! [extension lines...]
//!
//! — <signer_name> <base64(key_hint || signature)>
//! [additional signatures...]
//! ```
//!
//! The signature lines begin with the Unicode em dash (U+2014), not an ASCII
//! hyphen. The signed message is the body, byte for byte, including the
//! newline that precedes the blank separator line. Nothing is trimmed: a
//! signature over `"origin \n"` does not cover `"origin\n"`.

use crate::encoding::{KeyHint, Sha256Hash};
use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine};

/// Prefix of every signature line: em dash followed by a space
pub const SIGNATURE_LINE_PREFIX: &str = "\u{2014} ";

/// A signature on a checkpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointSignature {
    /// Name of the signer (e.g., "rekor.sigstore.dev")
    pub name: String,
    /// Key identifier, the first 4 bytes of the decoded signature payload
    pub key_hint: KeyHint,
    /// Signature bytes (after the key hint)
    pub signature: Vec<u8>,
}

impl CheckpointSignature {
    /// Parse a signature line. `line_no` is only used for error reporting.
    pub fn from_line(line: &str, line_no: usize) -> Result<Self> {
        let content = line.strip_prefix(SIGNATURE_LINE_PREFIX).ok_or_else(|| {
            Error::checkpoint(line_no, "signature line must start with em dash (U+2014)")
        })?;

        let (name, payload) = content.split_once(' ').ok_or_else(|| {
            Error::checkpoint(
                line_no,
                "signature line must have format: — <name> <base64_signature>",
            )
        })?;
        if name.is_empty() {
            return Err(Error::checkpoint(line_no, "empty signer name"));
        }

        let decoded = STANDARD
            .decode(payload)
            .map_err(|e| Error::checkpoint(line_no, format!("invalid signature base64: {}", e)))?;

        // 4-byte key hint followed by at least one signature byte
        if decoded.len() < 5 {
            return Err(Error::checkpoint(
                line_no,
                format!("signature too short: {} bytes", decoded.len()),
            ));
        }

        let mut hint = [0u8; 4];
        hint.copy_from_slice(&decoded[..4]);

        Ok(CheckpointSignature {
            name: name.to_string(),
            key_hint: KeyHint::new(hint),
            signature: decoded[4..].to_vec(),
        })
    }

    /// Render as a signature line (without trailing newline)
    pub fn to_line(&self) -> String {
        let mut payload = Vec::with_capacity(4 + self.signature.len());
        payload.extend_from_slice(self.key_hint.as_bytes());
        payload.extend_from_slice(&self.signature);
        format!(
            "{}{} {}",
            SIGNATURE_LINE_PREFIX,
            self.name,
            STANDARD.encode(payload)
        )
    }
}

/// A checkpoint (signed tree head) from a transparency log
///
/// Only constructed by parsing, so the fields always describe the exact
/// bytes the signatures cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    origin: String,
    tree_size: u64,
    root_hash: Sha256Hash,
    extensions: Vec<String>,
    signatures: Vec<CheckpointSignature>,
    body: String,
}

impl Checkpoint {
    /// Parse a checkpoint from its text representation
    pub fn from_text(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(Error::checkpoint(1, "empty checkpoint"));
        }

        let split = text.find("\n\n").ok_or_else(|| {
            Error::checkpoint(
                text.split('\n').count(),
                "missing blank line between body and signatures",
            )
        })?;

        // The body keeps its final newline, it is part of the signed message
        let body = &text[..split + 1];
        let signatures_text = &text[split + 2..];

        let header: Vec<&str> = body[..split].split('\n').collect();
        if header.len() < 3 {
            let missing = if header.len() == 1 {
                "missing tree size"
            } else {
                "missing root hash"
            };
            return Err(Error::checkpoint(header.len() + 1, missing));
        }

        let origin = header[0];
        if origin.is_empty() {
            return Err(Error::checkpoint(1, "empty origin"));
        }

        let tree_size = parse_tree_size(header[1])?;

        let root_hash_bytes = STANDARD
            .decode(header[2])
            .map_err(|e| Error::checkpoint(3, format!("invalid root hash base64: {}", e)))?;
        let root_hash = Sha256Hash::try_from_slice(&root_hash_bytes)
            .map_err(|e| Error::checkpoint(3, format!("invalid root hash: {}", e)))?;

        let extensions = header[3..].iter().map(|line| line.to_string()).collect();

        // Signature block starts after the blank separator line
        let first_sig_line = header.len() + 2;
        let signatures = parse_signatures(signatures_text, first_sig_line)?;

        Ok(Checkpoint {
            origin: origin.to_string(),
            tree_size,
            root_hash,
            extensions,
            signatures,
            body: body.to_string(),
        })
    }

    /// The origin string identifying the log
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Tree size (number of leaves)
    pub fn tree_size(&self) -> u64 {
        self.tree_size
    }

    /// Root hash of the Merkle tree
    pub fn root_hash(&self) -> &Sha256Hash {
        &self.root_hash
    }

    /// Extension lines, verbatim and in order
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Signature lines in the order they appear
    pub fn signatures(&self) -> &[CheckpointSignature] {
        &self.signatures
    }

    /// The exact bytes covered by the signatures
    pub fn signed_data(&self) -> &[u8] {
        self.body.as_bytes()
    }

    /// The body text (header and extensions, with trailing newline)
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Whether both checkpoints come from the same log
    pub fn same_log(&self, other: &Checkpoint) -> bool {
        self.origin == other.origin
    }

    /// Render the full signed note
    pub fn to_text(&self) -> String {
        let mut text = self.body.clone();
        text.push('\n');
        for sig in &self.signatures {
            text.push_str(&sig.to_line());
            text.push('\n');
        }
        text
    }
}

/// Parse a checkpoint from its text representation
pub fn parse_checkpoint(text: &str) -> Result<Checkpoint> {
    Checkpoint::from_text(text)
}

/// Encode a checkpoint body (the part that gets signed)
pub fn format_checkpoint_body(
    origin: &str,
    tree_size: u64,
    root_hash: &Sha256Hash,
    extensions: &[String],
) -> String {
    let mut body = format!("{}\n{}\n{}\n", origin, tree_size, root_hash.to_base64());
    for line in extensions {
        body.push_str(line);
        body.push('\n');
    }
    body
}

fn parse_tree_size(line: &str) -> Result<u64> {
    if line.is_empty() || !line.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::checkpoint(
            2,
            format!("invalid tree size: {:?}", line),
        ));
    }
    line.parse::<u64>()
        .map_err(|e| Error::checkpoint(2, format!("invalid tree size {:?}: {}", line, e)))
}

fn parse_signatures(text: &str, first_line: usize) -> Result<Vec<CheckpointSignature>> {
    let text = text.strip_suffix('\n').unwrap_or(text);
    if text.is_empty() {
        return Err(Error::checkpoint(first_line, "no signatures found"));
    }

    text.split('\n')
        .enumerate()
        .map(|(i, line)| {
            let line_no = first_line + i;
            if line.is_empty() {
                return Err(Error::checkpoint(line_no, "unexpected blank line"));
            }
            CheckpointSignature::from_line(line, line_no)
        })
        .collect()
}
