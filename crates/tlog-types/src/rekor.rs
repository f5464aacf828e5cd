//! Rekor REST API response models
//!
//! These mirror the JSON shapes returned by `/api/v1/log`,
//! `/api/v1/log/entries` and `/api/v1/log/proof`. Hashes in these responses
//! are hex encoded, unlike the base64 root hash inside checkpoint text.

use crate::checkpoint::Checkpoint;
use crate::encoding::{hex_hash, hex_hash_opt, hex_hashes, Sha256Hash};
use crate::error::{Error, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An inclusion proof for one log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InclusionProof {
    /// Index of the leaf within the tree the proof was computed for
    pub log_index: u64,
    /// Size of the tree the proof was computed for
    pub tree_size: u64,
    /// Audit path, ordered from the leaf towards the root
    #[serde(with = "hex_hashes")]
    pub hashes: Vec<Sha256Hash>,
    /// Root hash the log claims for `tree_size`
    #[serde(
        default,
        with = "hex_hash_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub root_hash: Option<Sha256Hash>,
    /// Checkpoint text committing to `root_hash`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<String>,
}

impl InclusionProof {
    /// Create a proof without the optional root and checkpoint
    pub fn new(log_index: u64, tree_size: u64, hashes: Vec<Sha256Hash>) -> Self {
        Self {
            log_index,
            tree_size,
            hashes,
            root_hash: None,
            checkpoint: None,
        }
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A consistency proof between two tree sizes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyProof {
    /// Size of the older tree
    pub first_size: u64,
    /// Size of the newer tree
    pub second_size: u64,
    /// Proof hashes
    #[serde(with = "hex_hashes")]
    pub hashes: Vec<Sha256Hash>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConsistencyProofResponse {
    #[serde(with = "hex_hashes")]
    hashes: Vec<Sha256Hash>,
}

impl ConsistencyProof {
    /// Create a proof from its parts
    pub fn new(first_size: u64, second_size: u64, hashes: Vec<Sha256Hash>) -> Self {
        Self {
            first_size,
            second_size,
            hashes,
        }
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a `/api/v1/log/proof` response. The server does not echo the
    /// sizes back, so the caller supplies the ones it asked for.
    pub fn from_response_json(json: &str, first_size: u64, second_size: u64) -> Result<Self> {
        let response: ConsistencyProofResponse = serde_json::from_str(json)?;
        Ok(Self::new(first_size, second_size, response.hashes))
    }
}

/// Verification material attached to a log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryVerification {
    /// Inclusion proof for the entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inclusion_proof: Option<InclusionProof>,
    /// Signed entry timestamp (base64), not checked here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_entry_timestamp: Option<String>,
}

/// A single log entry as returned by `/api/v1/log/entries`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Canonicalized entry body, base64 encoded. Its decoded bytes are the leaf.
    pub body: String,
    /// Time the entry was integrated (Unix seconds)
    #[serde(default)]
    pub integrated_time: i64,
    /// Log identifier (hex SHA-256 of the log's public key)
    #[serde(rename = "logID", default)]
    pub log_id: String,
    /// Global log index
    pub log_index: u64,
    /// Verification material
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<EntryVerification>,
}

impl LogEntry {
    /// Parse a single entry object
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse an entries response, a map from entry UUID to entry, which
    /// must hold exactly one entry.
    pub fn from_response_json(json: &str) -> Result<Self> {
        let entries: BTreeMap<String, LogEntry> = serde_json::from_str(json)?;
        let mut entries = entries.into_values();
        match (entries.next(), entries.next()) {
            (Some(entry), None) => Ok(entry),
            (None, _) => Err(Error::MissingField("log entry".to_string())),
            (Some(_), Some(_)) => Err(Error::Inconsistent(
                "expected a single log entry in response".to_string(),
            )),
        }
    }

    /// Decode the canonicalized body, the exact bytes that were hashed into the leaf
    pub fn body_bytes(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.body)
            .map_err(|e| Error::InvalidEncoding(format!("invalid entry body base64: {}", e)))
    }

    /// The entry's inclusion proof, if the log attached one
    pub fn inclusion_proof(&self) -> Option<&InclusionProof> {
        self.verification
            .as_ref()
            .and_then(|v| v.inclusion_proof.as_ref())
    }
}

/// Log state as returned by `/api/v1/log`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogInfo {
    /// Current root hash
    #[serde(with = "hex_hash")]
    pub root_hash: Sha256Hash,
    /// Current tree size
    pub tree_size: u64,
    /// Checkpoint text for the current state
    pub signed_tree_head: String,
    /// Tree identifier of the active shard
    #[serde(rename = "treeID")]
    pub tree_id: String,
    /// Previous shards, kept opaque
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inactive_shards: Vec<serde_json::Value>,
}

impl LogInfo {
    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse the signed tree head, rejecting it if it disagrees with the
    /// size and root reported alongside it.
    pub fn checkpoint(&self) -> Result<Checkpoint> {
        let checkpoint = Checkpoint::from_text(&self.signed_tree_head)?;
        if checkpoint.tree_size() != self.tree_size {
            return Err(Error::Inconsistent(format!(
                "signed tree head size {} != reported size {}",
                checkpoint.tree_size(), self.tree_size
            )));
        }
        if *checkpoint.root_hash() != self.root_hash {
            return Err(Error::Inconsistent(format!(
                "signed tree head root {} != reported root {}",
                checkpoint.root_hash(), self.root_hash
            )));
        }
        Ok(checkpoint)
    }
}
