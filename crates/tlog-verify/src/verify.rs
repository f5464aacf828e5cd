//! High-level verification API
//!
//! This module provides the two questions a log client asks: is this entry
//! in the tree a trusted checkpoint commits to, and does a newer trusted
//! checkpoint extend an older one without rewriting history.

use crate::error::{Error, Result, Stage};
use tlog_crypto::{verify_checkpoint_signature, SignaturePolicy, TrustedKeys};
use tlog_merkle::{leaf_hash, verify_consistency, verify_inclusion};
use tlog_types::{Checkpoint, ConsistencyProof, InclusionProof, LogEntry, LogInfo};

/// Policy for verifying log material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationPolicy {
    /// Which checkpoint signature lines must verify
    pub signature_policy: SignaturePolicy,
    /// Reject consistency checks between checkpoints with different origins
    pub require_same_origin: bool,
    /// Reject inclusion proofs whose shipped root hash differs from the checkpoint root
    pub check_proof_root: bool,
}

impl Default for VerificationPolicy {
    fn default() -> Self {
        Self {
            signature_policy: SignaturePolicy::AtLeastOne,
            require_same_origin: true,
            check_proof_root: true,
        }
    }
}

impl VerificationPolicy {
    /// Use a specific signature policy
    pub fn with_signature_policy(mut self, signature_policy: SignaturePolicy) -> Self {
        self.signature_policy = signature_policy;
        self
    }

    /// Require every checkpoint signature to come from a trusted key
    pub fn require_all_signatures(mut self) -> Self {
        self.signature_policy = SignaturePolicy::AllKnown;
        self
    }

    /// Allow consistency checks across checkpoints with different origins
    ///
    /// Only useful when a log has been renamed without changing its key.
    pub fn allow_origin_change(mut self) -> Self {
        self.require_same_origin = false;
        self
    }

    /// Ignore the root hash a log ships next to an inclusion proof
    pub fn skip_proof_root_check(mut self) -> Self {
        self.check_proof_root = false;
        self
    }
}

/// A verifier for transparency log entries and checkpoints
///
/// The verifier holds no mutable state, so one instance can be shared
/// between threads.
#[derive(Debug, Clone)]
pub struct Verifier {
    trusted_keys: TrustedKeys,
    policy: VerificationPolicy,
}

impl Verifier {
    /// Create a verifier trusting `trusted_keys` with the default policy
    pub fn new(trusted_keys: TrustedKeys) -> Self {
        Self {
            trusted_keys,
            policy: VerificationPolicy::default(),
        }
    }

    /// Replace the verification policy
    pub fn with_policy(mut self, policy: VerificationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The keys checkpoints are verified against
    pub fn trusted_keys(&self) -> &TrustedKeys {
        &self.trusted_keys
    }

    /// The active policy
    pub fn policy(&self) -> &VerificationPolicy {
        &self.policy
    }

    /// Parse checkpoint text and verify its signatures
    pub fn verify_checkpoint_text(&self, text: &str) -> Result<Checkpoint> {
        let checkpoint = Checkpoint::from_text(text)
            .map_err(|e| Error::checkpoint(Stage::Checkpoint)(e.into()))?;
        self.verify_checkpoint(&checkpoint, Stage::Checkpoint)?;
        Ok(checkpoint)
    }

    fn verify_checkpoint(&self, checkpoint: &Checkpoint, stage: Stage) -> Result<()> {
        verify_checkpoint_signature(checkpoint, &self.trusted_keys, self.policy.signature_policy)
            .map_err(Error::checkpoint(stage))
    }

    /// Verify that `entry` is included in the tree committed to by `checkpoint`
    ///
    /// The checkpoint signature is checked first, then the proof is checked
    /// against the checkpoint's tree size and root hash. The proof's own
    /// `checkpoint` text is not consulted.
    pub fn verify_entry_inclusion(
        &self,
        checkpoint: &Checkpoint,
        entry: &[u8],
        proof: &InclusionProof,
    ) -> Result<()> {
        self.verify_checkpoint(checkpoint, Stage::Checkpoint)?;

        if proof.tree_size != checkpoint.tree_size() {
            return Err(Error::TreeSizeMismatch {
                which: "inclusion",
                proof_size: proof.tree_size,
                checkpoint_size: checkpoint.tree_size(),
            });
        }

        if self.policy.check_proof_root {
            if let Some(root_hash) = &proof.root_hash {
                if !root_hash.ct_eq(checkpoint.root_hash()) {
                    return Err(Error::RootMismatch {
                        proof: root_hash.to_hex(),
                        checkpoint: checkpoint.root_hash().to_hex(),
                    });
                }
            }
        }

        verify_inclusion(
            &leaf_hash(entry),
            proof.log_index,
            proof.tree_size,
            &proof.hashes,
            checkpoint.root_hash(),
        )?;

        tracing::debug!(
            "Verified inclusion of entry {} in {} at tree size {}",
            proof.log_index,
            checkpoint.origin(),
            checkpoint.tree_size()
        );
        Ok(())
    }

    /// Verify that `new` extends `old` as an append-only log
    pub fn verify_checkpoint_consistency(
        &self,
        old: &Checkpoint,
        new: &Checkpoint,
        proof: &ConsistencyProof,
    ) -> Result<()> {
        self.verify_checkpoint(old, Stage::OldCheckpoint)?;
        self.verify_checkpoint(new, Stage::NewCheckpoint)?;

        if self.policy.require_same_origin && !old.same_log(new) {
            tracing::warn!(
                "Refusing consistency check across logs {:?} and {:?}",
                old.origin(),
                new.origin()
            );
            return Err(Error::OriginMismatch {
                old: old.origin().to_string(),
                new: new.origin().to_string(),
            });
        }

        if proof.first_size != old.tree_size() {
            return Err(Error::TreeSizeMismatch {
                which: "consistency first",
                proof_size: proof.first_size,
                checkpoint_size: old.tree_size(),
            });
        }
        if proof.second_size != new.tree_size() {
            return Err(Error::TreeSizeMismatch {
                which: "consistency second",
                proof_size: proof.second_size,
                checkpoint_size: new.tree_size(),
            });
        }

        verify_consistency(
            old.tree_size(),
            old.root_hash(),
            new.tree_size(),
            new.root_hash(),
            &proof.hashes,
        )?;

        tracing::debug!(
            "Verified consistency of {} from tree size {} to {}",
            new.origin(),
            old.tree_size(),
            new.tree_size()
        );
        Ok(())
    }

    /// Verify a log entry using the proof and checkpoint the log attached to it
    ///
    /// Returns the verified checkpoint so it can seed a later consistency check.
    pub fn verify_log_entry(&self, entry: &LogEntry) -> Result<Checkpoint> {
        let proof = entry
            .inclusion_proof()
            .ok_or_else(|| Error::Missing("inclusion proof".to_string()))?;
        let text = proof
            .checkpoint
            .as_deref()
            .ok_or_else(|| Error::Missing("checkpoint in inclusion proof".to_string()))?;
        let checkpoint = Checkpoint::from_text(text)
            .map_err(|e| Error::checkpoint(Stage::Checkpoint)(e.into()))?;
        let body = entry.body_bytes()?;

        self.verify_entry_inclusion(&checkpoint, &body, proof)?;
        Ok(checkpoint)
    }

    /// Verify the signed tree head of a `/api/v1/log` response
    pub fn verify_log_info(&self, info: &LogInfo) -> Result<Checkpoint> {
        let checkpoint = info
            .checkpoint()
            .map_err(|e| Error::checkpoint(Stage::Checkpoint)(e.into()))?;
        self.verify_checkpoint(&checkpoint, Stage::Checkpoint)?;
        Ok(checkpoint)
    }
}

/// Convenience function to verify entry inclusion with the default policy
pub fn verify_entry_inclusion(
    checkpoint: &Checkpoint,
    trusted_keys: &TrustedKeys,
    entry: &[u8],
    proof: &InclusionProof,
) -> Result<()> {
    Verifier::new(trusted_keys.clone()).verify_entry_inclusion(checkpoint, entry, proof)
}

/// Convenience function to verify checkpoint consistency with the default policy
pub fn verify_checkpoint_consistency(
    old: &Checkpoint,
    new: &Checkpoint,
    trusted_keys: &TrustedKeys,
    proof: &ConsistencyProof,
) -> Result<()> {
    Verifier::new(trusted_keys.clone()).verify_checkpoint_consistency(old, new, proof)
}
