//! Checkpoint signature verification and signing
//!
//! A checkpoint is trusted once a signature line from a caller-supplied key
//! verifies over the exact body bytes. Lines from keys the caller does not
//! know are skipped under [`SignaturePolicy::AtLeastOne`], which is what lets
//! witnesses add cosignatures without breaking existing verifiers.

use crate::error::{Error, Result};
use crate::keyring::{TrustedKey, TrustedKeys};
use crate::signing::KeyPair;
use tlog_types::{format_checkpoint_body, Checkpoint, CheckpointSignature, Sha256Hash};

/// Which signature lines must verify for a checkpoint to be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignaturePolicy {
    /// At least one line from a trusted key verifies, lines from unknown keys are ignored
    #[default]
    AtLeastOne,
    /// Every line must come from a trusted key and verify
    AllKnown,
}

/// Verify the signatures on a checkpoint against the trusted keys
///
/// A line whose name and key hint match trusted keys but whose signature
/// verifies under none of them makes the checkpoint untrusted, whatever the
/// other lines say.
pub fn verify_checkpoint_signature(
    checkpoint: &Checkpoint,
    trusted_keys: &TrustedKeys,
    policy: SignaturePolicy,
) -> Result<()> {
    let mut verified = 0usize;

    for signature in checkpoint.signatures() {
        let mut candidates = trusted_keys.matching(signature).peekable();
        if candidates.peek().is_none() {
            if policy == SignaturePolicy::AllKnown {
                tracing::warn!(
                    "Checkpoint for {} signed by unknown key {} ({})",
                    checkpoint.origin(),
                    signature.name,
                    signature.key_hint
                );
                return Err(Error::UntrustedCheckpoint(format!(
                    "signature from unknown key {} ({})",
                    signature.name, signature.key_hint
                )));
            }
            tracing::debug!(
                "Skipping signature from unknown key {} ({})",
                signature.name,
                signature.key_hint
            );
            continue;
        }

        let key = candidates
            .find(|key| key.verify(checkpoint.signed_data(), &signature.signature).is_ok())
            .ok_or_else(|| {
                tracing::warn!(
                    "Rejected checkpoint signature from {} ({})",
                    signature.name,
                    signature.key_hint
                );
                Error::UntrustedCheckpoint(format!(
                    "signature from {} ({}) does not verify",
                    signature.name, signature.key_hint
                ))
            })?;

        tracing::debug!(
            "Verified checkpoint signature from {} ({}, {})",
            key.name(),
            key.key_hint(),
            key.scheme()
        );
        verified += 1;
    }

    if verified == 0 {
        tracing::warn!(
            "No trusted signature among {} on checkpoint for {}",
            checkpoint.signatures().len(),
            checkpoint.origin()
        );
        return Err(Error::UntrustedCheckpoint(format!(
            "no signature from a trusted key on checkpoint for {}",
            checkpoint.origin()
        )));
    }

    Ok(())
}

/// Sign a checkpoint body as `name`
pub fn sign_checkpoint_body(
    body: &str,
    name: &str,
    key_pair: &KeyPair,
) -> Result<CheckpointSignature> {
    let key = TrustedKey::from_key_pair(name, key_pair)?;
    let signature = key_pair.sign(body.as_bytes())?;
    Ok(CheckpointSignature {
        name: key.name().to_string(),
        key_hint: key.key_hint(),
        signature,
    })
}

/// Build and sign a checkpoint with each of `signers`
pub fn sign_checkpoint(
    origin: &str,
    tree_size: u64,
    root_hash: &Sha256Hash,
    extensions: &[String],
    signers: &[(&str, &KeyPair)],
) -> Result<Checkpoint> {
    let body = format_checkpoint_body(origin, tree_size, root_hash, extensions);
    let mut text = body.clone();
    text.push('\n');
    for (name, key_pair) in signers {
        text.push_str(&sign_checkpoint_body(&body, name, key_pair)?.to_line());
        text.push('\n');
    }
    Ok(Checkpoint::from_text(&text)?)
}
