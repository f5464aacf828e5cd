//! Trusted keys for checkpoint verification
//!
//! A checkpoint signature line names its signer and carries a 4-byte key
//! hint. A [`TrustedKey`] matches a line when both agree, which lets a log
//! rotate keys or collect witness cosignatures without the verifier trying
//! every key on every line.
//!
//! Key hints follow the signed-note conventions:
//! - Ed25519: `SHA-256(name || "\n" || 0x01 || public_key)[..4]`
//! - ECDSA: `SHA-256(DER SubjectPublicKeyInfo)[..4]`, as Rekor does

use crate::error::{Error, Result};
use crate::hash::{sha256, sha256_concat};
use crate::signing::{KeyPair, SigningScheme};
use crate::verification::VerificationKey;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use tlog_types::{CheckpointSignature, KeyHint};

/// Signed-note key type byte for Ed25519
const ED25519_KEY_TYPE: u8 = 0x01;

/// A public key the caller trusts to sign checkpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedKey {
    name: String,
    key_hint: KeyHint,
    key: VerificationKey,
}

impl TrustedKey {
    /// Create from a DER-encoded SubjectPublicKeyInfo
    pub fn from_spki_der(name: impl Into<String>, der: &[u8]) -> Result<Self> {
        let name = checked_name(name.into())?;
        let key = VerificationKey::from_spki_der(der)?;
        let key_hint = match key.scheme {
            SigningScheme::Ed25519 => ed25519_key_hint(&name, &key.bytes),
            SigningScheme::EcdsaP256Sha256 | SigningScheme::EcdsaP384Sha384 => {
                ecdsa_key_hint(der)
            }
        };
        Ok(Self {
            name,
            key_hint,
            key,
        })
    }

    /// Create from a PEM-encoded public key (`-----BEGIN PUBLIC KEY-----`)
    pub fn from_pem(name: impl Into<String>, pem_text: &str) -> Result<Self> {
        let parsed = pem::parse(pem_text).map_err(|e| Error::Pem(e.to_string()))?;
        if parsed.tag() != "PUBLIC KEY" {
            return Err(Error::Pem(format!(
                "expected PUBLIC KEY block, found {}",
                parsed.tag()
            )));
        }
        Self::from_spki_der(name, parsed.contents())
    }

    /// Create from a raw 32-byte Ed25519 public key
    pub fn from_ed25519_bytes(name: impl Into<String>, public_key: &[u8]) -> Result<Self> {
        let name = checked_name(name.into())?;
        if public_key.len() != 32 {
            return Err(Error::InvalidKeyFormat(format!(
                "Ed25519 public key must be 32 bytes, got {}",
                public_key.len()
            )));
        }
        Ok(Self {
            key_hint: ed25519_key_hint(&name, public_key),
            name,
            key: VerificationKey::new(public_key.to_vec(), SigningScheme::Ed25519),
        })
    }

    /// Parse a signed-note verifier key: `<name>+<hex key hint>+<base64(type || key)>`
    ///
    /// Only Ed25519 (type 0x01) keys are defined in this encoding. The hint
    /// embedded in the string must match the one derived from the key.
    pub fn from_verifier_key(vkey: &str) -> Result<Self> {
        let mut parts = vkey.splitn(3, '+');
        let (name, hint, encoded) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(hint), Some(encoded)) => (name, hint, encoded),
            _ => {
                return Err(Error::InvalidKeyFormat(
                    "verifier key must have the form name+hint+key".to_string(),
                ))
            }
        };

        let key_bytes = STANDARD.decode(encoded)?;
        let (key_type, public_key) = key_bytes
            .split_first()
            .ok_or_else(|| Error::InvalidKeyFormat("empty verifier key".to_string()))?;
        if *key_type != ED25519_KEY_TYPE {
            return Err(Error::UnsupportedAlgorithm(format!(
                "verifier key type 0x{:02x}",
                key_type
            )));
        }

        let key = Self::from_ed25519_bytes(name, public_key)?;
        if !key.key_hint.to_hex().eq_ignore_ascii_case(hint) {
            return Err(Error::InvalidKeyFormat(format!(
                "verifier key hint {} does not match key ({})",
                hint, key.key_hint
            )));
        }
        Ok(key)
    }

    /// Create the trusted counterpart of a signing key
    pub fn from_key_pair(name: impl Into<String>, key_pair: &KeyPair) -> Result<Self> {
        Self::from_spki_der(name, &key_pair.public_key_to_der()?)
    }

    /// Signer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key hint expected in signature lines from this key
    pub fn key_hint(&self) -> KeyHint {
        self.key_hint
    }

    /// Signature scheme of this key
    pub fn scheme(&self) -> SigningScheme {
        self.key.scheme
    }

    /// Whether a checkpoint signature line claims to come from this key
    pub fn matches(&self, signature: &CheckpointSignature) -> bool {
        signature.name == self.name && signature.key_hint == self.key_hint
    }

    /// Verify a signature over `message`
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        self.key.verify(message, signature)
    }
}

/// The set of keys a caller trusts to sign checkpoints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedKeys {
    keys: Vec<TrustedKey>,
}

#[derive(Debug, Deserialize)]
struct TrustedKeysConfig {
    keys: Vec<TrustedKeyConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrustedKeyConfig {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    public_key: Option<String>,
    #[serde(default)]
    verifier_key: Option<String>,
}

impl TrustedKeys {
    /// Create an empty key set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key
    pub fn push(&mut self, key: TrustedKey) {
        self.keys.push(key);
    }

    /// Builder-style add
    pub fn with_key(mut self, key: TrustedKey) -> Self {
        self.push(key);
        self
    }

    /// Load keys from a JSON document:
    ///
    /// ```json
    /// {"keys": [
    ///   {"name": "rekor.sigstore.dev", "publicKey": "-----BEGIN PUBLIC KEY-----\n..."},
    ///   {"name": "witness.example", "publicKey": "<base64 DER SubjectPublicKeyInfo>"},
    ///   {"verifierKey": "PeterNeumann+c74f20a3+ARpc2QcUPDhMQegwxbzhKqiBfsVkmqq/LDE4izWy10TW"}
    /// ]}
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TrustedKeysConfig = serde_json::from_str(json)?;
        config
            .keys
            .into_iter()
            .map(TrustedKeyConfig::into_trusted_key)
            .collect()
    }

    /// Keys a signature line could come from
    ///
    /// Hints are only four bytes, so several entries can share a name and a
    /// hint. Callers try each of them.
    pub fn matching<'a>(
        &'a self,
        signature: &'a CheckpointSignature,
    ) -> impl Iterator<Item = &'a TrustedKey> + 'a {
        self.keys.iter().filter(move |key| key.matches(signature))
    }

    /// Iterate over the keys
    pub fn iter(&self) -> impl Iterator<Item = &TrustedKey> {
        self.keys.iter()
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no keys are trusted
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<TrustedKey> for TrustedKeys {
    fn from_iter<I: IntoIterator<Item = TrustedKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl TrustedKeyConfig {
    fn into_trusted_key(self) -> Result<TrustedKey> {
        match (self.name, self.public_key, self.verifier_key) {
            (_, None, Some(vkey)) => TrustedKey::from_verifier_key(&vkey),
            (Some(name), Some(public_key), None) => {
                if public_key.trim_start().starts_with("-----BEGIN") {
                    TrustedKey::from_pem(name, &public_key)
                } else {
                    TrustedKey::from_spki_der(name, &STANDARD.decode(public_key.trim())?)
                }
            }
            _ => Err(Error::InvalidKeyFormat(
                "each key needs either name and publicKey, or verifierKey".to_string(),
            )),
        }
    }
}

/// Key hint of an Ed25519 signer
pub fn ed25519_key_hint(name: &str, public_key: &[u8]) -> KeyHint {
    let digest = sha256_concat(&[name.as_bytes(), b"\n", &[ED25519_KEY_TYPE], public_key]);
    KeyHint::from_digest(digest.as_bytes())
}

/// Key hint of an ECDSA signer, from its DER SubjectPublicKeyInfo
pub fn ecdsa_key_hint(spki_der: &[u8]) -> KeyHint {
    KeyHint::from_digest(sha256(spki_der).as_bytes())
}

fn checked_name(name: String) -> Result<String> {
    if name.is_empty() || name.contains('+') || name.chars().any(char::is_whitespace) {
        return Err(Error::InvalidKeyFormat(format!(
            "invalid signer name {:?}",
            name
        )));
    }
    Ok(name)
}
