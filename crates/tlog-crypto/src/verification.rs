//! Signature verification using aws-lc-rs

use crate::error::{Error, Result};
use crate::signing::{SigningScheme, ID_ED25519};
use aws_lc_rs::signature::{
    UnparsedPublicKey, ECDSA_P256_SHA256_ASN1, ECDSA_P384_SHA384_ASN1, ED25519,
};
use const_oid::db::rfc5912::{ID_EC_PUBLIC_KEY, SECP_256_R_1, SECP_384_R_1};
use spki::SubjectPublicKeyInfoRef;

/// A public key for verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationKey {
    /// Raw public key bytes (uncompressed point for ECDSA, 32 bytes for Ed25519)
    pub bytes: Vec<u8>,
    /// The scheme to use for verification
    pub scheme: SigningScheme,
}

impl VerificationKey {
    /// Create a new verification key
    pub fn new(bytes: Vec<u8>, scheme: SigningScheme) -> Self {
        Self { bytes, scheme }
    }

    /// Parse a DER-encoded SubjectPublicKeyInfo, detecting the scheme from
    /// the algorithm identifier
    pub fn from_spki_der(der: &[u8]) -> Result<Self> {
        let spki = SubjectPublicKeyInfoRef::try_from(der)
            .map_err(|e| Error::InvalidKeyFormat(format!("invalid SubjectPublicKeyInfo: {}", e)))?;

        let scheme = if spki.algorithm.oid == ID_ED25519 {
            SigningScheme::Ed25519
        } else if spki.algorithm.oid == ID_EC_PUBLIC_KEY {
            let curve = spki
                .algorithm
                .parameters_oid()
                .map_err(|e| Error::InvalidKeyFormat(format!("missing EC curve: {}", e)))?;
            if curve == SECP_256_R_1 {
                SigningScheme::EcdsaP256Sha256
            } else if curve == SECP_384_R_1 {
                SigningScheme::EcdsaP384Sha384
            } else {
                return Err(Error::UnsupportedAlgorithm(format!("EC curve {}", curve)));
            }
        } else {
            return Err(Error::UnsupportedAlgorithm(format!(
                "key algorithm {}",
                spki.algorithm.oid
            )));
        };

        let key = Self::new(spki.subject_public_key.raw_bytes().to_vec(), scheme);
        key.check_length()?;
        Ok(key)
    }

    fn check_length(&self) -> Result<()> {
        let expected = match self.scheme {
            SigningScheme::EcdsaP256Sha256 => 65,
            SigningScheme::EcdsaP384Sha384 => 97,
            SigningScheme::Ed25519 => 32,
        };
        if self.bytes.len() != expected {
            return Err(Error::InvalidKeyFormat(format!(
                "{} public key must be {} bytes, got {}",
                self.scheme,
                expected,
                self.bytes.len()
            )));
        }
        Ok(())
    }

    /// Verify a signature over data
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        match self.scheme {
            SigningScheme::EcdsaP256Sha256 => {
                let key = UnparsedPublicKey::new(&ECDSA_P256_SHA256_ASN1, &self.bytes);
                key.verify(data, signature)
                    .map_err(|_| Error::Verification("ECDSA P-256 signature invalid".to_string()))
            }
            SigningScheme::EcdsaP384Sha384 => {
                let key = UnparsedPublicKey::new(&ECDSA_P384_SHA384_ASN1, &self.bytes);
                key.verify(data, signature)
                    .map_err(|_| Error::Verification("ECDSA P-384 signature invalid".to_string()))
            }
            SigningScheme::Ed25519 => {
                let key = UnparsedPublicKey::new(&ED25519, &self.bytes);
                key.verify(data, signature)
                    .map_err(|_| Error::Verification("Ed25519 signature invalid".to_string()))
            }
        }
    }
}

/// Verify a signature using the specified scheme
pub fn verify_signature(
    public_key: &[u8],
    data: &[u8],
    signature: &[u8],
    scheme: SigningScheme,
) -> Result<()> {
    let key = VerificationKey::new(public_key.to_vec(), scheme);
    key.verify(data, signature)
}
