//! Signature schemes and checkpoint signing keys
//!
//! Log operators and witnesses sign checkpoint bodies with a [`KeyPair`].
//! Verifiers only ever hold public keys, so signing is mainly used by
//! tooling and tests that need signed checkpoints.

use crate::error::{Error, Result};
use aws_lc_rs::{
    rand::SystemRandom,
    signature::{
        EcdsaKeyPair, EcdsaSigningAlgorithm, Ed25519KeyPair, KeyPair as _,
        ECDSA_P256_SHA256_ASN1_SIGNING, ECDSA_P384_SHA384_ASN1_SIGNING,
    },
};
use const_oid::db::rfc5912::{ID_EC_PUBLIC_KEY, SECP_256_R_1, SECP_384_R_1};
use const_oid::ObjectIdentifier;
use der::asn1::BitString;
use der::Encode;
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};

/// id-Ed25519 (RFC 8410)
pub(crate) const ID_ED25519: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.101.112");

/// Signature schemes accepted on checkpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningScheme {
    /// ECDSA P-256 with SHA-256, ASN.1 DER signatures (Rekor)
    EcdsaP256Sha256,
    /// ECDSA P-384 with SHA-384, ASN.1 DER signatures
    EcdsaP384Sha384,
    /// Ed25519, as used by signed-note witnesses and tiled logs
    Ed25519,
}

impl SigningScheme {
    /// Stable name for logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            SigningScheme::EcdsaP256Sha256 => "ECDSA_P256_SHA256",
            SigningScheme::EcdsaP384Sha384 => "ECDSA_P384_SHA384",
            SigningScheme::Ed25519 => "ED25519",
        }
    }
}

impl std::fmt::Display for SigningScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A private key that can sign checkpoint bodies
pub enum KeyPair {
    EcdsaP256(EcdsaKeyPair),
    EcdsaP384(EcdsaKeyPair),
    Ed25519(Ed25519KeyPair),
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("scheme", &self.default_scheme())
            .finish_non_exhaustive()
    }
}

impl KeyPair {
    /// Generate a new ECDSA P-256 key pair
    pub fn generate_ecdsa_p256() -> Result<Self> {
        generate_ecdsa(&ECDSA_P256_SHA256_ASN1_SIGNING).map(KeyPair::EcdsaP256)
    }

    /// Generate a new ECDSA P-384 key pair
    pub fn generate_ecdsa_p384() -> Result<Self> {
        generate_ecdsa(&ECDSA_P384_SHA384_ASN1_SIGNING).map(KeyPair::EcdsaP384)
    }

    /// Generate a new Ed25519 key pair
    pub fn generate_ed25519() -> Result<Self> {
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&SystemRandom::new())
            .map_err(|_| Error::KeyGeneration("Ed25519 key generation failed".to_string()))?;
        Ok(KeyPair::Ed25519(Ed25519KeyPair::from_pkcs8(pkcs8.as_ref())?))
    }

    /// Generate a key pair for `scheme`
    pub fn generate(scheme: SigningScheme) -> Result<Self> {
        match scheme {
            SigningScheme::EcdsaP256Sha256 => Self::generate_ecdsa_p256(),
            SigningScheme::EcdsaP384Sha384 => Self::generate_ecdsa_p384(),
            SigningScheme::Ed25519 => Self::generate_ed25519(),
        }
    }

    /// Raw public key: uncompressed SEC1 point for ECDSA, 32 bytes for Ed25519
    pub fn public_key_bytes(&self) -> &[u8] {
        match self {
            KeyPair::EcdsaP256(kp) | KeyPair::EcdsaP384(kp) => kp.public_key().as_ref(),
            KeyPair::Ed25519(kp) => kp.public_key().as_ref(),
        }
    }

    /// Sign `data`, returning the signature bytes carried in a signature line
    pub fn sign(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            KeyPair::EcdsaP256(kp) | KeyPair::EcdsaP384(kp) => kp
                .sign(&SystemRandom::new(), data)
                .map(|sig| sig.as_ref().to_vec())
                .map_err(|_| Error::Signing("ECDSA signing failed".to_string())),
            KeyPair::Ed25519(kp) => Ok(kp.sign(data).as_ref().to_vec()),
        }
    }

    /// The scheme signatures from this key use
    pub fn default_scheme(&self) -> SigningScheme {
        match self {
            KeyPair::EcdsaP256(_) => SigningScheme::EcdsaP256Sha256,
            KeyPair::EcdsaP384(_) => SigningScheme::EcdsaP384Sha384,
            KeyPair::Ed25519(_) => SigningScheme::Ed25519,
        }
    }

    /// DER-encoded SubjectPublicKeyInfo of the public key
    pub fn public_key_to_der(&self) -> Result<Vec<u8>> {
        let (algorithm, curve) = match self {
            KeyPair::EcdsaP256(_) => (ID_EC_PUBLIC_KEY, Some(SECP_256_R_1)),
            KeyPair::EcdsaP384(_) => (ID_EC_PUBLIC_KEY, Some(SECP_384_R_1)),
            KeyPair::Ed25519(_) => (ID_ED25519, None),
        };
        encode_spki(algorithm, curve, self.public_key_bytes())
    }

    /// PEM `PUBLIC KEY` block of the public key
    pub fn public_key_to_pem(&self) -> Result<String> {
        let der = self.public_key_to_der()?;
        Ok(pem::encode(&pem::Pem::new("PUBLIC KEY", der)))
    }
}

fn generate_ecdsa(algorithm: &'static EcdsaSigningAlgorithm) -> Result<EcdsaKeyPair> {
    let pkcs8 = EcdsaKeyPair::generate_pkcs8(algorithm, &SystemRandom::new())
        .map_err(|_| Error::KeyGeneration("ECDSA key generation failed".to_string()))?;
    Ok(EcdsaKeyPair::from_pkcs8(algorithm, pkcs8.as_ref())?)
}

fn encode_spki(
    algorithm: ObjectIdentifier,
    curve: Option<ObjectIdentifier>,
    public_key: &[u8],
) -> Result<Vec<u8>> {
    let parameters = curve
        .map(|oid| der::Any::encode_from(&oid))
        .transpose()
        .map_err(|e| Error::Der(e.to_string()))?;

    let spki = SubjectPublicKeyInfoOwned {
        algorithm: AlgorithmIdentifierOwned {
            oid: algorithm,
            parameters,
        },
        subject_public_key: BitString::from_bytes(public_key)
            .map_err(|e| Error::Der(e.to_string()))?,
    };

    spki.to_der().map_err(|e| Error::Der(e.to_string()))
}
