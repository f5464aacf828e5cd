//! Checkpoint signature tests against production data
//!
//! The Rekor checkpoint below was served by rekor.sigstore.dev alongside the
//! inclusion proof for log index 44238954, and is signed with the public
//! Rekor production key.

use base64::Engine;
use rstest::rstest;
use tlog_crypto::{
    sign_checkpoint, verify_checkpoint_signature, Error, KeyPair, SignaturePolicy, SigningScheme,
    TrustedKey, TrustedKeys,
};
use tlog_types::{parse_checkpoint, ErrorKind, Sha256Hash};

const REKOR_PUBLIC_KEY: &str = "-----BEGIN PUBLIC KEY-----
MFkwEwYHKoZIzj0CAQYIKoZIzj0DAQcDQgAE2G2Y+2tabdTV5BcGiBIx0a9fAFwr
kBbmLSGtks4L3qX6yYY0zufBnhC8Ur/iy55GhWP/9A/bY2LhC30M9+RYtw==
-----END PUBLIC KEY-----
";

const REKOR_CHECKPOINT: &str = "rekor.sigstore.dev - 1193050959916656506
44238955
TiowMOu0x46fW4pXrRyW7TeVb6f1/VDnDZWcP1xL/HU=

\u{2014} rekor.sigstore.dev wNI9ajBEAiBF3lyT0Jg0paKCvqJQ0t97+hcneAqZHeiRuLinOba/YQIgG65ZKAhE+byLy+VQ4/14FwvJG0FMhq4CNoDONpzvOMc=
";

fn rekor_keys() -> TrustedKeys {
    TrustedKeys::new().with_key(TrustedKey::from_pem("rekor.sigstore.dev", REKOR_PUBLIC_KEY).unwrap())
}

#[test]
fn test_rekor_key_hint() {
    let key = TrustedKey::from_pem("rekor.sigstore.dev", REKOR_PUBLIC_KEY).unwrap();
    assert_eq!(key.scheme(), SigningScheme::EcdsaP256Sha256);
    // First four bytes of the Rekor log ID
    assert_eq!(key.key_hint().to_hex(), "c0d23d6a");
}

#[test]
fn test_rekor_checkpoint_verifies() {
    let checkpoint = parse_checkpoint(REKOR_CHECKPOINT).unwrap();
    assert_eq!(checkpoint.origin(), "rekor.sigstore.dev - 1193050959916656506");
    assert_eq!(checkpoint.tree_size(), 44238955);

    verify_checkpoint_signature(&checkpoint, &rekor_keys(), SignaturePolicy::AtLeastOne).unwrap();
    verify_checkpoint_signature(&checkpoint, &rekor_keys(), SignaturePolicy::AllKnown).unwrap();
}

#[rstest]
#[case::size("\n44238955\n", "\n44238956\n")]
#[case::origin("1193050959916656506", "1193050959916656507")]
#[case::root("TiowMOu0", "TiowMOu1")]
fn test_rekor_checkpoint_tampered(#[case] from: &str, #[case] to: &str) {
    let tampered = REKOR_CHECKPOINT.replacen(from, to, 1);
    let checkpoint = parse_checkpoint(&tampered).unwrap();

    let err = verify_checkpoint_signature(&checkpoint, &rekor_keys(), SignaturePolicy::AtLeastOne)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UntrustedCheckpoint);
}

#[test]
fn test_rekor_checkpoint_with_wrong_key() {
    let checkpoint = parse_checkpoint(REKOR_CHECKPOINT).unwrap();
    let impostor = KeyPair::generate_ecdsa_p256().unwrap();
    let keys =
        TrustedKeys::new().with_key(TrustedKey::from_key_pair("rekor.sigstore.dev", &impostor).unwrap());

    let err = verify_checkpoint_signature(&checkpoint, &keys, SignaturePolicy::AtLeastOne)
        .unwrap_err();
    assert!(matches!(err, Error::UntrustedCheckpoint(_)));
}

#[test]
fn test_rekor_trusted_keys_from_json() {
    let json = serde_json::json!({
        "keys": [{"name": "rekor.sigstore.dev", "publicKey": REKOR_PUBLIC_KEY}]
    })
    .to_string();
    let keys = TrustedKeys::from_json(&json).unwrap();
    let checkpoint = parse_checkpoint(REKOR_CHECKPOINT).unwrap();
    verify_checkpoint_signature(&checkpoint, &keys, SignaturePolicy::default()).unwrap();
}

#[test]
fn test_signed_note_ed25519_vector() {
    // Example note from the Go signed-note package documentation
    let key = TrustedKey::from_verifier_key(
        "PeterNeumann+c74f20a3+ARpc2QcUPDhMQegwxbzhKqiBfsVkmqq/LDE4izWy10TW",
    )
    .unwrap();
    let message = b"If you think cryptography is the answer to your problem,\n\
                    then you don't know what your problem is.\n";
    let payload = base64::engine::general_purpose::STANDARD
        .decode("x08go/ZJkuBS9UG/SffcvIAQxVBtiFupLLr8pAcElZInNIuGUgYN1FFYC2pZSNXgKvqfqdngotpRZb6KE6RyyBwJnAM=")
        .unwrap();

    assert_eq!(&payload[..4], key.key_hint().as_bytes());
    key.verify(message, &payload[4..]).unwrap();
    assert!(key.verify(b"something else\n", &payload[4..]).is_err());
}

#[rstest]
fn test_sign_and_verify_all_schemes(
    #[values(
        SigningScheme::EcdsaP256Sha256,
        SigningScheme::EcdsaP384Sha384,
        SigningScheme::Ed25519
    )]
    scheme: SigningScheme,
) {
    let kp = KeyPair::generate(scheme).unwrap();
    let root = Sha256Hash::from_bytes([0xab; 32]);
    let checkpoint = sign_checkpoint("log.example", 99, &root, &[], &[("log.example", &kp)]).unwrap();

    let keys = TrustedKeys::new().with_key(TrustedKey::from_key_pair("log.example", &kp).unwrap());
    verify_checkpoint_signature(&checkpoint, &keys, SignaturePolicy::AllKnown).unwrap();

    // Round trip through text keeps the signature valid
    let reparsed = parse_checkpoint(&checkpoint.to_text()).unwrap();
    verify_checkpoint_signature(&reparsed, &keys, SignaturePolicy::AllKnown).unwrap();
}
