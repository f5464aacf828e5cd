//! Error types for tlog-crypto

use thiserror::Error;
use tlog_types::ErrorKind;

/// Errors that can occur in cryptographic operations
#[derive(Error, Debug)]
pub enum Error {
    /// Key generation error
    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    /// Signing error
    #[error("Signing error: {0}")]
    Signing(String),

    /// A signature did not verify under the key it was checked against
    #[error("Verification error: {0}")]
    Verification(String),

    /// No acceptable signature on a checkpoint
    #[error("Untrusted checkpoint: {0}")]
    UntrustedCheckpoint(String),

    /// Invalid key format
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// Unsupported algorithm
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// PEM encoding/decoding error
    #[error("PEM error: {0}")]
    Pem(String),

    /// DER encoding/decoding error
    #[error("DER error: {0}")]
    Der(String),

    /// Base64 error
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Trusted key configuration could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Checkpoint parsing error
    #[error(transparent)]
    Types(#[from] tlog_types::Error),

    /// AWS-LC-RS error
    #[error("Crypto error: {0}")]
    AwsLc(String),
}

impl Error {
    /// The verdict category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Verification(_) | Error::UntrustedCheckpoint(_) => {
                ErrorKind::UntrustedCheckpoint
            }
            Error::Types(e) => e.kind(),
            _ => ErrorKind::InvalidInput,
        }
    }
}

impl From<aws_lc_rs::error::Unspecified> for Error {
    fn from(_: aws_lc_rs::error::Unspecified) -> Self {
        Error::AwsLc("unspecified error".to_string())
    }
}

impl From<aws_lc_rs::error::KeyRejected> for Error {
    fn from(e: aws_lc_rs::error::KeyRejected) -> Self {
        Error::InvalidKeyFormat(e.to_string())
    }
}

/// Result type for cryptographic operations
pub type Result<T> = std::result::Result<T, Error>;
