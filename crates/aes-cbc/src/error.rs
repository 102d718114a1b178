//! Error taxonomy for the mode layer and codec boundary.

use thiserror::Error;

/// Failures surfaced by encryption, decryption, decoding and key derivation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Key material was not 16, 24 or 32 bytes.
    #[error("invalid key length: {0} bytes (expected 16, 24 or 32)")]
    InvalidKeyLength(usize),
    /// Ciphertext (excluding the IV) was not a positive multiple of 16 bytes.
    #[error("ciphertext length {0} is not a positive multiple of 16")]
    InvalidBlockAlignment(usize),
    /// The final block did not carry valid PKCS#7 padding.
    #[error("invalid padding")]
    InvalidPadding,
    /// Envelope shorter than an IV plus one block.
    #[error("malformed envelope: {0} bytes, need at least 32")]
    MalformedEnvelope(usize),
    /// Key text was not valid hexadecimal.
    #[error("invalid hex encoding")]
    InvalidHex,
    /// Envelope text was not valid base64.
    #[error("invalid base64 encoding")]
    InvalidBase64,
    /// PBKDF2 iteration count below the accepted floor.
    #[error("iteration count {0} is below the minimum of {min}", min = crate::kdf::MIN_ITERATIONS)]
    InsufficientIterations(u32),
}

impl From<aes_core::Error> for Error {
    fn from(err: aes_core::Error) -> Self {
        match err {
            aes_core::Error::InvalidKeyLength(len) => Self::InvalidKeyLength(len),
            aes_core::Error::InvalidHex(_) => Self::InvalidHex,
        }
    }
}

impl From<base64::DecodeError> for Error {
    fn from(_: base64::DecodeError) -> Self {
        Self::InvalidBase64
    }
}

/// Result alias for this crate.
pub type Result<T> = core::result::Result<T, Error>;
