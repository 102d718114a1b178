//! Errors raised while building keys.

use thiserror::Error;

/// Key construction failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Key material was not 16, 24 or 32 bytes.
    #[error("invalid key length: {0} bytes (expected 16, 24 or 32)")]
    InvalidKeyLength(usize),
    /// Key text was not valid hexadecimal.
    #[error("invalid key hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Result alias for key operations.
pub type Result<T> = core::result::Result<T, Error>;
