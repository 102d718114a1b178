//! AES-CBC message encryption built on [`aes_core`].
//!
//! Messages are PKCS#7 padded, chained under a fresh random IV and shipped as an
//! [`Envelope`] (`IV || ciphertext`), optionally base64 encoded for text channels.
//! Keys come either from raw bytes or from a password via PBKDF2-HMAC-SHA-256.
//!
//! ```
//! use aes_cbc::{decrypt, derive_key, encrypt, generate_salt, KeySize};
//!
//! let salt = generate_salt();
//! let key = derive_key("my_secure_password", &salt, KeySize::Aes256);
//! let envelope = encrypt(b"Hello, AES encryption!", &key);
//! assert_eq!(decrypt(&envelope, &key).unwrap(), b"Hello, AES encryption!");
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod cbc;
mod envelope;
mod error;
pub mod kdf;
pub mod padding;

pub use aes_core::{AesKey, Block, KeySize, BLOCK_SIZE};

pub use crate::cbc::Cbc;
pub use crate::envelope::Envelope;
pub use crate::error::{Error, Result};
pub use crate::kdf::{derive_key, derive_key_with_params, generate_salt, KdfParams};

/// Encrypts `plaintext` under `key`, returning the envelope bytes.
pub fn encrypt(plaintext: &[u8], key: &AesKey) -> Vec<u8> {
    Cbc::new(key).encrypt(plaintext).to_bytes()
}

/// Decrypts envelope bytes produced by [`encrypt`].
pub fn decrypt(envelope: &[u8], key: &AesKey) -> Result<Vec<u8>> {
    let envelope = Envelope::from_bytes(envelope)?;
    Cbc::new(key).decrypt(&envelope)
}

/// Encrypts `plaintext` and base64 encodes the envelope.
pub fn encrypt_base64(plaintext: &[u8], key: &AesKey) -> String {
    Cbc::new(key).encrypt(plaintext).to_base64()
}

/// Decrypts a base64 envelope produced by [`encrypt_base64`].
pub fn decrypt_base64(text: &str, key: &AesKey) -> Result<Vec<u8>> {
    let envelope = Envelope::from_base64(text)?;
    Cbc::new(key).decrypt(&envelope)
}

/// Stateless entry point for external measurement harnesses.
///
/// A single 16-byte input is encrypted as one raw block; anything else is CBC
/// encrypted and returned as envelope bytes. Every call expands the key afresh and
/// keeps nothing afterwards.
pub fn encrypt_block_or_message(key: &AesKey, input: &[u8]) -> Vec<u8> {
    match <&Block>::try_from(input) {
        Ok(block) => aes_core::Aes::new(key).encrypt_block(block).to_vec(),
        Err(_) => encrypt(input, key),
    }
}
