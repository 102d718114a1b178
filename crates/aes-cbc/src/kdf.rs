//! Password-based key derivation (PBKDF2-HMAC-SHA-256).

use aes_core::{AesKey, KeySize};
use hmac::Hmac;
use log::debug;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use sha2::Sha256;

use crate::error::{Error, Result};

/// Iteration count used by [`derive_key`].
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Lowest iteration count [`KdfParams`] accepts.
pub const MIN_ITERATIONS: u32 = 100_000;

/// Recommended salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derivation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KdfParams {
    /// PBKDF2 iteration count.
    pub iterations: u32,
    /// Size of the derived key.
    pub key_size: KeySize,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            key_size: KeySize::Aes256,
        }
    }
}

impl KdfParams {
    /// Default iteration count with the given key size.
    pub fn with_key_size(key_size: KeySize) -> Self {
        Self {
            key_size,
            ..Self::default()
        }
    }

    /// Checks the iteration floor.
    pub fn validate(&self) -> Result<()> {
        if self.iterations < MIN_ITERATIONS {
            return Err(Error::InsufficientIterations(self.iterations));
        }
        Ok(())
    }
}

/// Derives a key of `key_size` from `password` and `salt` with [`DEFAULT_ITERATIONS`].
pub fn derive_key(password: &str, salt: &[u8], key_size: KeySize) -> AesKey {
    let params = KdfParams::with_key_size(key_size);
    pbkdf2_key(password.as_bytes(), salt, params.iterations, params.key_size)
}

/// Derives a key with explicit parameters.
pub fn derive_key_with_params(password: &str, salt: &[u8], params: &KdfParams) -> Result<AesKey> {
    params.validate()?;
    Ok(pbkdf2_key(
        password.as_bytes(),
        salt,
        params.iterations,
        params.key_size,
    ))
}

/// Fresh salt from the operating system's CSPRNG.
pub fn generate_salt() -> [u8; SALT_LEN] {
    generate_salt_with(&mut OsRng)
}

/// Fresh salt from a caller-provided CSPRNG.
pub fn generate_salt_with<R: RngCore + CryptoRng>(rng: &mut R) -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rng.fill_bytes(&mut salt);
    salt
}

fn pbkdf2_key(password: &[u8], salt: &[u8], iterations: u32, key_size: KeySize) -> AesKey {
    debug!(
        "deriving {} key with {} iterations over {}-byte salt",
        key_size,
        iterations,
        salt.len()
    );
    AesKey::from_fill(key_size, |out| pbkdf2_sha256(password, salt, iterations, out))
}

fn pbkdf2_sha256(password: &[u8], salt: &[u8], iterations: u32, out: &mut [u8]) {
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password, salt, iterations, out);
}
