//! AES block cipher core shared across the workspace.
//!
//! This crate mirrors the FIPS-197 specification and provides:
//! - GF(2^8) arithmetic and the S-boxes derived from it.
//! - Key schedules for AES-128, AES-192 and AES-256.
//! - Single-block encryption and decryption, plus the [`Aes`] session type.
//!
//! The implementation aims for clarity and testability rather than constant-time
//! guarantees; table lookups are indexed by secret data.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod block;
mod cipher;
mod error;
pub mod gf;
mod key;
pub mod round;
mod sbox;

pub use crate::block::{xor_in_place, Block, BLOCK_SIZE};
pub use crate::cipher::{decrypt_block, encrypt_block, expand_key, Aes};
pub use crate::error::{Error, Result};
pub use crate::key::{AesKey, KeySize, RoundKeys, MAX_ROUNDS};
pub use crate::sbox::{inv_sbox, sbox, INV_SBOX, SBOX};
