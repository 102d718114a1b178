//! Key types for AES-128/192/256.

use core::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::block::Block;
use crate::error::{Error, Result};

/// Largest number of rounds (AES-256).
pub const MAX_ROUNDS: usize = 14;

/// Supported AES key sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeySize {
    /// 128-bit key, 10 rounds.
    Aes128,
    /// 192-bit key, 12 rounds.
    Aes192,
    /// 256-bit key, 14 rounds.
    Aes256,
}

impl KeySize {
    /// All sizes, smallest first.
    pub const ALL: [KeySize; 3] = [KeySize::Aes128, KeySize::Aes192, KeySize::Aes256];

    /// Maps a byte length to a key size.
    pub fn from_len(len: usize) -> Result<Self> {
        match len {
            16 => Ok(Self::Aes128),
            24 => Ok(Self::Aes192),
            32 => Ok(Self::Aes256),
            other => Err(Error::InvalidKeyLength(other)),
        }
    }

    /// Key length in bytes.
    pub const fn bytes(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }

    /// Key length in bits.
    pub const fn bits(self) -> usize {
        self.bytes() * 8
    }

    /// Key length in 32-bit words (`Nk`).
    pub const fn words(self) -> usize {
        self.bytes() / 4
    }

    /// Number of cipher rounds (`Nr`).
    pub const fn rounds(self) -> usize {
        self.words() + 6
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AES-{}", self.bits())
    }
}

/// AES key of 16, 24 or 32 bytes. Cleared on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AesKey {
    bytes: [u8; 32],
    #[zeroize(skip)]
    size: KeySize,
}

impl AesKey {
    /// Builds a key from raw bytes, rejecting lengths other than 16/24/32.
    pub fn new(bytes: &[u8]) -> Result<Self> {
        let size = KeySize::from_len(bytes.len())?;
        let mut buf = [0u8; 32];
        buf[..bytes.len()].copy_from_slice(bytes);
        Ok(Self { bytes: buf, size })
    }

    /// Builds a key of `size` whose bytes are written by `fill`.
    pub fn from_fill(size: KeySize, fill: impl FnOnce(&mut [u8])) -> Self {
        let mut bytes = [0u8; 32];
        fill(&mut bytes[..size.bytes()]);
        Self { bytes, size }
    }

    /// Parses the persisted form: lowercase (or uppercase) hex, surrounding whitespace ignored.
    pub fn from_hex(text: &str) -> Result<Self> {
        let mut bytes = hex::decode(text.trim())?;
        let key = Self::new(&bytes);
        bytes.zeroize();
        key
    }

    /// Lowercase hex, two characters per byte, no separators.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// Key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.size.bytes()]
    }

    /// Key size.
    pub fn size(&self) -> KeySize {
        self.size
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AesKey")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl From<[u8; 16]> for AesKey {
    fn from(value: [u8; 16]) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&value);
        Self {
            bytes,
            size: KeySize::Aes128,
        }
    }
}

impl From<[u8; 24]> for AesKey {
    fn from(value: [u8; 24]) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..24].copy_from_slice(&value);
        Self {
            bytes,
            size: KeySize::Aes192,
        }
    }
}

impl From<[u8; 32]> for AesKey {
    fn from(value: [u8; 32]) -> Self {
        Self {
            bytes: value,
            size: KeySize::Aes256,
        }
    }
}

/// Expanded round keys: `rounds + 1` blocks are in use. Cleared on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct RoundKeys {
    keys: [Block; MAX_ROUNDS + 1],
    rounds: usize,
}

impl RoundKeys {
    pub(crate) fn new(keys: [Block; MAX_ROUNDS + 1], rounds: usize) -> Self {
        Self { keys, rounds }
    }

    /// Returns the round key at the requested index (`0..=rounds`).
    #[inline]
    pub fn get(&self, round: usize) -> &Block {
        debug_assert!(round <= self.rounds);
        &self.keys[round]
    }

    /// Number of cipher rounds these keys drive.
    #[inline]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// The round keys in use, first to last.
    pub fn as_slice(&self) -> &[Block] {
        &self.keys[..=self.rounds]
    }
}

impl fmt::Debug for RoundKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundKeys")
            .field("rounds", &self.rounds)
            .finish_non_exhaustive()
    }
}
