//! PKCS#7 padding to the AES block size.
//!
//! Padding always appends between 1 and 16 bytes, each holding the pad length, so an
//! already aligned message grows by a whole block. Removal inspects every byte of the
//! final block with constant-time primitives and reports a single undifferentiated
//! [`Error::InvalidPadding`].

use aes_core::BLOCK_SIZE;
use subtle::{Choice, ConstantTimeEq, ConstantTimeGreater, ConstantTimeLess};

use crate::error::{Error, Result};

/// Number of pad bytes `pad` would append to a message of `len` bytes.
#[inline]
pub fn pad_len(len: usize) -> usize {
    BLOCK_SIZE - (len % BLOCK_SIZE)
}

/// Returns `data` extended with PKCS#7 padding.
pub fn pad(data: &[u8]) -> Vec<u8> {
    let n = pad_len(data.len());
    let mut out = Vec::with_capacity(data.len() + n);
    out.extend_from_slice(data);
    out.resize(data.len() + n, n as u8);
    out
}

/// Strips PKCS#7 padding, returning the message prefix.
pub fn unpad(data: &[u8]) -> Result<&[u8]> {
    if data.is_empty() || data.len() % BLOCK_SIZE != 0 {
        return Err(Error::InvalidBlockAlignment(data.len()));
    }
    let last = &data[data.len() - BLOCK_SIZE..];
    let n = last[BLOCK_SIZE - 1];

    let mut valid: Choice = n.ct_gt(&0) & !n.ct_gt(&(BLOCK_SIZE as u8));
    for (offset, byte) in last.iter().rev().enumerate() {
        let in_pad = (offset as u8).ct_lt(&n);
        valid &= !in_pad | byte.ct_eq(&n);
    }

    if bool::from(valid) {
        Ok(&data[..data.len() - usize::from(n)])
    } else {
        Err(Error::InvalidPadding)
    }
}
