//! Ciphertext envelope: the IV followed by the cipher blocks.

use aes_core::{Block, BLOCK_SIZE};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{Error, Result};

/// IV-prefixed CBC ciphertext. Always holds at least one cipher block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    iv: Block,
    ciphertext: Vec<u8>,
}

impl Envelope {
    pub(crate) fn new(iv: Block, ciphertext: Vec<u8>) -> Self {
        debug_assert!(!ciphertext.is_empty() && ciphertext.len() % BLOCK_SIZE == 0);
        Self { iv, ciphertext }
    }

    /// Initialization vector.
    pub fn iv(&self) -> &Block {
        &self.iv
    }

    /// Cipher blocks, excluding the IV.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Serialized length in bytes.
    pub fn len(&self) -> usize {
        BLOCK_SIZE + self.ciphertext.len()
    }

    /// Always false: an envelope carries an IV and at least one block.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// `IV || ciphertext`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Splits `IV || ciphertext`, checking the minimum size and block alignment.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 2 * BLOCK_SIZE {
            return Err(Error::MalformedEnvelope(bytes.len()));
        }
        let (iv, ciphertext) = bytes.split_at(BLOCK_SIZE);
        if ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(Error::InvalidBlockAlignment(ciphertext.len()));
        }
        let mut block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(iv);
        Ok(Self::new(block, ciphertext.to_vec()))
    }

    /// Standard padded base64 of [`Envelope::to_bytes`].
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Parses the base64 text form; surrounding whitespace is ignored.
    pub fn from_base64(text: &str) -> Result<Self> {
        let bytes = STANDARD.decode(text.trim())?;
        Self::from_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope::new([0xaa; 16], (0u8..32).collect())
    }

    #[test]
    fn bytes_layout_is_iv_then_ciphertext() {
        let bytes = sample().to_bytes();
        assert_eq!(bytes.len(), 48);
        assert_eq!(&bytes[..16], &[0xaa; 16]);
        assert_eq!(bytes[16], 0);
        assert_eq!(Envelope::from_bytes(&bytes), Ok(sample()));
    }

    #[test]
    fn short_input_is_malformed() {
        assert_eq!(Envelope::from_bytes(&[]), Err(Error::MalformedEnvelope(0)));
        assert_eq!(
            Envelope::from_bytes(&[0u8; 16]),
            Err(Error::MalformedEnvelope(16))
        );
        assert_eq!(
            Envelope::from_bytes(&[0u8; 31]),
            Err(Error::MalformedEnvelope(31))
        );
    }

    #[test]
    fn misaligned_ciphertext_is_rejected() {
        assert_eq!(
            Envelope::from_bytes(&[0u8; 33]),
            Err(Error::InvalidBlockAlignment(17))
        );
        assert_eq!(
            Envelope::from_bytes(&[0u8; 47]),
            Err(Error::InvalidBlockAlignment(31))
        );
    }

    #[test]
    fn base64_text_form() {
        let text = sample().to_base64();
        assert_eq!(text.len(), 64);
        assert_eq!(Envelope::from_base64(&format!("{text}\n")), Ok(sample()));
        assert_eq!(Envelope::from_base64("not base64!"), Err(Error::InvalidBase64));
        assert_eq!(
            Envelope::from_base64("AAAA"),
            Err(Error::MalformedEnvelope(3))
        );
    }
}
