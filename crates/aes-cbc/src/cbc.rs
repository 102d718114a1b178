//! Cipher Block Chaining over an [`Aes`] session.
//!
//! Encryption is strictly sequential (`C_i = E(P_i ^ C_{i-1})`). Decryption of each block
//! needs only the previous ciphertext block, so it is written as an independent
//! computation over ciphertext windows.

use aes_core::{xor_in_place, Aes, AesKey, Block, KeySize, BLOCK_SIZE};
use log::debug;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::envelope::Envelope;
use crate::error::{Error, Result};
use crate::padding::{pad, unpad};

/// CBC session. Holds the expanded key schedule for its lifetime.
#[derive(Clone, Debug)]
pub struct Cbc {
    cipher: Aes,
}

impl Cbc {
    /// Expands `key` into a new session.
    pub fn new(key: &AesKey) -> Self {
        debug!("initialising {} CBC session", key.size());
        Self {
            cipher: Aes::new(key),
        }
    }

    /// Key size of this session.
    pub fn key_size(&self) -> KeySize {
        self.cipher.key_size()
    }

    /// Pads and encrypts `plaintext` under a fresh IV from the OS CSPRNG.
    pub fn encrypt(&self, plaintext: &[u8]) -> Envelope {
        self.encrypt_with_rng(plaintext, &mut OsRng)
    }

    /// Pads and encrypts `plaintext` under a fresh IV drawn from `rng`.
    pub fn encrypt_with_rng<R: RngCore + CryptoRng>(&self, plaintext: &[u8], rng: &mut R) -> Envelope {
        let mut iv = [0u8; BLOCK_SIZE];
        rng.fill_bytes(&mut iv);
        let mut data = pad(plaintext);
        chain_encrypt(&self.cipher, &iv, &mut data);
        Envelope::new(iv, data)
    }

    /// Decrypts an envelope and strips its padding.
    pub fn decrypt(&self, envelope: &Envelope) -> Result<Vec<u8>> {
        let mut data = self.decrypt_blocks(envelope.iv(), envelope.ciphertext())?;
        let len = unpad(&data)?.len();
        data.truncate(len);
        Ok(data)
    }

    /// Raw chaining of block-aligned `data` under `iv`, no padding.
    pub fn encrypt_blocks(&self, iv: &Block, data: &[u8]) -> Result<Vec<u8>> {
        check_alignment(data)?;
        let mut out = data.to_vec();
        chain_encrypt(&self.cipher, iv, &mut out);
        Ok(out)
    }

    /// Raw inverse chaining of block-aligned `data` under `iv`, no padding removal.
    pub fn decrypt_blocks(&self, iv: &Block, data: &[u8]) -> Result<Vec<u8>> {
        check_alignment(data)?;
        let mut out = Vec::with_capacity(data.len());
        let previous = core::iter::once(&iv[..]).chain(data.chunks_exact(BLOCK_SIZE));
        for (prev, current) in previous.zip(data.chunks_exact(BLOCK_SIZE)) {
            let mut block = self.cipher.decrypt_block(&to_block(current));
            xor_in_place(&mut block, &to_block(prev));
            out.extend_from_slice(&block);
        }
        Ok(out)
    }
}

fn chain_encrypt(cipher: &Aes, iv: &Block, data: &mut [u8]) {
    let mut prev = *iv;
    for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
        let mut block = to_block(chunk);
        xor_in_place(&mut block, &prev);
        prev = cipher.encrypt_block(&block);
        chunk.copy_from_slice(&prev);
    }
}

fn check_alignment(data: &[u8]) -> Result<()> {
    if data.is_empty() || data.len() % BLOCK_SIZE != 0 {
        return Err(Error::InvalidBlockAlignment(data.len()));
    }
    Ok(())
}

fn to_block(chunk: &[u8]) -> Block {
    let mut block = [0u8; BLOCK_SIZE];
    block.copy_from_slice(chunk);
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const SP800_38A_KEY: &str = "2b7e151628aed2a6abf7158809cf4f3c";
    const SP800_38A_IV: &str = "000102030405060708090a0b0c0d0e0f";
    const SP800_38A_PLAIN: &str = concat!(
        "6bc1bee22e409f96e93d7e117393172a",
        "ae2d8a571e03ac9c9eb76fac45af8e51",
        "30c81c46a35ce411e5fbc1191a0a52ef",
        "f69f2445df4f9b17ad2b417be66c3710",
    );
    const SP800_38A_CIPHER: &str = concat!(
        "7649abac8119b246cee98e9b12e9197d",
        "5086cb9b507219ee95db113a917678b2",
        "73bed6b8e3c1743b7116e69e22229516",
        "3ff1caa1681fac09120eca307586e1a7",
    );

    fn vector_session() -> (Cbc, Block) {
        let key = AesKey::from_hex(SP800_38A_KEY).expect("key");
        let mut iv = [0u8; 16];
        hex::decode_to_slice(SP800_38A_IV, &mut iv).expect("iv");
        (Cbc::new(&key), iv)
    }

    #[test]
    fn raw_chaining_matches_sp800_38a_encrypt() {
        let (cbc, iv) = vector_session();
        let plain = hex::decode(SP800_38A_PLAIN).expect("plain");
        let ct = cbc.encrypt_blocks(&iv, &plain).expect("aligned");
        assert_eq!(hex::encode(ct), SP800_38A_CIPHER);
    }

    #[test]
    fn raw_chaining_matches_sp800_38a_decrypt() {
        let (cbc, iv) = vector_session();
        let ct = hex::decode(SP800_38A_CIPHER).expect("cipher");
        let pt = cbc.decrypt_blocks(&iv, &ct).expect("aligned");
        assert_eq!(hex::encode(pt), SP800_38A_PLAIN);
    }

    #[test]
    fn round_trip_all_sizes_and_lengths() {
        let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
        for size in KeySize::ALL {
            let key = AesKey::from_fill(size, |buf| rng.fill_bytes(buf));
            let cbc = Cbc::new(&key);
            for len in [0usize, 1, 15, 16, 17, 31, 32, 100] {
                let mut message = vec![0u8; len];
                rng.fill_bytes(&mut message);
                let envelope = cbc.encrypt_with_rng(&message, &mut rng);
                assert_eq!(envelope.ciphertext().len(), (len / 16 + 1) * 16);
                assert_eq!(cbc.decrypt(&envelope).expect("decrypt"), message);
            }
        }
    }

    #[test]
    fn fresh_iv_per_message() {
        let cbc = Cbc::new(&AesKey::from([0x42u8; 16]));
        let first = cbc.encrypt(b"same message");
        let second = cbc.encrypt(b"same message");
        assert_ne!(first.iv(), second.iv());
        assert_ne!(first.to_bytes(), second.to_bytes());
    }

    #[test]
    fn wrong_key_does_not_recover_plaintext() {
        let envelope = Cbc::new(&AesKey::from([1u8; 16])).encrypt(b"secret");
        match Cbc::new(&AesKey::from([2u8; 16])).decrypt(&envelope) {
            Ok(pt) => assert_ne!(pt, b"secret"),
            Err(err) => assert_eq!(err, Error::InvalidPadding),
        }
    }

    #[test]
    fn bit_flip_diffuses_into_affected_block() {
        let mut rng = ChaCha20Rng::from_seed([5u8; 32]);
        let cbc = Cbc::new(&AesKey::from([7u8; 32]));
        let message = [0x61u8; 64];
        let envelope = cbc.encrypt_with_rng(&message, &mut rng);
        let iv = *envelope.iv();
        let original = envelope.ciphertext().to_vec();

        for block in 0..original.len() / 16 {
            let mut tampered = original.clone();
            tampered[block * 16 + 3] ^= 0x01;
            let pt = cbc.decrypt_blocks(&iv, &tampered).expect("aligned");
            let reference = cbc.decrypt_blocks(&iv, &original).expect("aligned");
            assert_ne!(pt[block * 16..(block + 1) * 16], reference[block * 16..(block + 1) * 16]);
            assert_ne!(pt, reference);
            match unpad(&pt) {
                Ok(recovered) => assert_ne!(recovered, &message[..]),
                Err(err) => assert_eq!(err, Error::InvalidPadding),
            }
        }
    }

    #[test]
    fn raw_chaining_rejects_misaligned_data() {
        let (cbc, iv) = vector_session();
        assert_eq!(
            cbc.encrypt_blocks(&iv, &[0u8; 17]),
            Err(Error::InvalidBlockAlignment(17))
        );
        assert_eq!(
            cbc.decrypt_blocks(&iv, &[]),
            Err(Error::InvalidBlockAlignment(0))
        );
    }
}
