//! Property-based tests for the block cipher and the CBC message layer.

use aes_cbc::padding::{pad, unpad};
use aes_cbc::{decrypt, encrypt, AesKey, Cbc, Envelope, Error, KeySize};
use aes_core::Aes;
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = AesKey> {
    prop_oneof![
        any::<[u8; 16]>().prop_map(AesKey::from),
        any::<[u8; 24]>().prop_map(AesKey::from),
        any::<[u8; 32]>().prop_map(AesKey::from),
    ]
}

proptest! {
    #[test]
    fn block_round_trip(key in key_strategy(), block in any::<[u8; 16]>()) {
        let cipher = Aes::new(&key);
        prop_assert_eq!(cipher.decrypt_block(&cipher.encrypt_block(&block)), block);
    }

    #[test]
    fn message_round_trip(key in key_strategy(), message in prop::collection::vec(any::<u8>(), 0..=200)) {
        let envelope = encrypt(&message, &key);
        prop_assert_eq!(envelope.len() % 16, 0);
        prop_assert!(envelope.len() >= 32);
        prop_assert_eq!(decrypt(&envelope, &key).unwrap(), message);
    }

    #[test]
    fn padding_always_adds_one_to_sixteen_bytes(message in prop::collection::vec(any::<u8>(), 0..=100)) {
        let padded = pad(&message);
        let added = padded.len() - message.len();
        prop_assert!((1..=16).contains(&added));
        prop_assert_eq!(padded.len() % 16, 0);
        prop_assert_eq!(unpad(&padded).unwrap(), message.as_slice());
    }

    #[test]
    fn tampering_never_reproduces_plaintext(
        key in key_strategy(),
        message in prop::collection::vec(any::<u8>(), 1..=64),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let cbc = Cbc::new(&key);
        let envelope = cbc.encrypt(&message);
        let mut bytes = envelope.to_bytes();
        // Skip the IV so the flip lands in a cipher block.
        let target = 16 + position.index(bytes.len() - 16);
        bytes[target] ^= 1 << bit;

        let tampered = Envelope::from_bytes(&bytes).unwrap();
        match cbc.decrypt(&tampered) {
            Ok(plaintext) => prop_assert_ne!(plaintext, message),
            Err(err) => prop_assert_eq!(err, Error::InvalidPadding),
        }
    }
}

#[test]
fn identical_messages_get_distinct_envelopes() {
    for size in KeySize::ALL {
        let key = AesKey::new(&vec![0x5cu8; size.bytes()]).unwrap();
        let first = encrypt(b"fixed message", &key);
        let second = encrypt(b"fixed message", &key);
        assert_ne!(first, second);
        assert_ne!(first[..16], second[..16]);
    }
}
