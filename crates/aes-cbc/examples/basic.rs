//! Derives a key from a password, encrypts a message to base64 and decrypts it back.

use aes_cbc::{decrypt_base64, derive_key, encrypt_base64, generate_salt, KeySize};

fn main() {
    let password = "my_secure_password";
    let salt = generate_salt();
    let key = derive_key(password, &salt, KeySize::Aes256);

    let encrypted = encrypt_base64(b"Hello, AES encryption!", &key);
    println!("Encrypted: {encrypted}");

    let decrypted = decrypt_base64(&encrypted, &key).expect("round trip under the same key");
    println!("Decrypted: {}", String::from_utf8_lossy(&decrypted));
}
