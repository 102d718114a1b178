//! Command-line interface for `aes-cbc-rs`.

#![forbid(unsafe_code)]

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use aes_cbc::kdf::{generate_salt_with, DEFAULT_ITERATIONS};
use aes_cbc::{derive_key_with_params, AesKey, Cbc, Envelope, KdfParams, KeySize};
use aes_core::{decrypt_block, encrypt_block, expand_key, Block};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// AES-CBC CLI.
#[derive(Parser)]
#[command(
    name = "aescbc",
    version,
    author,
    about = "AES-128/192/256 in CBC mode with PKCS#7 padding and PBKDF2 keys"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random key and write it as a hex key file.
    Keygen {
        /// Key size in bits (128, 192 or 256).
        #[arg(long, default_value = "256", value_parser = parse_key_size)]
        size: KeySize,
        /// Output key file.
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
        /// Optional RNG seed for reproducible keys (testing only).
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Derive a key from a password with PBKDF2-HMAC-SHA-256.
    Derive {
        /// Password to stretch.
        #[arg(long)]
        password: String,
        /// Salt as hex; a fresh 16-byte salt is generated when omitted.
        #[arg(long, value_name = "HEX")]
        salt_hex: Option<String>,
        /// Key size in bits (128, 192 or 256).
        #[arg(long, default_value = "256", value_parser = parse_key_size)]
        size: KeySize,
        /// PBKDF2 iteration count.
        #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
        iterations: u32,
        /// Optional key file to write the derived key to.
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Encrypt a message into an IV-prefixed CBC envelope.
    Encrypt {
        /// Hex key file.
        #[arg(long, value_name = "FILE")]
        keyfile: PathBuf,
        /// Plaintext file (stdin when omitted).
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
        /// Envelope output file (stdout when omitted).
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Emit the envelope as base64 text.
        #[arg(long, default_value_t = false)]
        base64: bool,
    },
    /// Decrypt an envelope produced by `encrypt`.
    Decrypt {
        /// Hex key file.
        #[arg(long, value_name = "FILE")]
        keyfile: PathBuf,
        /// Envelope file (stdin when omitted).
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
        /// Plaintext output file (stdout when omitted).
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Read the envelope as base64 text.
        #[arg(long, default_value_t = false)]
        base64: bool,
    },
    /// Encrypt stdin to stdout in a single stateless call (one raw block for 16-byte input).
    Oneshot {
        /// Hex key file.
        #[arg(long, value_name = "FILE", default_value = "keyfile")]
        keyfile: PathBuf,
    },
    /// Run a local demo: derive a key from a password, encrypt a greeting, decrypt back.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Check the cipher against published vectors and random round trips.
    Selftest {
        /// Number of random samples per key size.
        #[arg(long, default_value_t = 16)]
        samples: usize,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Keygen { size, out, seed } => cmd_keygen(size, &out, seed),
        Commands::Derive {
            password,
            salt_hex,
            size,
            iterations,
            out,
        } => cmd_derive(&password, salt_hex.as_deref(), size, iterations, out.as_deref()),
        Commands::Encrypt {
            keyfile,
            input,
            output,
            base64,
        } => cmd_encrypt(&keyfile, input.as_deref(), output.as_deref(), base64),
        Commands::Decrypt {
            keyfile,
            input,
            output,
            base64,
        } => cmd_decrypt(&keyfile, input.as_deref(), output.as_deref(), base64),
        Commands::Oneshot { keyfile } => cmd_oneshot(&keyfile),
        Commands::Demo { seed } => cmd_demo(seed),
        Commands::Selftest { samples, seed } => cmd_selftest(samples, seed),
    }
}

fn cmd_keygen(size: KeySize, out: &Path, seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let key = AesKey::from_fill(size, |buf| rng.fill_bytes(buf));
    write_keyfile(out, &key)?;
    info!("wrote {} key to {}", size, out.display());
    Ok(())
}

fn cmd_derive(
    password: &str,
    salt_hex: Option<&str>,
    size: KeySize,
    iterations: u32,
    out: Option<&Path>,
) -> Result<()> {
    let salt = match salt_hex {
        Some(text) => hex::decode(text.trim()).context("decode salt hex")?,
        None => generate_salt_with(&mut seeded_rng(None)).to_vec(),
    };
    let params = KdfParams {
        iterations,
        key_size: size,
    };
    let key = derive_key_with_params(password, &salt, &params).context("derive key")?;
    println!("salt: {}", hex::encode(&salt));
    println!("key: {}", key.to_hex());
    if let Some(path) = out {
        write_keyfile(path, &key)?;
    }
    Ok(())
}

fn cmd_encrypt(
    keyfile: &Path,
    input: Option<&Path>,
    output: Option<&Path>,
    base64: bool,
) -> Result<()> {
    let key = load_key(keyfile)?;
    let plaintext = read_input(input)?;
    let envelope = Cbc::new(&key).encrypt(&plaintext);
    debug!(
        "encrypted {} bytes into {} byte envelope",
        plaintext.len(),
        envelope.len()
    );
    if base64 {
        let mut text = envelope.to_base64();
        text.push('\n');
        write_output(output, text.as_bytes())
    } else {
        write_output(output, &envelope.to_bytes())
    }
}

fn cmd_decrypt(
    keyfile: &Path,
    input: Option<&Path>,
    output: Option<&Path>,
    base64: bool,
) -> Result<()> {
    let key = load_key(keyfile)?;
    let data = read_input(input)?;
    let decoded = if base64 {
        let text = std::str::from_utf8(&data).context("base64 envelope is not UTF-8")?;
        Envelope::from_base64(text)
    } else {
        Envelope::from_bytes(&data)
    };
    let envelope = decoded.context("decode envelope")?;
    let plaintext = Cbc::new(&key).decrypt(&envelope).context("decrypt envelope")?;
    write_output(output, &plaintext)
}

fn cmd_oneshot(keyfile: &Path) -> Result<()> {
    let key = load_key(keyfile)?;
    let input = read_input(None)?;
    let output = aes_cbc::encrypt_block_or_message(&key, &input);
    write_output(None, &output)
}

fn cmd_demo(seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let password = "my_secure_password";
    let salt = generate_salt_with(&mut rng);
    let key = derive_key_with_params(password, &salt, &KdfParams::default())?;

    let plaintext = "Hello, AES encryption!";
    let encrypted = Cbc::new(&key)
        .encrypt_with_rng(plaintext.as_bytes(), &mut rng)
        .to_base64();
    let decrypted = Cbc::new(&key)
        .decrypt(&Envelope::from_base64(&encrypted)?)
        .context("decrypt demo envelope")?;

    println!("salt: {}", hex::encode(salt));
    println!("key: {}", key.to_hex());
    println!("Encrypted: {}", encrypted);
    println!("Decrypted: {}", String::from_utf8_lossy(&decrypted));
    if decrypted != plaintext.as_bytes() {
        bail!("demo roundtrip failed");
    }
    Ok(())
}

/// (key, plaintext, ciphertext) from FIPS-197 appendices B and C.
const BLOCK_VECTORS: [(&str, &str, &str); 4] = [
    (
        "2b7e151628aed2a6abf7158809cf4f3c",
        "3243f6a8885a308d313198a2e0370734",
        "3925841d02dc09fbdc118597196a0b32",
    ),
    (
        "000102030405060708090a0b0c0d0e0f",
        "00112233445566778899aabbccddeeff",
        "69c4e0d86a7b0430d8cdb78070b4c55a",
    ),
    (
        "000102030405060708090a0b0c0d0e0f1011121314151617",
        "00112233445566778899aabbccddeeff",
        "dda97ca4864cdfe06eaf70a0ec0d7191",
    ),
    (
        "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
        "00112233445566778899aabbccddeeff",
        "8ea2b7ca516745bfeafc49904b496089",
    ),
];

fn cmd_selftest(samples: usize, seed: Option<u64>) -> Result<()> {
    for (key_hex, plain_hex, cipher_hex) in BLOCK_VECTORS {
        let key = parse_key_hex(key_hex)?;
        let round_keys = expand_key(&key);
        let plain = parse_block_hex(plain_hex)?;
        let expected = parse_block_hex(cipher_hex)?;
        if encrypt_block(&plain, &round_keys) != expected {
            bail!("{} known-answer encryption mismatch", key.size());
        }
        if decrypt_block(&expected, &round_keys) != plain {
            bail!("{} known-answer decryption mismatch", key.size());
        }
        println!("{}: known answer ok", key.size());
    }

    let mut rng = seeded_rng(seed);
    for size in KeySize::ALL {
        for _ in 0..samples {
            let key = AesKey::from_fill(size, |buf| rng.fill_bytes(buf));
            let cbc = Cbc::new(&key);
            let len = (rng.next_u32() % 256) as usize;
            let mut message = vec![0u8; len];
            rng.fill_bytes(&mut message);
            let envelope = cbc.encrypt_with_rng(&message, &mut rng);
            let recovered = cbc.decrypt(&envelope).context("decrypt sample")?;
            if recovered != message {
                bail!("{} CBC round trip mismatch for {} byte message", size, len);
            }
        }
        println!("{}: {} CBC round trips ok", size, samples);
    }
    Ok(())
}

fn parse_key_size(text: &str) -> Result<KeySize, String> {
    match text.trim() {
        "128" => Ok(KeySize::Aes128),
        "192" => Ok(KeySize::Aes192),
        "256" => Ok(KeySize::Aes256),
        other => Err(format!("unsupported key size {other} (expected 128, 192 or 256)")),
    }
}

fn parse_key_hex(hex_str: &str) -> Result<AesKey> {
    AesKey::from_hex(hex_str).context("decode key hex")
}

fn parse_block_hex(hex_str: &str) -> Result<Block> {
    let mut block = [0u8; 16];
    hex::decode_to_slice(hex_str, &mut block).context("decode block hex")?;
    Ok(block)
}

fn load_key(path: &Path) -> Result<AesKey> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_key_hex(&text).with_context(|| format!("parse key file {}", path.display()))
}

fn write_keyfile(path: &Path, key: &AesKey) -> Result<()> {
    let mut line = key.to_hex();
    line.push('\n');
    fs::write(path, line).with_context(|| format!("write {}", path.display()))
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path).with_context(|| format!("read {}", path.display())),
        None => {
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data).context("read stdin")?;
            Ok(data)
        }
    }
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => fs::write(path, data).with_context(|| format!("write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data).context("write stdout")?;
            stdout.flush().context("flush stdout")
        }
    }
}

fn seeded_rng(seed: Option<u64>) -> impl RngCore + CryptoRng {
    match seed {
        Some(value) => {
            let mut seed_bytes = [0u8; 32];
            seed_bytes[..8].copy_from_slice(&value.to_le_bytes());
            ChaCha20Rng::from_seed(seed_bytes)
        }
        None => {
            let mut seed_bytes = [0u8; 32];
            rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
            ChaCha20Rng::from_seed(seed_bytes)
        }
    }
}
