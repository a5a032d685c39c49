//! Encryption, decryption and hashing for Battle Cats pack data.
//!
//! This crate provides:
//! - AES-128 ECB/CBC ciphers over raw, block-aligned data (PKCS#7 is the
//!   caller's responsibility, applied on the byte buffer)
//! - MD5/SHA-1/SHA-256 digests with optional truncation, and HMAC
//! - the fixed list-file key, the legacy server-pack key derivation and
//!   the per-country pack key material

pub mod aes;
pub mod error;
pub mod hash;
pub mod keys;

pub use aes::AesCipher;
pub use error::CryptoError;
pub use hash::{HashAlgorithm, Hmac, hash, hash_truncated};

/// Result type for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
