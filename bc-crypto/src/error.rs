//! Error types for crypto operations.

use thiserror::Error;

/// Errors that can occur during crypto operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Invalid key size.
    #[error("invalid key size: expected {expected}, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },

    /// Invalid IV size.
    #[error("invalid IV size: expected {expected}, got {actual}")]
    InvalidIvSize { expected: usize, actual: usize },

    /// Invalid hex key material.
    #[error("invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// Ciphertext or plaintext is not a whole number of AES blocks.
    #[error("data length {0} is not block-aligned")]
    NotBlockAligned(usize),
}
