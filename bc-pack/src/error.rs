//! Error types for pack decoding, encoding and catalog operations.

use thiserror::Error;

/// Errors that can occur while working with packs and the catalog.
#[derive(Error, Debug)]
pub enum PackError {
    /// Crypto error from the cipher layer.
    #[error("crypto error: {0}")]
    Crypto(#[from] bc_crypto::CryptoError),

    /// Data-buffer error.
    #[error("data error: {0}")]
    Data(#[from] bc_data::DataError),

    /// The decrypted list file does not describe a valid pack.
    #[error("malformed list for pack {pack}: {reason}")]
    BadList { pack: String, reason: String },

    /// A list entry points past the end of the pack blob.
    #[error(
        "truncated entry {file} in pack {pack}: {offset}+{len} exceeds pack size {pack_len}"
    )]
    Truncated {
        pack: String,
        file: String,
        offset: usize,
        len: usize,
        pack_len: usize,
    },

    /// Decryption produced invalid PKCS#7 padding.
    #[error("invalid padding decrypting {file} in pack {pack}")]
    BadPadding { pack: String, file: String },

    /// A game file carries neither ciphertext nor plaintext.
    #[error("file {0} has no data")]
    MissingData(String),

    /// A destination pack is absent from the catalog.
    #[error("pack not found: {0}")]
    MissingPack(String),

    /// File names inside a pack cannot be empty.
    #[error("file name cannot be empty")]
    EmptyFileName,

    /// Re-encrypting an unmodified file did not reproduce its original
    /// ciphertext. This indicates a codec bug, not bad input.
    #[error("integrity violation re-encrypting {file} in pack {pack}")]
    IntegrityViolation { pack: String, file: String },

    /// PNG encode failed while writing an image into the catalog.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// IO error while extracting to disk.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
