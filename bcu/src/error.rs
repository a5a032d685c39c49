//! Error types for bundle parsing and import.

use thiserror::Error;

/// Errors that can occur while reading a BCU bundle.
#[derive(Error, Debug)]
pub enum BundleError {
    /// The bundle is shorter than its fixed header layout.
    #[error("bundle truncated: need {needed} bytes, have {have}")]
    Truncated { needed: usize, have: usize },

    /// The directory JSON does not parse.
    #[error("invalid bundle directory: {0}")]
    Directory(#[from] serde_json::Error),

    /// AES failure on the directory or a file slice.
    #[error("crypto error: {0}")]
    Crypto(#[from] bc_crypto::CryptoError),

    /// Byte-buffer error.
    #[error("data error: {0}")]
    Data(#[from] bc_data::DataError),

    /// A file the bundle directory references is missing or a required
    /// entry (like `pack.json`) is absent.
    #[error("bundle file not found: {0}")]
    MissingFile(String),

    /// An entity in `pack.json` is malformed.
    #[error("malformed bundle entity: {0}")]
    MalformedEntity(String),

    /// Writing translated records into the catalog failed.
    #[error("record error: {0}")]
    Game(#[from] bc_game::GameError),

    /// Catalog failure during import.
    #[error("pack error: {0}")]
    Pack(#[from] bc_pack::PackError),
}
