//! Error types for data-buffer and table operations.

use thiserror::Error;

/// Errors produced by byte-buffer views and table parsing.
#[derive(Error, Debug)]
pub enum DataError {
    /// Buffer is not valid UTF-8.
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Base64 decode failed.
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// PKCS#7 unpad failed: the trailing bytes do not describe a valid pad.
    #[error("invalid PKCS#7 padding")]
    InvalidPadding,

    /// A fixed-offset read ran past the end of the buffer.
    #[error("read of {wanted} bytes at offset {offset} exceeds buffer length {len}")]
    OutOfBounds {
        offset: usize,
        wanted: usize,
        len: usize,
    },

    /// An unknown country code was supplied.
    #[error("unknown country code: {0:?}")]
    UnknownCountry(String),
}
