//! Encrypted pack containers and the in-memory game-file catalog.
//!
//! A pack is a pair of encrypted blobs: a *pack* (raw concatenation of
//! per-entry ciphertexts) and a *list* (a small encrypted CSV naming
//! each entry's offset and length). This crate decodes packs into lazy
//! [`GameFile`] entries, indexes every pack of an install into one
//! [`GamePacks`] catalog with deterministic name resolution, tracks
//! modifications, and re-emits byte-correct pack/list pairs for the
//! packs that changed.

pub mod catalog;
pub mod cipher;
pub mod error;
pub mod extract;
pub mod game_file;
pub mod pack_file;

pub use catalog::GamePacks;
pub use cipher::pack_cipher;
pub use error::PackError;
pub use game_file::GameFile;
pub use pack_file::{PackFile, PackKind};

/// Result type for pack operations.
pub type Result<T> = std::result::Result<T, PackError>;
