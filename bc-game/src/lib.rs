//! Typed views over the game-file catalog.
//!
//! Every record type here is a *view* over one or more files in a
//! [`bc_pack::GamePacks`] catalog: `read` parses the backing file(s)
//! into typed fields, `merge` combines two instances with the receiver
//! winning, and `apply` writes the record back by name. Record identity
//! is the location in the catalog, never a heap address.
//!
//! Readers are tolerant (missing files and malformed rows degrade to
//! absent records or zeroed cells); writers are strict.

pub mod error;
pub mod localizable;
pub mod map;
pub mod unit;

pub use error::GameError;
pub use localizable::Localizable;

/// Result type for record operations.
pub type Result<T> = std::result::Result<T, GameError>;
