//! Primitive data types shared by the Battle Cats modding toolkit.
//!
//! This crate provides:
//! - [`Data`], the owned byte buffer every pack and record operation
//!   crosses, with base64 / UTF-8 / little-endian integer views and
//!   explicit PKCS#7 padding
//! - [`Csv`], the delimited-table view used by the game's resource files
//! - [`CountryCode`], [`Language`] and [`GameVersion`] domain enums
//! - [`PaddedInt`], the zero-padded decimal form used in resource
//!   filenames

pub mod country;
pub mod csv;
pub mod data;
pub mod error;
pub mod padded;
pub mod version;

pub use country::{CountryCode, Language};
pub use csv::{Csv, Delimiter};
pub use data::Data;
pub use error::DataError;
pub use padded::PaddedInt;
pub use version::GameVersion;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;
