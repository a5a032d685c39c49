//! BCU bundle importer.
//!
//! BCU is a third-party unit editor whose bundles carry units, enemies
//! and their animations in an encrypted container with a JSON
//! directory. This crate parses the container, decrypts the per-file
//! slices, and translates the bundled entities into the catalog's own
//! record types: stat rows at canonical width, model files renamed to
//! the game's scheme, icons composed onto the in-game canvases.

pub mod bundle;
pub mod cat;
pub mod enemy;
pub mod error;
pub mod file;

pub use bundle::{BcuBundle, BundleDesc};
pub use cat::{BcuCat, BcuForm, import_cats};
pub use enemy::BcuEnemy;
pub use error::BundleError;
pub use file::BcuFile;

/// Result type for bundle operations.
pub type Result<T> = std::result::Result<T, BundleError>;
