//! Declarative mod bundles over the game-file catalog.
//!
//! A [`Mod`] is an ordered list of record edits plus auxiliary payloads
//! (scripts, audio, native-library patches) that are opaque to the
//! data plane. Application order is catalog records first, then
//! APK-level payloads; later mods observe earlier mods' edits.
//!
//! [`merge`] implements the three-way import used when a mod authored
//! against the stock game is layered onto an already-modified catalog.

pub mod apk;
pub mod error;
pub mod merge;
pub mod mods;

pub use apk::{ApkOutputs, ApkSource, PackOutput};
pub use error::ModError;
pub use mods::{AudioFile, LibPatch, Mod, ModEdit, ScriptPayload};

/// Result type for mod operations.
pub type Result<T> = std::result::Result<T, ModError>;
