//! Error types for mod application.

use thiserror::Error;

/// Errors surfaced while applying or importing mods.
#[derive(Error, Debug)]
pub enum ModError {
    /// Record write failed.
    #[error("record error: {0}")]
    Game(#[from] bc_game::GameError),

    /// Pack or catalog failure.
    #[error("pack error: {0}")]
    Pack(#[from] bc_pack::PackError),
}
