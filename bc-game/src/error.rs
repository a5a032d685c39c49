//! Error types for record reads and writes.

use thiserror::Error;

/// Errors surfaced by the record layer.
///
/// Readers generally degrade instead of erroring; these come from the
/// strict write path.
#[derive(Error, Debug)]
pub enum GameError {
    /// Catalog or codec failure underneath a record operation.
    #[error("pack error: {0}")]
    Pack(#[from] bc_pack::PackError),

    /// A file the writer must update is absent from the catalog.
    #[error("required file not found: {0}")]
    MissingFile(String),
}
