//! Error types for the operator tool

use seed_catalog::Category;
use seed_core::{AdminError, StoreError};
use thiserror::Error;

/// Errors raised while reading drafts, snapshots or running a command
#[derive(Error, Debug)]
pub enum ToolError {
    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid JSON for its purpose
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot content was rejected by the store
    #[error("Invalid store snapshot: {0}")]
    Snapshot(#[from] StoreError),

    /// Draft names an item the catalog does not hold
    #[error("No {category} entry named {key:?}")]
    UnknownKey {
        /// Category searched
        category: Category,
        /// Name, title or stage name as written in the draft
        key: String,
    },

    /// Engine refused the operation
    #[error(transparent)]
    Admin(#[from] AdminError),
}
