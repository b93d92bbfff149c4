//! Error types for the admin engine
//!
//! Provides error handling for:
//! - Document store failures (unavailable, missing documents)
//! - Configuration loading
//! - Session-level refusals (unauthorized, submit already running)

use seed_catalog::CatalogError;
use seed_composition::CompositionError;

/// Document store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Store cannot be reached
    #[error("document store unavailable")]
    Unavailable,

    /// No document under this identifier
    #[error("document {id:?} not found in {collection}")]
    NotFound {
        /// Collection name
        collection: String,
        /// Requested identifier
        id: String,
    },

    /// Insert under an identifier already in use
    #[error("document {id:?} already exists in {collection}")]
    AlreadyExists {
        /// Collection name
        collection: String,
        /// Conflicting identifier
        id: String,
    },

    /// Document is not a JSON object, or a snapshot is malformed
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid TOML for [`crate::AdminConfig`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A collection name is blank
    #[error("collection name for {0} is blank")]
    BlankCollection(&'static str),
}

/// Main admin error type
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// Caller is not allowed to open an admin session
    #[error("not authorized")]
    Unauthorized,

    /// Store operation failed
    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),

    /// Reference documents could not be decoded
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Gate closed, invalid fields or workflow violation
    #[error("composition error: {0}")]
    Composition(#[from] CompositionError),

    /// A submit of this session is still running
    #[error("submit already in progress")]
    SubmitInProgress,

    /// Task operation requires the picker to be open
    #[error("task picker is not open")]
    PickerClosed,

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AdminError {
    /// Check if error is retryable
    ///
    /// Only store failures are; nothing is retried automatically.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    /// Field-level errors, if the failure was field validation
    #[must_use]
    pub fn field_errors(&self) -> Option<&seed_composition::FieldErrors> {
        match self {
            Self::Composition(err) => err.field_errors(),
            _ => None,
        }
    }
}
