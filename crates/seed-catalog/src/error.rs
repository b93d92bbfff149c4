//! Error types for the reference catalog
//!
//! Malformed reference documents are rejected or skipped, never coerced
//! into a default value.

/// Failure to parse a task date
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// Neither `YYYY-MM-DD` nor a day index
    #[error("invalid date: {0:?}")]
    Invalid(String),

    /// Day index outside the supported calendar
    #[error("day index out of range: {0}")]
    OutOfRange(i64),
}

/// A task whose end precedes its start
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("task {id:?} ends ({end}) before it starts ({start})")]
pub struct TaskSpanError {
    /// Task identifier
    pub id: String,
    /// Start date as written
    pub start: String,
    /// End date as written
    pub end: String,
}

/// Catalog loading errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// A document could not be decoded into its catalog item
    #[error("invalid document {id:?} in {collection}: {reason}")]
    InvalidDocument {
        /// Source collection
        collection: String,
        /// Document identifier (or `<missing>`)
        id: String,
        /// Decoder message
        reason: String,
    },

    /// Two documents share an identifier
    #[error("duplicate identifier {id:?} in {collection}")]
    DuplicateIdentifier {
        /// Source collection
        collection: String,
        /// Repeated identifier
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_error_display() {
        let err = CatalogError::InvalidDocument {
            collection: "riceSeedIngredients".to_string(),
            id: "i1".to_string(),
            reason: "price: not a number".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("riceSeedIngredients"));
        assert!(text.contains("\"i1\""));
    }
}
