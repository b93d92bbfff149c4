//! Error types for composition assembly
//!
//! Covers:
//! - Field validation failures (blank or malformed required fields)
//! - Completeness failures (a category with no selection)
//! - Stage composer workflow violations

use crate::fields::FieldErrors;
use crate::stage::ComposerState;
use seed_catalog::{Category, TaskSpanError};

/// Composition error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompositionError {
    /// Required fields are blank or malformed
    #[error("invalid fields: {0}")]
    InvalidFields(FieldErrors),

    /// One or more categories have no chosen item
    #[error("no selection for: {missing:?}")]
    Incomplete {
        /// Categories without a selection
        missing: Vec<Category>,
    },

    /// Existing record opened and submitted without any change
    #[error("nothing changed since the record was loaded")]
    Unchanged,

    /// Stage composer asked for a transition it does not allow
    #[error("illegal transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current state
        from: ComposerState,
        /// Requested state
        to: ComposerState,
    },

    /// Stage has no tasks
    #[error("stage has no tasks")]
    StageWithoutTasks,

    /// Stage cannot be saved while the task picker is open
    #[error("task picker is still open")]
    PickerOpen,

    /// Task dates are inverted
    #[error("invalid task: {0}")]
    InvalidTask(#[from] TaskSpanError),

    /// Document could not be encoded as a JSON object
    #[error("encoding failed: {0}")]
    Encoding(String),
}

impl CompositionError {
    /// Field-level errors, if this is a field validation failure
    #[inline]
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::InvalidFields(errors) => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_lists_categories() {
        let err = CompositionError::Incomplete {
            missing: vec![Category::Soil, Category::Stage],
        };
        let text = err.to_string();
        assert!(text.contains("Soil"));
        assert!(text.contains("Stage"));
    }

    #[test]
    fn field_errors_accessor() {
        let mut errors = FieldErrors::new();
        errors.insert("name", "Rice seed name is required");
        let err = CompositionError::InvalidFields(errors);
        assert_eq!(
            err.field_errors().and_then(|e| e.get("name")),
            Some("Rice seed name is required")
        );
        assert!(CompositionError::Unchanged.field_errors().is_none());
    }
}
