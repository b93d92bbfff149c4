//! Completeness gate
//!
//! The gate is open iff every category has a selection, every scalar field
//! is valid, and the record is new or differs from what was loaded. It is a
//! pure function of the current state; callers re-evaluate it after each
//! change.

use crate::error::CompositionError;
use crate::fields::{FieldErrors, ScalarFields};
use crate::selections::{SelectionSnapshot, Selections};
use seed_catalog::Category;

/// State of an existing record when it was loaded or last saved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Baseline {
    scalars: ScalarFields,
    selections: SelectionSnapshot,
}

impl Baseline {
    /// Capture the current state
    #[must_use]
    pub fn capture(scalars: &ScalarFields, selections: &Selections) -> Self {
        Self {
            scalars: scalars.clone(),
            selections: selections.snapshot(),
        }
    }

    /// Whether the current state differs from the captured one
    #[must_use]
    pub fn is_dirty(&self, scalars: &ScalarFields, selections: &Selections) -> bool {
        self.scalars != *scalars || self.selections != selections.snapshot()
    }
}

/// Where the composition came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Created fresh in this session
    New,
    /// Loaded from the store
    Existing {
        /// Stored identifier
        id: String,
        /// State to compare against
        baseline: Baseline,
    },
}

impl Origin {
    /// Fresh record
    #[inline]
    #[must_use]
    pub fn is_new(&self) -> bool {
        matches!(self, Self::New)
    }

    /// Stored identifier, if any
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::New => None,
            Self::Existing { id, .. } => Some(id),
        }
    }
}

/// Result of one gate evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    /// Per-field errors
    pub field_errors: FieldErrors,
    /// Categories with nothing chosen; never attached to a field
    pub missing_categories: Vec<Category>,
    /// Record was created in this session
    pub is_new: bool,
    /// Record differs from its baseline
    pub dirty: bool,
}

impl Gate {
    /// Whether submit is enabled
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.field_errors.is_empty()
            && self.missing_categories.is_empty()
            && (self.is_new || self.dirty)
    }

    /// First blocking reason as an error
    ///
    /// # Errors
    /// Field errors first, then missing categories, then an unchanged record
    pub fn into_result(self) -> Result<(), CompositionError> {
        self.field_errors.into_result()?;
        if !self.missing_categories.is_empty() {
            return Err(CompositionError::Incomplete {
                missing: self.missing_categories,
            });
        }
        if !(self.is_new || self.dirty) {
            return Err(CompositionError::Unchanged);
        }
        Ok(())
    }
}

/// Evaluates the completeness gate
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositionValidator;

impl CompositionValidator {
    /// Evaluate the gate for the current state
    #[must_use]
    pub fn evaluate(scalars: &ScalarFields, selections: &Selections, origin: &Origin) -> Gate {
        let (is_new, dirty) = match origin {
            Origin::New => (true, true),
            Origin::Existing { baseline, .. } => (false, baseline.is_dirty(scalars, selections)),
        };
        Gate {
            field_errors: scalars.validate(),
            missing_categories: selections.missing_categories(),
            is_new,
            dirty,
        }
    }
}
