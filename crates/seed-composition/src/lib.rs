//! Rice Seed Composition
//!
//! Assembles a rice seed composition from the reference catalog and decides
//! when it may be saved.
//!
//! # Core Concepts
//!
//! - [`Selections`]: the five per-category selection sets of one composition
//! - [`CompositionValidator`]: the completeness gate, re-evaluated after every
//!   change
//! - [`CompositeRecordBuilder`]: persisted shape and insert/update payload
//! - [`StageTaskComposer`] / [`TaskPicker`]: the task sub-selection workflow
//!   of a single stage
//!
//! # Example
//!
//! ```rust
//! use seed_catalog::{Decimal, Ingredient, SelectionSet};
//! use seed_composition::IngredientAggregator;
//!
//! let mut ingredients = SelectionSet::from_items(vec![
//!     Ingredient::new("i1", "Urea", Decimal::from(10), Decimal::ONE, "kg"),
//!     Ingredient::new("i2", "Potash", Decimal::from(5), Decimal::ONE, "kg"),
//! ]);
//! ingredients.select_all();
//! assert_eq!(IngredientAggregator::total_price(&ingredients).to_string(), "15");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod aggregator;
mod builder;
mod document;
mod error;
mod fields;
mod payload;
mod picker;
mod selections;
pub mod stage;
mod validator;

// Re-exports
pub use aggregator::IngredientAggregator;
pub use builder::{CompositeRecordBuilder, IngredientSnapshot, RiceSeedComposition};
pub use document::{FeeSnapshot, IngredientFee, RiceSeedDocument};
pub use error::CompositionError;
pub use fields::{FieldErrors, ParsedScalars, ScalarField, ScalarFields};
pub use payload::{new_document_id, WritePayload};
pub use picker::{TaskDraft, TaskPicker, TaskPickerOutcome};
pub use selections::{SelectionSnapshot, Selections};
pub use stage::{ComposerState, ResumeEffect, StageGate, StageTaskComposer};
pub use validator::{Baseline, CompositionValidator, Gate, Origin};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
