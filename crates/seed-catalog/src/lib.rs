//! Rice Seed Reference Catalog
//!
//! Data model and selection state for composing rice seed planting plans.
//!
//! # Core Concepts
//!
//! - [`ReferenceCatalog`]: read-only snapshot of the five selectable categories
//! - [`SelectionSet`]: identifier → chosen map over a shared catalog slice
//! - [`CatalogItem`]: common view over locations, soils, weathers, ingredients,
//!   stages and tasks
//! - [`Decimal`] / [`TaskDate`]: exact prices (re-exported from
//!   `rust_decimal`) and day-indexed dates
//!
//! # Example
//!
//! ```rust
//! use seed_catalog::{SelectionSet, TagItem};
//!
//! let mut locations = SelectionSet::from_items(vec![
//!     TagItem::new("l1", "Delta"),
//!     TagItem::new("l2", "Highland"),
//! ]);
//! locations.toggle("l2", true);
//! assert_eq!(locations.chosen_items()[0].name, "Highland");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod catalog;
mod category;
pub mod date;
mod error;
mod item;
mod selection;

// Re-exports
pub use catalog::{decode_items, decode_valid_items, ReferenceCatalog};
pub use category::Category;
pub use date::TaskDate;
pub use error::{CatalogError, DateError, TaskSpanError};
pub use item::{
    CatalogItem, Ingredient, Location, Period, Soil, Stage, StageSpan, StageTask, TagItem,
    Weather,
};
pub use rust_decimal::Decimal;
pub use selection::SelectionSet;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
