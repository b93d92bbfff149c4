//! Rice Seed Admin Operator Tool
//!
//! Drives the composition engine against a JSON store snapshot. The store
//! file holds `{ collection: [documents] }`; commands load it, run one
//! session and write it back.
//!
//! - [`CompositionDraft`]: a composition written by hand, with selections
//!   named the way stored compositions name them
//! - [`load_store`] / [`save_store`]: snapshot file round trip
//! - [`catalog_report`] / [`compose`]: command bodies used by the binary

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod commands;
mod draft;
mod error;
mod snapshot;

// Re-exports
pub use commands::{catalog_report, compose, render_rows, CatalogReport};
pub use draft::CompositionDraft;
pub use error::ToolError;
pub use snapshot::{load_store, save_store};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
