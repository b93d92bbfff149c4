//! Rice Seed Admin Core
//!
//! Session orchestration over an external document store.
//!
//! # Architecture
//!
//! ```text
//! DocumentStore ──> CatalogLoader ──> CompositionSession ──> CompositeRecordBuilder
//!                                 └─> StageSession ───────> StageTaskComposer
//! ```
//!
//! - [`CompositionSession`]: edits one composition; the gate is read from the
//!   current state and submit is at-most-once
//! - [`StageSession`]: edits one stage and its tasks through the task picker
//! - [`CatalogEditor`]: create/update/delete of tag items and ingredients
//! - [`list_compositions`] / [`delete_composition`]: stored composition rows
//!
//! # Example
//!
//! ```rust
//! use seed_core::{AdminConfig, CompositionSession, InMemoryDocumentStore, SessionTarget};
//! use std::sync::Arc;
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! runtime.block_on(async {
//!     let store = Arc::new(InMemoryDocumentStore::new());
//!     let session =
//!         CompositionSession::open(store, AdminConfig::default(), SessionTarget::New, true)
//!             .await
//!             .unwrap();
//!     assert!(!session.gate().is_open());
//! });
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod editor;
mod error;
mod listing;
mod loader;
mod notice;
mod session;
mod stage_session;
mod store;

// Re-exports
pub use config::{AdminConfig, CollectionNames};
pub use editor::{CatalogEditor, IngredientDraft, TagDraft, TagKind};
pub use error::{AdminError, ConfigError, StoreError};
pub use listing::{delete_composition, find_composition, list_compositions, RiceSeedSummary};
pub use loader::CatalogLoader;
pub use notice::{Notice, NoticeLevel, Notices, SERVER_ERROR_MESSAGE};
pub use session::{CompositionSession, SessionTarget, SubmitReceipt};
pub use stage_session::{StageReceipt, StageSession};
pub use store::{DocumentStore, InMemoryDocumentStore};

/// Prelude module
pub mod prelude {
    //! Common imports for driving admin sessions
    pub use crate::{
        AdminConfig, AdminError, CatalogEditor, CompositionSession, DocumentStore,
        InMemoryDocumentStore, SessionTarget, StageSession,
    };
    pub use seed_catalog::{Category, Decimal, Period, TaskDate};
    pub use seed_composition::{ScalarField, TaskDraft};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
