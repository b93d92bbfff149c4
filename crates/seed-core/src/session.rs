//! Composition editing session
//!
//! A session owns one composition draft over a catalog snapshot. Every method
//! that reads the gate sees the current state, so the gate is effectively
//! recomputed after each change. Submit is at-most-once: a second call while
//! one is in flight is refused, and after a successful insert the draft
//! becomes an update of the stored record.

use crate::config::AdminConfig;
use crate::error::AdminError;
use crate::loader::CatalogLoader;
use crate::notice::{Notice, Notices, SERVER_ERROR_MESSAGE};
use crate::store::DocumentStore;
use parking_lot::Mutex;
use seed_catalog::{Category, Decimal, ReferenceCatalog};
use seed_composition::{
    Baseline, CompositeRecordBuilder, CompositionValidator, Gate, IngredientAggregator, Origin,
    ScalarField, ScalarFields, Selections,
};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Which record a session edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTarget {
    /// Create a new composition
    New,
    /// Edit the stored composition with this identifier
    Existing(String),
}

/// Outcome of a successful submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    /// Written identifier
    pub id: String,
    /// Whether a document was created
    pub inserted: bool,
    /// Ingredient total as persisted
    pub ingredient_total_price: Decimal,
}

#[derive(Debug)]
struct Draft {
    scalars: ScalarFields,
    selections: Selections,
    origin: Origin,
}

/// Clears the in-flight flag on drop, whatever the submit outcome
pub(crate) struct SubmitGuard<'a>(&'a AtomicBool);

impl<'a> SubmitGuard<'a> {
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Result<Self, AdminError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| AdminError::SubmitInProgress)
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Editing session for one rice seed composition
pub struct CompositionSession {
    store: Arc<dyn DocumentStore>,
    config: AdminConfig,
    catalog: ReferenceCatalog,
    draft: Mutex<Draft>,
    submitting: AtomicBool,
    notices: Notices,
}

impl std::fmt::Debug for CompositionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositionSession")
            .field("record_id", &self.record_id())
            .field("submitting", &self.is_submitting())
            .finish_non_exhaustive()
    }
}

impl CompositionSession {
    /// Open a session
    ///
    /// Loads the reference catalog and, for an existing record, pre-marks
    /// the selections by stored name and fills the scalar fields.
    ///
    /// # Errors
    /// - [`AdminError::Unauthorized`] if `is_authorized` is false
    /// - [`AdminError::Persistence`] if the store fails or the record is missing
    /// - [`AdminError::Catalog`] if a document is malformed
    pub async fn open(
        store: Arc<dyn DocumentStore>,
        config: AdminConfig,
        target: SessionTarget,
        is_authorized: bool,
    ) -> Result<Self, AdminError> {
        if !is_authorized {
            tracing::warn!("composition session refused: not authorized");
            return Err(AdminError::Unauthorized);
        }

        let loader = CatalogLoader::new(store.as_ref(), &config);
        let catalog = loader.load().await?;
        let mut selections = Selections::from_catalog(&catalog);

        let (scalars, origin) = match target {
            SessionTarget::New => (ScalarFields::default(), Origin::New),
            SessionTarget::Existing(id) => {
                let document = loader.load_composition(&id).await?;
                selections.mark_from_document(&document);
                let scalars = document.scalar_fields();
                let baseline = Baseline::capture(&scalars, &selections);
                (scalars, Origin::Existing { id, baseline })
            }
        };
        tracing::info!(record = ?origin.id(), "composition session opened");

        let notices = Notices::new(config.notification_limit);
        Ok(Self {
            store,
            config,
            catalog,
            draft: Mutex::new(Draft {
                scalars,
                selections,
                origin,
            }),
            submitting: AtomicBool::new(false),
            notices,
        })
    }

    /// Catalog snapshot the session selects from
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    /// Replace the text of one scalar field
    pub fn set_field(&self, field: ScalarField, value: impl Into<String>) {
        self.draft.lock().scalars.set(field, value);
    }

    /// Current scalar fields
    #[must_use]
    pub fn scalars(&self) -> ScalarFields {
        self.draft.lock().scalars.clone()
    }

    /// Set one item's chosen flag; unknown identifiers are ignored
    pub fn toggle(&self, category: Category, identifier: &str, value: bool) -> bool {
        self.draft
            .lock()
            .selections
            .toggle(category, identifier, value)
    }

    /// Unchoose every item of `category`
    pub fn clear(&self, category: Category) {
        self.draft.lock().selections.clear(category);
    }

    /// Chosen identifiers of `category`
    #[must_use]
    pub fn chosen_identifiers(&self, category: Category) -> BTreeSet<String> {
        self.draft.lock().selections.chosen_identifiers(category)
    }

    /// Current gate
    #[must_use]
    pub fn gate(&self) -> Gate {
        let draft = self.draft.lock();
        CompositionValidator::evaluate(&draft.scalars, &draft.selections, &draft.origin)
    }

    /// Total price of the chosen ingredients
    #[must_use]
    pub fn ingredient_total(&self) -> Decimal {
        IngredientAggregator::total_price(&self.draft.lock().selections.ingredients)
    }

    /// Stored identifier, `None` until a new record is first saved
    #[must_use]
    pub fn record_id(&self) -> Option<String> {
        self.draft.lock().origin.id().map(str::to_string)
    }

    /// Whether a submit is in flight
    #[inline]
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Pending notifications, oldest first
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.pending()
    }

    /// Take every pending notification
    pub fn take_notices(&self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Build and persist the composition
    ///
    /// A saved composition records a success notice. On a store failure the
    /// draft is kept as it was, a "Server error occurred" notice is recorded
    /// and the error returned.
    ///
    /// # Errors
    /// - [`AdminError::SubmitInProgress`] if another submit is running
    /// - [`AdminError::Composition`] if the gate is closed
    /// - [`AdminError::Persistence`] if the write fails
    pub async fn submit(&self) -> Result<SubmitReceipt, AdminError> {
        let _guard = SubmitGuard::acquire(&self.submitting)?;

        let (composition, baseline) = {
            let draft = self.draft.lock();
            let composition =
                CompositeRecordBuilder::build(&draft.scalars, &draft.selections, &draft.origin)?;
            (composition, Baseline::capture(&draft.scalars, &draft.selections))
        };
        let payload = composition.to_payload()?;
        let collection = &self.config.collections.rice_seeds;

        match self.store.write(collection, payload).await {
            Ok(id) => {
                self.draft.lock().origin = Origin::Existing {
                    id: id.clone(),
                    baseline,
                };
                tracing::info!(id = %id, inserted = composition.is_new, "composition saved");
                self.notices.push(Notice::success("Rice seed saved successfully!"));
                Ok(SubmitReceipt {
                    id,
                    inserted: composition.is_new,
                    ingredient_total_price: composition.ingredient_total_price,
                })
            }
            Err(err) => {
                tracing::error!(error = %err, "composition submit failed");
                self.notices.push(Notice::error(SERVER_ERROR_MESSAGE));
                Err(err.into())
            }
        }
    }

    /// Discard the session; nothing is persisted
    pub fn cancel(self) {
        tracing::debug!(record = ?self.record_id(), "composition session cancelled");
    }
}
