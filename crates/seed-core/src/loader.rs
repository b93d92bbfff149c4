//! Reference catalog loading
//!
//! All five category fetches run concurrently and must all succeed; any
//! fetch failure fails the load. Documents that do not decode are skipped
//! with a warning.

use crate::config::AdminConfig;
use crate::error::AdminError;
use crate::store::DocumentStore;
use seed_catalog::{decode_valid_items, CatalogError, Category, ReferenceCatalog, StageTask};
use seed_composition::RiceSeedDocument;

/// Reads catalogs and stored compositions from a [`DocumentStore`]
#[derive(Clone, Copy)]
pub struct CatalogLoader<'a> {
    store: &'a dyn DocumentStore,
    config: &'a AdminConfig,
}

impl<'a> CatalogLoader<'a> {
    /// Create loader over `store`
    #[inline]
    #[must_use]
    pub fn new(store: &'a dyn DocumentStore, config: &'a AdminConfig) -> Self {
        Self { store, config }
    }

    /// Fetch and decode the five selectable categories
    ///
    /// # Errors
    /// [`AdminError::Persistence`] if any fetch fails,
    /// [`AdminError::Catalog`] if two documents of a category share an id
    pub async fn load(&self) -> Result<ReferenceCatalog, AdminError> {
        let names = &self.config.collections;
        let (locations, soils, weathers, ingredients, stages) = futures::try_join!(
            self.store.fetch_all(names.for_category(Category::Location)),
            self.store.fetch_all(names.for_category(Category::Soil)),
            self.store.fetch_all(names.for_category(Category::Weather)),
            self.store.fetch_all(names.for_category(Category::Ingredient)),
            self.store.fetch_all(names.for_category(Category::Stage)),
        )?;

        let catalog = ReferenceCatalog::new(
            decode_valid_items(names.for_category(Category::Location), locations)?,
            decode_valid_items(names.for_category(Category::Soil), soils)?,
            decode_valid_items(names.for_category(Category::Weather), weathers)?,
            decode_valid_items(names.for_category(Category::Ingredient), ingredients)?,
            decode_valid_items(names.for_category(Category::Stage), stages)?,
        );
        tracing::info!(
            locations = catalog.count(Category::Location),
            soils = catalog.count(Category::Soil),
            weathers = catalog.count(Category::Weather),
            ingredients = catalog.count(Category::Ingredient),
            stages = catalog.count(Category::Stage),
            "reference catalog loaded"
        );
        Ok(catalog)
    }

    /// Fetch and decode the task catalog
    ///
    /// # Errors
    /// As [`Self::load`]
    pub async fn load_tasks(&self) -> Result<Vec<StageTask>, AdminError> {
        let collection = &self.config.collections.tasks;
        let tasks: Vec<StageTask> =
            decode_valid_items(collection, self.store.fetch_all(collection).await?)?;
        tracing::info!(tasks = tasks.len(), "task catalog loaded");
        Ok(tasks)
    }

    /// Fetch one stored composition
    ///
    /// # Errors
    /// [`AdminError::Persistence`] if it does not exist or the fetch fails,
    /// [`AdminError::Catalog`] if it cannot be decoded
    pub async fn load_composition(&self, id: &str) -> Result<RiceSeedDocument, AdminError> {
        let collection = &self.config.collections.rice_seeds;
        let document = self.store.fetch_one(collection, id).await?;
        serde_json::from_value(document).map_err(|e| {
            AdminError::Catalog(CatalogError::InvalidDocument {
                collection: collection.clone(),
                id: id.to_string(),
                reason: e.to_string(),
            })
        })
    }
}
