//! Catalog item editing
//!
//! Create, update and delete for locations, soils, weathers and ingredients.
//! Drafts are validated field by field before anything is written.

use crate::config::AdminConfig;
use crate::error::AdminError;
use crate::notice::{Notice, Notices, SERVER_ERROR_MESSAGE};
use crate::store::DocumentStore;
use seed_catalog::{decode_items, Category, Ingredient, TagItem};
use seed_composition::{new_document_id, CompositionError, FieldErrors, WritePayload};
use serde::Serialize;
use std::sync::Arc;

/// Tag-like category edited through a [`TagDraft`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// Locations
    Location,
    /// Soils
    Soil,
    /// Weathers
    Weather,
}

impl TagKind {
    /// Every tag kind
    pub const ALL: [TagKind; 3] = [TagKind::Location, TagKind::Soil, TagKind::Weather];

    /// Singular label used in notices
    #[inline]
    #[must_use]
    pub fn noun(&self) -> &'static str {
        match self {
            TagKind::Location => "Location",
            TagKind::Soil => "Soil",
            TagKind::Weather => "Weather",
        }
    }

    /// Matching reference category
    #[inline]
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            TagKind::Location => Category::Location,
            TagKind::Soil => Category::Soil,
            TagKind::Weather => Category::Weather,
        }
    }
}

impl TryFrom<Category> for TagKind {
    type Error = Category;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        match category {
            Category::Location => Ok(TagKind::Location),
            Category::Soil => Ok(TagKind::Soil),
            Category::Weather => Ok(TagKind::Weather),
            other => Err(other),
        }
    }
}

/// Location, soil or weather as entered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDraft {
    /// Display name
    pub name: String,
}

impl TagDraft {
    /// Draft with `name`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Per-field errors
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require_text("name", &self.name, "Name field is required");
        errors
    }

    /// Validate and build the item under `id`
    ///
    /// # Errors
    /// [`CompositionError::InvalidFields`] if the name is blank
    pub fn into_item(self, id: impl Into<String>) -> Result<TagItem, CompositionError> {
        self.validate().into_result()?;
        Ok(TagItem::new(id, self.name.trim()))
    }
}

/// Ingredient as entered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientDraft {
    /// Title
    pub title: String,
    /// Unit price
    pub price: String,
    /// Amount
    pub quantity: String,
    /// Unit of `quantity`
    pub unit: String,
}

impl IngredientDraft {
    /// Per-field errors
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        self.check(&mut errors);
        errors
    }

    /// Validate and build the item under `id`
    ///
    /// # Errors
    /// [`CompositionError::InvalidFields`] if any field fails
    pub fn into_item(self, id: impl Into<String>) -> Result<Ingredient, CompositionError> {
        let mut errors = FieldErrors::new();
        match self.check(&mut errors) {
            Some((price, quantity)) if errors.is_empty() => Ok(Ingredient::new(
                id,
                self.title.trim(),
                price,
                quantity,
                self.unit.trim(),
            )),
            _ => Err(CompositionError::InvalidFields(errors)),
        }
    }

    fn check(
        &self,
        errors: &mut FieldErrors,
    ) -> Option<(seed_catalog::Decimal, seed_catalog::Decimal)> {
        errors.require_text("title", &self.title, "Title field is required");
        let price = errors.require_decimal(
            "price",
            &self.price,
            "Price field is required",
            "Price must be a valid number",
        );
        let quantity = errors.require_decimal(
            "quantity",
            &self.quantity,
            "Quantity field is required",
            "Quantity must be a valid number",
        );
        errors.require_text("unit", &self.unit, "Unit field is required");
        price.zip(quantity)
    }
}

/// Writes catalog items to the store
pub struct CatalogEditor {
    store: Arc<dyn DocumentStore>,
    config: AdminConfig,
    notices: Notices,
}

impl std::fmt::Debug for CatalogEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEditor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CatalogEditor {
    /// Create editor
    ///
    /// # Errors
    /// [`AdminError::Unauthorized`] if `is_authorized` is false
    pub fn new(
        store: Arc<dyn DocumentStore>,
        config: AdminConfig,
        is_authorized: bool,
    ) -> Result<Self, AdminError> {
        if !is_authorized {
            tracing::warn!("catalog editor refused: not authorized");
            return Err(AdminError::Unauthorized);
        }
        let notices = Notices::new(config.notification_limit);
        Ok(Self {
            store,
            config,
            notices,
        })
    }

    /// Items of one tag kind
    ///
    /// # Errors
    /// [`AdminError::Persistence`] or [`AdminError::Catalog`]
    pub async fn list_tags(&self, kind: TagKind) -> Result<Vec<TagItem>, AdminError> {
        let collection = self.tag_collection(kind);
        Ok(decode_items(collection, self.store.fetch_all(collection).await?)?)
    }

    /// Every ingredient
    ///
    /// # Errors
    /// [`AdminError::Persistence`] or [`AdminError::Catalog`]
    pub async fn list_ingredients(&self) -> Result<Vec<Ingredient>, AdminError> {
        let collection = &self.config.collections.ingredients;
        Ok(decode_items(collection, self.store.fetch_all(collection).await?)?)
    }

    /// Create a tag item under a fresh identifier
    ///
    /// # Errors
    /// Field errors, or [`AdminError::Persistence`] if the write fails
    pub async fn create_tag(&self, kind: TagKind, draft: TagDraft) -> Result<TagItem, AdminError> {
        let item = draft.into_item(new_document_id())?;
        self.save(self.tag_collection(kind), &item.id, &item, true).await?;
        Ok(item)
    }

    /// Replace the name of the tag item under `id`
    ///
    /// # Errors
    /// Field errors, or [`AdminError::Persistence`] if the item is missing or
    /// the write fails
    pub async fn update_tag(
        &self,
        kind: TagKind,
        id: &str,
        draft: TagDraft,
    ) -> Result<TagItem, AdminError> {
        let item = draft.into_item(id)?;
        self.save(self.tag_collection(kind), id, &item, false).await?;
        Ok(item)
    }

    /// Delete the tag item under `id`
    ///
    /// # Errors
    /// [`AdminError::Persistence`] if the item is missing or the delete fails
    pub async fn delete_tag(&self, kind: TagKind, id: &str) -> Result<(), AdminError> {
        self.remove(self.tag_collection(kind), id, kind.noun()).await
    }

    /// Create an ingredient under a fresh identifier
    ///
    /// # Errors
    /// Field errors, or [`AdminError::Persistence`] if the write fails
    pub async fn create_ingredient(&self, draft: IngredientDraft) -> Result<Ingredient, AdminError> {
        let item = draft.into_item(new_document_id())?;
        self.save(&self.config.collections.ingredients, &item.id, &item, true)
            .await?;
        Ok(item)
    }

    /// Replace the ingredient under `id`
    ///
    /// # Errors
    /// Field errors, or [`AdminError::Persistence`] if the item is missing or
    /// the write fails
    pub async fn update_ingredient(
        &self,
        id: &str,
        draft: IngredientDraft,
    ) -> Result<Ingredient, AdminError> {
        let item = draft.into_item(id)?;
        self.save(&self.config.collections.ingredients, id, &item, false)
            .await?;
        Ok(item)
    }

    /// Delete the ingredient under `id`
    ///
    /// # Errors
    /// [`AdminError::Persistence`] if the item is missing or the delete fails
    pub async fn delete_ingredient(&self, id: &str) -> Result<(), AdminError> {
        self.remove(&self.config.collections.ingredients, id, "Ingredient")
            .await
    }

    /// Pending notifications, oldest first
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.pending()
    }

    fn tag_collection(&self, kind: TagKind) -> &str {
        self.config.collections.for_category(kind.category())
    }

    async fn save<T: Serialize + Sync>(
        &self,
        collection: &str,
        id: &str,
        item: &T,
        is_new: bool,
    ) -> Result<(), AdminError> {
        let payload = WritePayload::from_document(item, is_new)?;
        match self.store.write(collection, payload).await {
            Ok(_) => {
                tracing::info!(collection, id, is_new, "catalog item saved");
                Ok(())
            }
            Err(err) => Err(self.failed(err.into())),
        }
    }

    async fn remove(&self, collection: &str, id: &str, noun: &str) -> Result<(), AdminError> {
        match self.store.delete(collection, id).await {
            Ok(()) => {
                tracing::info!(collection, id, "catalog item deleted");
                self.notices
                    .push(Notice::success(format!("{noun} deleted successfully!")));
                Ok(())
            }
            Err(err) => Err(self.failed(err.into())),
        }
    }

    fn failed(&self, err: AdminError) -> AdminError {
        tracing::error!(error = %err, "catalog write failed");
        self.notices.push(Notice::error(SERVER_ERROR_MESSAGE));
        err
    }
}
