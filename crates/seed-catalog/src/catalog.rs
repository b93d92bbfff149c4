//! Read-only reference catalog snapshot
//!
//! Holds the five selectable categories as shared slices. Built once per
//! composition session from raw store documents.

use crate::category::Category;
use crate::error::CatalogError;
use crate::item::{CatalogItem, Ingredient, Location, Soil, Stage, Weather};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

fn document_id(document: &Value) -> String {
    document
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or("<missing>")
        .to_string()
}

fn reject_duplicates<T: CatalogItem>(collection: &str, items: &[T]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(items.len());
    match items.iter().find(|item| !seen.insert(item.identifier())) {
        Some(item) => Err(CatalogError::DuplicateIdentifier {
            collection: collection.to_string(),
            id: item.identifier().to_string(),
        }),
        None => Ok(()),
    }
}

/// Decode raw documents into catalog items
///
/// # Errors
/// - [`CatalogError::InvalidDocument`] if a document does not decode
/// - [`CatalogError::DuplicateIdentifier`] if two documents share an id
pub fn decode_items<T>(collection: &str, documents: Vec<Value>) -> Result<Vec<T>, CatalogError>
where
    T: CatalogItem + DeserializeOwned,
{
    let items = documents
        .into_iter()
        .map(|document| {
            let id = document_id(&document);
            serde_json::from_value(document).map_err(|e| CatalogError::InvalidDocument {
                collection: collection.to_string(),
                id,
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<T>, _>>()?;

    reject_duplicates(collection, &items)?;
    Ok(items)
}

/// Decode raw documents, skipping the ones that do not decode
///
/// Each skipped document is logged with its id and the decode error, so one
/// bad record cannot hide the rest of its collection.
///
/// # Errors
/// [`CatalogError::DuplicateIdentifier`] if two decoded documents share an id
pub fn decode_valid_items<T>(collection: &str, documents: Vec<Value>) -> Result<Vec<T>, CatalogError>
where
    T: CatalogItem + DeserializeOwned,
{
    let items: Vec<T> = documents
        .into_iter()
        .filter_map(|document| {
            let id = document_id(&document);
            match serde_json::from_value(document) {
                Ok(item) => Some(item),
                Err(err) => {
                    tracing::warn!(
                        collection = %collection,
                        id = %id,
                        error = %err,
                        "skipping malformed catalog document"
                    );
                    None
                }
            }
        })
        .collect();

    reject_duplicates(collection, &items)?;
    Ok(items)
}

/// Snapshot of every selectable category
#[derive(Debug, Clone, Default)]
pub struct ReferenceCatalog {
    locations: Arc<[Location]>,
    soils: Arc<[Soil]>,
    weathers: Arc<[Weather]>,
    ingredients: Arc<[Ingredient]>,
    stages: Arc<[Stage]>,
}

impl ReferenceCatalog {
    /// Create catalog from decoded items
    #[must_use]
    pub fn new(
        locations: Vec<Location>,
        soils: Vec<Soil>,
        weathers: Vec<Weather>,
        ingredients: Vec<Ingredient>,
        stages: Vec<Stage>,
    ) -> Self {
        Self {
            locations: locations.into(),
            soils: soils.into(),
            weathers: weathers.into(),
            ingredients: ingredients.into(),
            stages: stages.into(),
        }
    }

    /// Locations
    #[inline]
    #[must_use]
    pub fn locations(&self) -> Arc<[Location]> {
        Arc::clone(&self.locations)
    }

    /// Soils
    #[inline]
    #[must_use]
    pub fn soils(&self) -> Arc<[Soil]> {
        Arc::clone(&self.soils)
    }

    /// Weathers
    #[inline]
    #[must_use]
    pub fn weathers(&self) -> Arc<[Weather]> {
        Arc::clone(&self.weathers)
    }

    /// Ingredients
    #[inline]
    #[must_use]
    pub fn ingredients(&self) -> Arc<[Ingredient]> {
        Arc::clone(&self.ingredients)
    }

    /// Stages
    #[inline]
    #[must_use]
    pub fn stages(&self) -> Arc<[Stage]> {
        Arc::clone(&self.stages)
    }

    /// Item count of one category
    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Location => self.locations.len(),
            Category::Soil => self.soils.len(),
            Category::Weather => self.weathers.len(),
            Category::Ingredient => self.ingredients.len(),
            Category::Stage => self.stages.len(),
        }
    }

    /// Categories with no items at all
    ///
    /// A composition cannot pass the completeness gate while any of these is
    /// empty.
    #[must_use]
    pub fn empty_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.count(*c) == 0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::TagItem;
    use serde_json::json;

    #[test]
    fn decode_reports_document_id() {
        let docs = vec![
            json!({"id": "i1", "title": "Urea", "price": "10", "quantity": "1", "unit": "kg"}),
            json!({"id": "i2", "title": "Lime", "price": "ten", "quantity": "1", "unit": "kg"}),
        ];
        let err = decode_items::<Ingredient>("riceSeedIngredients", docs).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidDocument { ref id, .. } if id == "i2"
        ));
    }

    #[test]
    fn lenient_decode_skips_bad_documents() {
        let docs = vec![
            json!({"id": "i1", "title": "Urea", "price": "10", "quantity": "1", "unit": "kg"}),
            json!({"id": "i2", "title": "Lime", "price": "ten", "quantity": "1", "unit": "kg"}),
            json!({"id": "i3", "title": "Ash", "price": 0.5, "quantity": 2, "unit": "kg"}),
        ];
        let items = decode_valid_items::<Ingredient>("riceSeedIngredients", docs).unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["i1", "i3"]);
    }

    #[test]
    fn lenient_decode_skips_stage_with_inverted_task() {
        let docs = vec![
            json!({"id": "st1", "stageName": "Broken", "period": "1", "tasks": [
                {"id": "t1", "task": "Sow", "repeat": "1", "startDate": "5", "endDate": "1"}
            ]}),
            json!({"id": "st2", "stageName": "Fine", "period": "2", "tasks": []}),
        ];
        let stages = decode_valid_items::<Stage>("stage", docs).unwrap();
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].id(), "st2");
    }

    #[test]
    fn lenient_decode_still_rejects_duplicates() {
        let docs = vec![
            json!({"id": "l1", "name": "A"}),
            json!({"id": "l1", "name": "B"}),
        ];
        let err = decode_valid_items::<TagItem>("locations", docs).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateIdentifier { ref id, .. } if id == "l1"));
    }

    #[test]
    fn decode_rejects_duplicates() {
        let docs = vec![
            json!({"id": "l1", "name": "A"}),
            json!({"id": "l1", "name": "B"}),
        ];
        let err = decode_items::<TagItem>("locations", docs).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateIdentifier { .. }));
    }

    #[test]
    fn counts_and_empty_categories() {
        let catalog = ReferenceCatalog::new(
            vec![TagItem::new("l1", "A")],
            vec![],
            vec![TagItem::new("w1", "Dry")],
            vec![],
            vec![],
        );
        assert_eq!(catalog.count(Category::Location), 1);
        assert_eq!(
            catalog.empty_categories(),
            vec![Category::Soil, Category::Ingredient, Category::Stage]
        );
    }
}
