//! Composition drafts read from JSON
//!
//! A draft names its selections the way stored compositions do: locations,
//! soils and weathers by name, ingredients by title, stages by stage name.
//! Applying a draft replaces every scalar field and every category of the
//! session.

use crate::error::ToolError;
use seed_catalog::{CatalogItem, Category};
use seed_composition::ScalarField;
use seed_core::CompositionSession;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete composition as written by an operator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompositionDraft {
    /// Rice seed name
    pub name: String,
    /// Description
    pub description: String,
    /// Crop yield, decimal text
    pub crop_yields: String,
    /// Sell price, decimal text
    pub sell_price: String,
    /// Buy price, decimal text
    pub buy_price: String,
    /// Location names
    pub locations: Vec<String>,
    /// Soil names
    pub soils: Vec<String>,
    /// Weather names
    pub weathers: Vec<String>,
    /// Ingredient titles
    pub ingredients: Vec<String>,
    /// Stage names
    pub stages: Vec<String>,
}

impl CompositionDraft {
    /// Parse a draft
    ///
    /// # Errors
    /// [`ToolError::Json`] if `text` is not a draft object
    pub fn from_json(text: &str) -> Result<Self, ToolError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a draft file
    ///
    /// # Errors
    /// [`ToolError::Io`] or [`ToolError::Json`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ToolError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Text for one scalar field
    #[must_use]
    pub fn field(&self, field: ScalarField) -> &str {
        match field {
            ScalarField::Name => &self.name,
            ScalarField::Description => &self.description,
            ScalarField::CropYield => &self.crop_yields,
            ScalarField::SellPrice => &self.sell_price,
            ScalarField::BuyPrice => &self.buy_price,
        }
    }

    /// Keys listed for `category`
    #[must_use]
    pub fn keys(&self, category: Category) -> &[String] {
        match category {
            Category::Location => &self.locations,
            Category::Soil => &self.soils,
            Category::Weather => &self.weathers,
            Category::Ingredient => &self.ingredients,
            Category::Stage => &self.stages,
        }
    }

    /// Write the draft into `session`
    ///
    /// Every key is resolved before the session is touched, so an unknown
    /// key leaves the session as it was.
    ///
    /// # Errors
    /// [`ToolError::UnknownKey`] for the first key with no catalog item
    pub fn apply(&self, session: &CompositionSession) -> Result<(), ToolError> {
        let catalog = session.catalog();
        let mut resolved = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let keys = self.keys(category);
            let ids = match category {
                Category::Location => resolve(category, &catalog.locations(), keys)?,
                Category::Soil => resolve(category, &catalog.soils(), keys)?,
                Category::Weather => resolve(category, &catalog.weathers(), keys)?,
                Category::Ingredient => resolve(category, &catalog.ingredients(), keys)?,
                Category::Stage => resolve(category, &catalog.stages(), keys)?,
            };
            resolved.push((category, ids));
        }

        for field in ScalarField::ALL {
            session.set_field(field, self.field(field));
        }
        for (category, ids) in resolved {
            session.clear(category);
            for id in ids {
                session.toggle(category, &id, true);
            }
        }
        tracing::debug!(name = %self.name, "draft applied");
        Ok(())
    }
}

/// Identifiers of every item whose selection key is listed in `keys`
///
/// Catalog names are not unique, so one key may resolve to several items.
fn resolve<T: CatalogItem>(
    category: Category,
    items: &[T],
    keys: &[String],
) -> Result<Vec<String>, ToolError> {
    let mut ids = Vec::new();
    for key in keys {
        let before = ids.len();
        ids.extend(
            items
                .iter()
                .filter(|item| item.selection_key() == key.as_str())
                .map(|item| item.identifier().to_string()),
        );
        if ids.len() == before {
            return Err(ToolError::UnknownKey {
                category,
                key: key.clone(),
            });
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seed_catalog::TagItem;

    #[test]
    fn missing_fields_default_to_empty() {
        let draft = CompositionDraft::from_json(r#"{"name": "Jasmine", "soils": ["X"]}"#).unwrap();
        assert_eq!(draft.field(ScalarField::Name), "Jasmine");
        assert_eq!(draft.field(ScalarField::SellPrice), "");
        assert_eq!(draft.keys(Category::Soil), ["X".to_string()]);
        assert!(draft.keys(Category::Stage).is_empty());
    }

    #[test]
    fn resolve_matches_every_item_with_the_key() {
        let items = vec![
            TagItem::new("l1", "A"),
            TagItem::new("l2", "B"),
            TagItem::new("l3", "A"),
        ];
        let ids = resolve(Category::Location, &items, &["A".to_string()]).unwrap();
        assert_eq!(ids, vec!["l1".to_string(), "l3".to_string()]);
    }

    #[test]
    fn resolve_rejects_unknown_key() {
        let items = vec![TagItem::new("l1", "A")];
        let err = resolve(Category::Location, &items, &["Z".to_string()]).unwrap_err();
        assert!(matches!(err, ToolError::UnknownKey { key, .. } if key == "Z"));
    }
}
