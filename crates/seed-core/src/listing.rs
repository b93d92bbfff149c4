//! Stored composition listing

use crate::config::AdminConfig;
use crate::error::AdminError;
use crate::loader::CatalogLoader;
use crate::store::DocumentStore;
use seed_composition::RiceSeedDocument;
use serde::Serialize;

/// One flattened row of the composition list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiceSeedSummary {
    /// Document identifier
    pub id: String,
    /// Name
    pub name: String,
    /// Description
    pub description: String,
    /// Crop yield
    pub crop_yields: String,
    /// Sell price
    pub sell_price: String,
    /// Buy price
    pub buy_price: String,
    /// Ingredient total
    pub ingredient_total_price: String,
    /// Ingredient titles, comma separated
    pub ingredients: String,
    /// Stage names, comma separated
    pub stages: String,
    /// Location names, comma separated
    pub locations: String,
    /// Soil names, comma separated
    pub soils: String,
    /// Weather names, comma separated
    pub weathers: String,
}

fn join<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

impl From<&RiceSeedDocument> for RiceSeedSummary {
    fn from(document: &RiceSeedDocument) -> Self {
        Self {
            id: document.id.clone(),
            name: document.name.clone(),
            description: document.description.clone(),
            crop_yields: document.crop_yields.clone(),
            sell_price: document.sell_price.clone(),
            buy_price: document.buy_price.clone(),
            ingredient_total_price: document.ingredient_total_price.clone(),
            ingredients: join(document.ingredient_titles()),
            stages: join(document.stage_names()),
            locations: join(document.location_names()),
            soils: join(document.soil_names()),
            weathers: join(document.weather_names()),
        }
    }
}

/// Summaries of every stored composition, in store order
///
/// Documents that fail to decode are skipped with a warning.
///
/// # Errors
/// [`AdminError::Persistence`] if the fetch fails
pub async fn list_compositions(
    store: &dyn DocumentStore,
    config: &AdminConfig,
) -> Result<Vec<RiceSeedSummary>, AdminError> {
    let collection = &config.collections.rice_seeds;
    let documents = store.fetch_all(collection).await?;
    let total = documents.len();

    let rows: Vec<RiceSeedSummary> = documents
        .into_iter()
        .filter_map(|document| {
            let id = document.get("id").cloned();
            match serde_json::from_value::<RiceSeedDocument>(document) {
                Ok(decoded) => Some(RiceSeedSummary::from(&decoded)),
                Err(err) => {
                    tracing::warn!(collection = %collection, id = ?id, error = %err, "skipping malformed composition");
                    None
                }
            }
        })
        .collect();
    tracing::debug!(total, listed = rows.len(), "compositions listed");
    Ok(rows)
}

/// One stored composition
///
/// # Errors
/// [`AdminError::Persistence`] if missing, [`AdminError::Catalog`] if malformed
pub async fn find_composition(
    store: &dyn DocumentStore,
    config: &AdminConfig,
    id: &str,
) -> Result<RiceSeedDocument, AdminError> {
    CatalogLoader::new(store, config).load_composition(id).await
}

/// Delete one stored composition
///
/// # Errors
/// [`AdminError::Unauthorized`] if `is_authorized` is false,
/// [`AdminError::Persistence`] if it is missing or the delete fails
pub async fn delete_composition(
    store: &dyn DocumentStore,
    config: &AdminConfig,
    id: &str,
    is_authorized: bool,
) -> Result<(), AdminError> {
    if !is_authorized {
        tracing::warn!(id, "composition delete refused: not authorized");
        return Err(AdminError::Unauthorized);
    }
    store.delete(&config.collections.rice_seeds, id).await?;
    tracing::info!(id, "composition deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryDocumentStore;
    use serde_json::json;

    fn document(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Jasmine",
            "description": "Fragrant",
            "cropYields": "4",
            "sellPrice": "12",
            "buyPrice": "8",
            "locations": {"A": true, "B": true},
            "soils": {"X": true},
            "weathers": {"Y": true},
            "ingredients": [
                {"fee": {"price": "10", "quantity": "1", "title": "I1", "unit": "kg"}},
                {"fee": {"price": "5", "quantity": "1", "title": "I2", "unit": "kg"}}
            ],
            "stages": [],
            "ingredientTotalPrice": "15"
        })
    }

    #[tokio::test]
    async fn rows_are_flattened() {
        let store = InMemoryDocumentStore::new();
        store.seed("riceSeed", vec![document("r1")]).unwrap();
        let rows = list_compositions(&store, &AdminConfig::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ingredients, "I1, I2");
        assert_eq!(rows[0].locations, "A, B");
        assert_eq!(rows[0].stages, "");
    }

    #[tokio::test]
    async fn malformed_rows_are_skipped() {
        let store = InMemoryDocumentStore::new();
        store
            .seed("riceSeed", vec![document("r1"), json!({"id": "bad"})])
            .unwrap();
        let rows = list_compositions(&store, &AdminConfig::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn delete_requires_authorization() {
        let store = InMemoryDocumentStore::new();
        store.seed("riceSeed", vec![document("r1")]).unwrap();
        let config = AdminConfig::default();

        assert!(matches!(
            delete_composition(&store, &config, "r1", false).await,
            Err(AdminError::Unauthorized)
        ));
        delete_composition(&store, &config, "r1", true).await.unwrap();
        assert!(find_composition(&store, &config, "r1").await.is_err());
    }
}
