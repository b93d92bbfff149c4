//! Persisted rice seed document (the wire contract)

use crate::fields::ScalarFields;
use indexmap::IndexMap;
use seed_catalog::{Decimal, Ingredient, Stage};
use serde::{Deserialize, Deserializer, Serialize};
use serde_with::{serde_as, DeserializeAs, PickFirst};

/// Ingredient values copied at build time
///
/// Decoupled from the live catalog item, so later catalog edits do not alter
/// saved compositions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSnapshot {
    /// Unit price
    pub price: Decimal,
    /// Amount
    pub quantity: Decimal,
    /// Ingredient title
    pub title: String,
    /// Unit of `quantity`
    pub unit: String,
}

impl FeeSnapshot {
    /// Copy the priced fields of an ingredient
    #[must_use]
    pub fn capture(ingredient: &Ingredient) -> Self {
        Self {
            price: ingredient.price,
            quantity: ingredient.quantity,
            title: ingredient.title.clone(),
            unit: ingredient.unit.clone(),
        }
    }
}

/// `{ "fee": { ... } }` entry of the ingredient list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientFee {
    /// Snapshot
    pub fee: FeeSnapshot,
}

/// Reads a JSON number into its decimal text
///
/// Scalar fields are written as strings, but hand-edited documents sometimes
/// hold plain numbers.
struct NumberAsText;

impl<'de> DeserializeAs<'de, String> for NumberAsText {
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        serde_json::Number::deserialize(deserializer).map(|number| number.to_string())
    }
}

/// Stored composition document
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiceSeedDocument {
    /// Document identifier
    pub id: String,
    /// Rice seed name
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Crop yield as text
    #[serde_as(deserialize_as = "PickFirst<(_, NumberAsText)>")]
    pub crop_yields: String,
    /// Sell price as text
    #[serde_as(deserialize_as = "PickFirst<(_, NumberAsText)>")]
    pub sell_price: String,
    /// Buy price as text
    #[serde_as(deserialize_as = "PickFirst<(_, NumberAsText)>")]
    pub buy_price: String,
    /// Location name → true
    #[serde(default)]
    pub locations: IndexMap<String, bool>,
    /// Soil name → true
    #[serde(default)]
    pub soils: IndexMap<String, bool>,
    /// Weather name → true
    #[serde(default)]
    pub weathers: IndexMap<String, bool>,
    /// Ingredient snapshots in catalog order
    #[serde(default)]
    pub ingredients: Vec<IngredientFee>,
    /// Stages in catalog order
    #[serde(default)]
    pub stages: Vec<Stage>,
    /// Formatted ingredient total
    #[serde(default)]
    #[serde_as(deserialize_as = "PickFirst<(_, NumberAsText)>")]
    pub ingredient_total_price: String,
}

fn flagged(map: &IndexMap<String, bool>) -> impl Iterator<Item = &str> {
    map.iter()
        .filter(|(_, flag)| **flag)
        .map(|(name, _)| name.as_str())
}

impl RiceSeedDocument {
    /// Scalar field text as loaded, for editing
    #[must_use]
    pub fn scalar_fields(&self) -> ScalarFields {
        ScalarFields {
            name: self.name.clone(),
            description: self.description.clone(),
            crop_yield: self.crop_yields.clone(),
            sell_price: self.sell_price.clone(),
            buy_price: self.buy_price.clone(),
        }
    }

    /// Selected location names
    pub fn location_names(&self) -> impl Iterator<Item = &str> {
        flagged(&self.locations)
    }

    /// Selected soil names
    pub fn soil_names(&self) -> impl Iterator<Item = &str> {
        flagged(&self.soils)
    }

    /// Selected weather names
    pub fn weather_names(&self) -> impl Iterator<Item = &str> {
        flagged(&self.weathers)
    }

    /// Selected ingredient titles
    pub fn ingredient_titles(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|entry| entry.fee.title.as_str())
    }

    /// Selected stage names
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(Stage::stage_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stored() -> serde_json::Value {
        json!({
            "id": "r1",
            "name": "Jasmine",
            "description": "Fragrant",
            "cropYields": 4,
            "sellPrice": "12",
            "buyPrice": "8",
            "locations": {"A": true, "B": false},
            "soils": {"Clay": true},
            "weathers": {"Wet": true},
            "ingredients": [
                {"fee": {"price": "10", "quantity": "2", "title": "Urea", "unit": "kg"}}
            ],
            "stages": [],
            "ingredientTotalPrice": "10"
        })
    }

    #[test]
    fn decodes_legacy_numbers() {
        let doc: RiceSeedDocument = serde_json::from_value(stored()).unwrap();
        assert_eq!(doc.crop_yields, "4");
        assert_eq!(doc.scalar_fields().crop_yield, "4");
    }

    #[test]
    fn rejects_non_scalar_text() {
        let mut value = stored();
        value["sellPrice"] = json!({"amount": 12});
        assert!(serde_json::from_value::<RiceSeedDocument>(value).is_err());
    }

    #[test]
    fn only_true_flags_are_selected() {
        let doc: RiceSeedDocument = serde_json::from_value(stored()).unwrap();
        assert_eq!(doc.location_names().collect::<Vec<_>>(), vec!["A"]);
        assert_eq!(doc.ingredient_titles().collect::<Vec<_>>(), vec!["Urea"]);
    }

    #[test]
    fn encodes_wire_field_names() {
        let doc: RiceSeedDocument = serde_json::from_value(stored()).unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["cropYields"], "4");
        assert_eq!(value["ingredientTotalPrice"], "10");
        assert_eq!(value["ingredients"][0]["fee"]["price"], "10");
    }
}
