//! Composite record assembly
//!
//! Builds the persisted composition from the scalar fields and the five
//! selection sets once the gate is open. Ingredient values are snapshotted so
//! the stored record does not follow later catalog edits.

use crate::aggregator::IngredientAggregator;
use crate::document::{FeeSnapshot, IngredientFee, RiceSeedDocument};
use crate::error::CompositionError;
use crate::fields::ScalarFields;
use crate::payload::{new_document_id, WritePayload};
use crate::selections::Selections;
use crate::validator::{CompositionValidator, Origin};
use indexmap::IndexMap;
use seed_catalog::{CatalogItem, Decimal, SelectionSet, Stage, TagItem};

/// Chosen ingredient with its price snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientSnapshot {
    /// Catalog identifier at build time
    pub ingredient_ref: String,
    /// Copied values
    pub fee: FeeSnapshot,
}

/// Assembled composition, ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiceSeedComposition {
    /// Document identifier (fresh for new records)
    pub identifier: String,
    /// Whether this is an insert
    pub is_new: bool,
    /// Trimmed name
    pub name: String,
    /// Trimmed description
    pub description: String,
    /// Crop yield
    pub crop_yield: Decimal,
    /// Sell price
    pub sell_price: Decimal,
    /// Buy price
    pub buy_price: Decimal,
    /// Location names in catalog order
    pub selected_locations: Vec<String>,
    /// Soil names in catalog order
    pub selected_soils: Vec<String>,
    /// Weather names in catalog order
    pub selected_weathers: Vec<String>,
    /// Ingredient snapshots in catalog order
    pub selected_ingredients: Vec<IngredientSnapshot>,
    /// Stages in catalog order
    pub selected_stages: Vec<Stage>,
    /// Sum of snapshot prices
    pub ingredient_total_price: Decimal,
}

fn name_flags(names: &[String]) -> IndexMap<String, bool> {
    names.iter().map(|name| (name.clone(), true)).collect()
}

fn chosen_names(set: &SelectionSet<TagItem>) -> Vec<String> {
    set.chosen_items()
        .into_iter()
        .map(|item| item.selection_key().to_string())
        .collect()
}

impl RiceSeedComposition {
    /// Persisted shape
    #[must_use]
    pub fn to_document(&self) -> RiceSeedDocument {
        RiceSeedDocument {
            id: self.identifier.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            crop_yields: self.crop_yield.normalize().to_string(),
            sell_price: self.sell_price.normalize().to_string(),
            buy_price: self.buy_price.normalize().to_string(),
            locations: name_flags(&self.selected_locations),
            soils: name_flags(&self.selected_soils),
            weathers: name_flags(&self.selected_weathers),
            ingredients: self
                .selected_ingredients
                .iter()
                .map(|snapshot| IngredientFee {
                    fee: snapshot.fee.clone(),
                })
                .collect(),
            stages: self.selected_stages.clone(),
            ingredient_total_price: self.ingredient_total_price.normalize().to_string(),
        }
    }

    /// Insert for a new record, update keyed by identifier otherwise
    ///
    /// # Errors
    /// [`CompositionError::Encoding`] if the document cannot be encoded
    pub fn to_payload(&self) -> Result<WritePayload, CompositionError> {
        WritePayload::from_document(&self.to_document(), self.is_new)
    }
}

/// Assembles [`RiceSeedComposition`] records
#[derive(Debug, Clone, Copy, Default)]
pub struct CompositeRecordBuilder;

impl CompositeRecordBuilder {
    /// Build from the current session state
    ///
    /// # Errors
    /// The gate's blocking reason when it is closed
    pub fn build(
        scalars: &ScalarFields,
        selections: &Selections,
        origin: &Origin,
    ) -> Result<RiceSeedComposition, CompositionError> {
        CompositionValidator::evaluate(scalars, selections, origin).into_result()?;
        let parsed = scalars.parse()?;

        let identifier = origin
            .id()
            .map_or_else(new_document_id, str::to_string);
        let selected_ingredients = selections
            .ingredients
            .chosen_items()
            .into_iter()
            .map(|ingredient| IngredientSnapshot {
                ingredient_ref: ingredient.identifier().to_string(),
                fee: FeeSnapshot::capture(ingredient),
            })
            .collect();

        let composition = RiceSeedComposition {
            identifier,
            is_new: origin.is_new(),
            name: parsed.name,
            description: parsed.description,
            crop_yield: parsed.crop_yield,
            sell_price: parsed.sell_price,
            buy_price: parsed.buy_price,
            selected_locations: chosen_names(&selections.locations),
            selected_soils: chosen_names(&selections.soils),
            selected_weathers: chosen_names(&selections.weathers),
            selected_ingredients,
            selected_stages: selections
                .stages
                .chosen_items()
                .into_iter()
                .cloned()
                .collect(),
            ingredient_total_price: IngredientAggregator::total_price(&selections.ingredients),
        };
        tracing::debug!(
            id = %composition.identifier,
            is_new = composition.is_new,
            total = %composition.ingredient_total_price,
            "composition built"
        );
        Ok(composition)
    }
}
