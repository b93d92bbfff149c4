//! The five selection sets of one composition

use crate::document::RiceSeedDocument;
use seed_catalog::{Category, CatalogItem, Ingredient, ReferenceCatalog, SelectionSet, Stage, TagItem};
use std::collections::{BTreeMap, BTreeSet};

/// Chosen identifiers per category, used for dirty tracking
pub type SelectionSnapshot = BTreeMap<Category, BTreeSet<String>>;

/// Per-category selection state over one catalog snapshot
#[derive(Debug, Clone, Default)]
pub struct Selections {
    /// Locations
    pub locations: SelectionSet<TagItem>,
    /// Soils
    pub soils: SelectionSet<TagItem>,
    /// Weathers
    pub weathers: SelectionSet<TagItem>,
    /// Ingredients
    pub ingredients: SelectionSet<Ingredient>,
    /// Stages
    pub stages: SelectionSet<Stage>,
}

impl Selections {
    /// Fresh sets over `catalog`, nothing chosen
    #[must_use]
    pub fn from_catalog(catalog: &ReferenceCatalog) -> Self {
        Self {
            locations: SelectionSet::from_items(catalog.locations()),
            soils: SelectionSet::from_items(catalog.soils()),
            weathers: SelectionSet::from_items(catalog.weathers()),
            ingredients: SelectionSet::from_items(catalog.ingredients()),
            stages: SelectionSet::from_items(catalog.stages()),
        }
    }

    /// Set one item's chosen flag; returns whether the identifier matched
    pub fn toggle(&mut self, category: Category, identifier: &str, value: bool) -> bool {
        match category {
            Category::Location => self.locations.toggle(identifier, value),
            Category::Soil => self.soils.toggle(identifier, value),
            Category::Weather => self.weathers.toggle(identifier, value),
            Category::Ingredient => self.ingredients.toggle(identifier, value),
            Category::Stage => self.stages.toggle(identifier, value),
        }
    }

    /// At least one item of `category` chosen
    #[must_use]
    pub fn has_any_chosen(&self, category: Category) -> bool {
        match category {
            Category::Location => self.locations.has_any_chosen(),
            Category::Soil => self.soils.has_any_chosen(),
            Category::Weather => self.weathers.has_any_chosen(),
            Category::Ingredient => self.ingredients.has_any_chosen(),
            Category::Stage => self.stages.has_any_chosen(),
        }
    }

    /// Categories with nothing chosen, in form order
    #[must_use]
    pub fn missing_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| !self.has_any_chosen(*category))
            .collect()
    }

    /// Choose the items of `category` whose selection key is in `keys`
    pub fn mark_chosen_by_keys<I, S>(&mut self, category: Category, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match category {
            Category::Location => self.locations.mark_chosen_by_key(keys, TagItem::selection_key),
            Category::Soil => self.soils.mark_chosen_by_key(keys, TagItem::selection_key),
            Category::Weather => self.weathers.mark_chosen_by_key(keys, TagItem::selection_key),
            Category::Ingredient => {
                self.ingredients.mark_chosen_by_key(keys, Ingredient::selection_key);
            }
            Category::Stage => self.stages.mark_chosen_by_key(keys, Stage::selection_key),
        }
    }

    /// Pre-mark from a persisted composition
    ///
    /// Matching is by name, title and stage name. Keys with no catalog
    /// counterpart are dropped.
    pub fn mark_from_document(&mut self, document: &RiceSeedDocument) {
        self.mark_chosen_by_keys(Category::Location, document.location_names());
        self.mark_chosen_by_keys(Category::Soil, document.soil_names());
        self.mark_chosen_by_keys(Category::Weather, document.weather_names());
        self.mark_chosen_by_keys(Category::Ingredient, document.ingredient_titles());
        self.mark_chosen_by_keys(Category::Stage, document.stage_names());
    }

    /// Unchoose every item of `category`
    pub fn clear(&mut self, category: Category) {
        match category {
            Category::Location => self.locations.clear(),
            Category::Soil => self.soils.clear(),
            Category::Weather => self.weathers.clear(),
            Category::Ingredient => self.ingredients.clear(),
            Category::Stage => self.stages.clear(),
        }
    }

    /// Chosen identifiers of `category`
    #[must_use]
    pub fn chosen_identifiers(&self, category: Category) -> BTreeSet<String> {
        match category {
            Category::Location => self.locations.chosen_identifiers(),
            Category::Soil => self.soils.chosen_identifiers(),
            Category::Weather => self.weathers.chosen_identifiers(),
            Category::Ingredient => self.ingredients.chosen_identifiers(),
            Category::Stage => self.stages.chosen_identifiers(),
        }
    }

    /// Chosen identifiers of every category
    #[must_use]
    pub fn snapshot(&self) -> SelectionSnapshot {
        Category::ALL
            .into_iter()
            .map(|category| (category, self.chosen_identifiers(category)))
            .collect()
    }
}
