//! Testing utilities for the rice seed admin workspace
//!
//! Shared fixtures: a small reference catalog, the matching store snapshot,
//! and filled-in scalar fields.

#![allow(missing_docs)]

use seed_catalog::{
    Decimal, Ingredient, Period, ReferenceCatalog, Stage, StageTask, TagItem, TaskDate,
};
use seed_composition::{ScalarFields, Selections};
use seed_core::{AdminConfig, InMemoryDocumentStore};
use serde_json::{json, Value};

pub fn day(index: i64) -> TaskDate {
    TaskDate::from_day_index(index).unwrap()
}

pub fn task(id: &str, start: i64, end: i64) -> StageTask {
    StageTask::new(id, format!("task {id}"), 1, day(start), day(end)).unwrap()
}

pub fn tag(id: &str, name: &str) -> TagItem {
    TagItem::new(id, name)
}

pub fn ingredient(id: &str, title: &str, price: &str) -> Ingredient {
    Ingredient::new(id, title, price.parse().unwrap(), Decimal::ONE, "kg")
}

pub fn stage(id: &str, name: &str, tasks: Vec<StageTask>) -> Stage {
    Stage::new(id, name, Period::First, tasks)
}

/// Locations {A, B}, soils {X}, weathers {Y}, ingredients {I1: 10, I2: 5},
/// stages {S1 with one task}
pub fn example_catalog() -> ReferenceCatalog {
    ReferenceCatalog::new(
        vec![tag("loc-a", "A"), tag("loc-b", "B")],
        vec![tag("soil-x", "X")],
        vec![tag("weather-y", "Y")],
        vec![ingredient("ing-1", "I1", "10"), ingredient("ing-2", "I2", "5")],
        vec![stage("stage-1", "S1", vec![task("task-0", 0, 2)])],
    )
}

/// Picker tasks T1 {3..5} and T2 {1..4}
pub fn example_tasks() -> Vec<StageTask> {
    vec![task("T1", 3, 5), task("T2", 1, 4)]
}

fn documents<T: serde::Serialize>(items: &[T]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|item| serde_json::to_value(item).unwrap())
            .collect(),
    )
}

/// Store snapshot holding [`example_catalog`] and [`example_tasks`] under the
/// default collection names
pub fn example_snapshot() -> Value {
    let catalog = example_catalog();
    let names = AdminConfig::default().collections;
    let mut snapshot = serde_json::Map::new();
    snapshot.insert(names.locations, documents(&catalog.locations()));
    snapshot.insert(names.soils, documents(&catalog.soils()));
    snapshot.insert(names.weathers, documents(&catalog.weathers()));
    snapshot.insert(names.ingredients, documents(&catalog.ingredients()));
    snapshot.insert(names.stages, documents(&catalog.stages()));
    snapshot.insert(names.tasks, documents(&example_tasks()));
    Value::Object(snapshot)
}

pub fn example_store() -> InMemoryDocumentStore {
    InMemoryDocumentStore::from_snapshot(example_snapshot()).unwrap()
}

/// Stored composition over the example catalog selecting only location A
pub fn stored_composition(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Jasmine",
        "description": "Fragrant long grain",
        "cropYields": "4",
        "sellPrice": "12",
        "buyPrice": "8",
        "locations": {"A": true},
        "soils": {"X": true},
        "weathers": {"Y": true},
        "ingredients": [
            {"fee": {"price": "10", "quantity": "1", "title": "I1", "unit": "kg"}}
        ],
        "stages": [serde_json::to_value(&example_catalog().stages()[0]).unwrap()],
        "ingredientTotalPrice": "10"
    })
}

/// [`example_store`] with [`stored_composition`] under `id`
pub fn example_store_with_composition(id: &str) -> InMemoryDocumentStore {
    let store = example_store();
    store
        .seed(&AdminConfig::default().collections.rice_seeds, vec![stored_composition(id)])
        .unwrap();
    store
}

pub fn filled_scalars() -> ScalarFields {
    ScalarFields {
        name: "Jasmine".to_string(),
        description: "Fragrant long grain".to_string(),
        crop_yield: "4".to_string(),
        sell_price: "12".to_string(),
        buy_price: "8".to_string(),
    }
}

/// Choose every example item except location B
pub fn choose_all_but_b(selections: &mut Selections) {
    selections.locations.toggle("loc-a", true);
    selections.soils.toggle("soil-x", true);
    selections.weathers.toggle("weather-y", true);
    selections.ingredients.select_all();
    selections.stages.select_all();
}
