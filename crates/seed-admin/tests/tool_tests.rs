use pretty_assertions::assert_eq;
use seed_admin::{catalog_report, compose, load_store, save_store, CompositionDraft, ToolError};
use seed_catalog::Category;
use seed_composition::CompositionError;
use seed_core::{
    list_compositions, AdminConfig, AdminError, DocumentStore, SessionTarget,
};
use seed_test_utils::{example_snapshot, example_store_with_composition};
use std::sync::Arc;

fn draft() -> CompositionDraft {
    CompositionDraft::from_json(
        r#"{
            "name": "Jasmine",
            "description": "Fragrant long grain",
            "cropYields": "4",
            "sellPrice": "12",
            "buyPrice": "8",
            "locations": ["A"],
            "soils": ["X"],
            "weathers": ["Y"],
            "ingredients": ["I1", "I2"],
            "stages": ["S1"]
        }"#,
    )
    .unwrap()
}

#[tokio::test]
async fn test_compose_round_trips_through_snapshot_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, example_snapshot().to_string()).unwrap();

    let store = Arc::new(load_store(&path).unwrap());
    let receipt = compose(
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        AdminConfig::default(),
        &draft(),
        SessionTarget::New,
        true,
    )
    .await
    .unwrap();
    assert!(receipt.inserted);
    assert_eq!(receipt.ingredient_total_price.to_string(), "15");
    save_store(&store, &path).unwrap();

    let reloaded = load_store(&path).unwrap();
    let rows = list_compositions(&reloaded, &AdminConfig::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, receipt.id);
    assert_eq!(rows[0].locations, "A");
    assert_eq!(rows[0].ingredients, "I1, I2");
}

#[tokio::test]
async fn test_compose_updates_existing_record() {
    let store = Arc::new(example_store_with_composition("r1"));
    let mut changed = draft();
    changed.locations = vec!["A".to_string(), "B".to_string()];

    let receipt = compose(
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        AdminConfig::default(),
        &changed,
        SessionTarget::Existing("r1".to_string()),
        true,
    )
    .await
    .unwrap();
    assert!(!receipt.inserted);
    assert_eq!(store.document_count("riceSeed"), 1);

    let stored = store.fetch_one("riceSeed", "r1").await.unwrap();
    assert_eq!(stored["locations"]["B"], true);
    assert_eq!(stored["ingredientTotalPrice"], "15");
}

#[tokio::test]
async fn test_unknown_name_writes_nothing() {
    let store = Arc::new(example_store_with_composition("r1"));
    let mut bad = draft();
    bad.soils = vec!["Sand".to_string()];

    let err = compose(
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        AdminConfig::default(),
        &bad,
        SessionTarget::New,
        true,
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        ToolError::UnknownKey { category: Category::Soil, ref key } if key == "Sand"
    ));
    assert_eq!(store.write_count(), 0);
}

#[tokio::test]
async fn test_incomplete_draft_is_refused() {
    let store = Arc::new(example_store_with_composition("r1"));
    let mut partial = draft();
    partial.stages.clear();

    let err = compose(
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        AdminConfig::default(),
        &partial,
        SessionTarget::New,
        true,
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        ToolError::Admin(AdminError::Composition(CompositionError::Incomplete { .. }))
    ));
}

#[tokio::test]
async fn test_read_only_compose_is_refused() {
    let store = Arc::new(example_store_with_composition("r1"));
    let err = compose(
        Arc::clone(&store) as Arc<dyn DocumentStore>,
        AdminConfig::default(),
        &draft(),
        SessionTarget::New,
        false,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ToolError::Admin(AdminError::Unauthorized)));
}

#[tokio::test]
async fn test_catalog_report_counts_example_store() {
    let store = load_store_from(example_snapshot());
    let report = catalog_report(&store, &AdminConfig::default()).await.unwrap();
    assert_eq!(
        report.counts,
        vec![
            (Category::Location, 2),
            (Category::Soil, 1),
            (Category::Weather, 1),
            (Category::Ingredient, 2),
            (Category::Stage, 1),
        ]
    );
    assert_eq!(report.task_count, 2);
    assert!(report.empty_categories().is_empty());
}

fn load_store_from(snapshot: serde_json::Value) -> seed_core::InMemoryDocumentStore {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, snapshot.to_string()).unwrap();
    load_store(&path).unwrap()
}
