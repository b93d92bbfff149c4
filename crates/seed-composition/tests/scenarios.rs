//! End-to-end composition scenarios over the shared example catalog

use pretty_assertions::assert_eq;
use seed_catalog::{Category, SelectionSet};
use seed_composition::{
    Baseline, CompositeRecordBuilder, CompositionError, CompositionValidator, Origin,
    RiceSeedDocument, Selections, StageTaskComposer, TaskPicker, WritePayload,
};
use seed_test_utils::{
    choose_all_but_b, day, example_catalog, example_tasks, filled_scalars, stored_composition,
};
use std::collections::BTreeSet;

#[test]
fn test_all_but_one_location_builds_total_of_fifteen() {
    let mut selections = Selections::from_catalog(&example_catalog());
    choose_all_but_b(&mut selections);

    let gate = CompositionValidator::evaluate(&filled_scalars(), &selections, &Origin::New);
    assert!(gate.is_open());

    let payload = CompositeRecordBuilder::build(&filled_scalars(), &selections, &Origin::New)
        .unwrap()
        .to_payload()
        .unwrap();
    let WritePayload::Insert { document, .. } = payload else {
        panic!("new composition must insert");
    };
    assert_eq!(document["ingredientTotalPrice"], "15");
    assert_eq!(document["locations"], serde_json::json!({"A": true}));
    assert_eq!(document["ingredients"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_picker_round_trip_sets_stage_span() {
    let mut composer = StageTaskComposer::new();
    composer.set_stage_name("Vegetative");

    let preselected = composer.begin_picking().unwrap();
    let mut picker = TaskPicker::open(example_tasks(), &preselected);
    picker.select_all();
    composer.resume(picker.finish()).unwrap();

    let span = composer.span().unwrap();
    assert_eq!((span.start, span.end), (day(1), day(5)));

    let preselected = composer.begin_picking().unwrap();
    assert_eq!(preselected, BTreeSet::from(["T1".to_string(), "T2".to_string()]));
    let mut picker = TaskPicker::open(example_tasks(), &preselected);
    picker.toggle("T2", false);
    composer.resume(picker.finish()).unwrap();

    let span = composer.span().unwrap();
    assert_eq!((span.start, span.end), (day(3), day(5)));

    let stage = composer.build().unwrap();
    let encoded = serde_json::to_value(&stage).unwrap();
    assert_eq!(encoded["startDate"], day(3).to_string());
    assert_eq!(encoded["tasks"].as_array().map(Vec::len), Some(1));
    assert!(encoded["tasks"][0].get("chosen").is_none());
}

#[test]
fn test_existing_composition_marks_only_stored_names() {
    let document: RiceSeedDocument = serde_json::from_value(stored_composition("r1")).unwrap();
    let mut selections = Selections::from_catalog(&example_catalog());
    selections.mark_from_document(&document);

    assert!(selections.locations.is_chosen("loc-a"));
    assert!(!selections.locations.is_chosen("loc-b"));
    assert_eq!(
        selections.chosen_identifiers(Category::Ingredient),
        BTreeSet::from(["ing-1".to_string()])
    );
    assert!(selections.stages.is_chosen("stage-1"));
}

#[test]
fn test_unmodified_existing_composition_keeps_gate_closed() {
    let document: RiceSeedDocument = serde_json::from_value(stored_composition("r1")).unwrap();
    let mut selections = Selections::from_catalog(&example_catalog());
    selections.mark_from_document(&document);
    let scalars = document.scalar_fields();
    let origin = Origin::Existing {
        id: document.id.clone(),
        baseline: Baseline::capture(&scalars, &selections),
    };

    let gate = CompositionValidator::evaluate(&scalars, &selections, &origin);
    assert!(!gate.is_open());
    assert_eq!(
        CompositeRecordBuilder::build(&scalars, &selections, &origin),
        Err(CompositionError::Unchanged)
    );

    selections.toggle(Category::Location, "loc-b", true);
    let payload = CompositeRecordBuilder::build(&scalars, &selections, &origin)
        .unwrap()
        .to_payload()
        .unwrap();
    assert_eq!(payload.id(), "r1");
    assert!(!payload.is_insert());
}

#[test]
fn test_catalog_reuse_does_not_leak_selections() {
    let catalog = example_catalog();
    let mut first = Selections::from_catalog(&catalog);
    choose_all_but_b(&mut first);

    let second = Selections::from_catalog(&catalog);
    assert_eq!(second.missing_categories(), Category::ALL.to_vec());

    let shared: SelectionSet<_> = SelectionSet::from_items(catalog.locations());
    assert!(!shared.has_any_chosen());
}
