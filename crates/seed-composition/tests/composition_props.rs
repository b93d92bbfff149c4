use proptest::prelude::*;
use seed_catalog::{Category, Decimal, Ingredient, SelectionSet, StageSpan, StageTask};
use seed_composition::stage::{allowed_transitions, validate_transition};
use seed_composition::{
    Baseline, ComposerState, CompositionValidator, IngredientAggregator, Origin, ScalarField,
    Selections, StageTaskComposer, TaskPickerOutcome,
};
use seed_test_utils::{day, example_catalog, filled_scalars};

fn priced(prices: &[u32]) -> Vec<Ingredient> {
    prices
        .iter()
        .enumerate()
        .map(|(i, cents)| {
            let price: Decimal = format!("{}.{:02}", cents / 100, cents % 100).parse().unwrap();
            Ingredient::new(format!("ing-{i}"), format!("I{i}"), price, Decimal::ONE, "kg")
        })
        .collect()
}

fn composer_state() -> impl Strategy<Value = ComposerState> {
    prop_oneof![Just(ComposerState::Editing), Just(ComposerState::PickingTasks)]
}

#[test]
fn test_composer_transitions() {
    assert!(validate_transition(ComposerState::Editing, ComposerState::PickingTasks).is_ok());
    assert!(validate_transition(ComposerState::PickingTasks, ComposerState::Editing).is_ok());

    // Self-loops are not transitions
    assert!(validate_transition(ComposerState::PickingTasks, ComposerState::PickingTasks).is_err());
}

proptest! {
    #[test]
    fn prop_transitions_are_subset_of_allowed(from in composer_state(), to in composer_state()) {
        let allowed = allowed_transitions(from);
        prop_assert_eq!(validate_transition(from, to).is_ok(), allowed.contains(&to));
    }

    #[test]
    fn prop_total_is_sum_over_chosen(
        prices in proptest::collection::vec(0u32..100_000, 1..10),
        chosen in proptest::collection::vec(any::<bool>(), 10),
    ) {
        let items = priced(&prices);
        let mut set = SelectionSet::from_items(items.clone());
        let mut expected = Decimal::ZERO;
        for (item, pick) in items.iter().zip(&chosen) {
            set.toggle(&item.id, *pick);
            if *pick {
                expected += item.price;
            }
        }
        prop_assert_eq!(IngredientAggregator::total_price(&set), expected);
    }

    #[test]
    fn prop_total_is_order_independent(
        prices in proptest::collection::vec(0u32..100_000, 1..10),
        rotation in 0usize..10,
    ) {
        let items = priced(&prices);
        let mut rotated = items.clone();
        rotated.rotate_left(rotation % items.len());

        let mut forward = SelectionSet::from_items(items);
        let mut backward = SelectionSet::from_items(rotated);
        forward.select_all();
        backward.select_all();
        prop_assert_eq!(
            IngredientAggregator::total_price(&forward),
            IngredientAggregator::total_price(&backward)
        );
    }

    #[test]
    fn prop_span_tracks_every_replacement(
        picks in proptest::collection::vec(
            proptest::collection::vec((0i64..60, 0i64..30), 0..6),
            1..5,
        ),
    ) {
        let mut composer = StageTaskComposer::new();
        let mut last: Option<Vec<StageTask>> = None;

        for (round, pick) in picks.iter().enumerate() {
            let tasks: Vec<StageTask> = pick
                .iter()
                .enumerate()
                .map(|(i, (start, len))| {
                    StageTask::new(format!("t{round}-{i}"), "task", 1, day(*start), day(start + len))
                        .unwrap()
                })
                .collect();

            composer.begin_picking().unwrap();
            composer.resume(TaskPickerOutcome::new(tasks.clone())).unwrap();
            if !tasks.is_empty() {
                last = Some(tasks);
            }

            match &last {
                None => prop_assert!(composer.span().is_none()),
                Some(tasks) => {
                    let span = composer.span().unwrap();
                    let min = tasks.iter().map(|t| t.start_date().day_index()).min().unwrap();
                    let max = tasks.iter().map(|t| t.end_date().day_index()).max().unwrap();
                    prop_assert_eq!(span.start.day_index(), min);
                    prop_assert_eq!(span.end.day_index(), max);
                    prop_assert_eq!(Some(span), StageSpan::from_tasks(tasks));
                }
            }
        }
    }

    #[test]
    fn prop_gate_open_iff_complete_valid_and_new_or_dirty(
        picks in proptest::collection::vec(any::<bool>(), 5),
        blank_field in proptest::option::of(0usize..5),
        existing in any::<bool>(),
        edited in any::<bool>(),
    ) {
        let catalog = example_catalog();
        let mut selections = Selections::from_catalog(&catalog);
        let ids = ["loc-a", "soil-x", "weather-y", "ing-1", "stage-1"];
        for ((category, id), pick) in Category::ALL.into_iter().zip(ids).zip(&picks) {
            selections.toggle(category, id, *pick);
        }

        let mut scalars = filled_scalars();
        let origin = if existing {
            Origin::Existing {
                id: "r1".to_string(),
                baseline: Baseline::capture(&scalars, &selections),
            }
        } else {
            Origin::New
        };
        if edited {
            scalars.set(ScalarField::Description, "Edited description");
        }
        if let Some(index) = blank_field {
            scalars.set(ScalarField::ALL[index], "");
        }

        let gate = CompositionValidator::evaluate(&scalars, &selections, &origin);
        let complete = picks.iter().all(|p| *p);
        let valid = blank_field.is_none();
        let dirty = edited || blank_field.is_some();
        prop_assert_eq!(gate.is_open(), complete && valid && (!existing || dirty));
    }
}
