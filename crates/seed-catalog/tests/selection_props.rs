use proptest::prelude::*;
use seed_catalog::{CatalogItem, SelectionSet, TagItem};

fn catalog(size: usize) -> Vec<TagItem> {
    (0..size)
        .map(|i| TagItem::new(format!("id-{i}"), format!("name-{i}")))
        .collect()
}

fn chosen_ids(set: &SelectionSet<TagItem>) -> Vec<String> {
    set.chosen_items()
        .iter()
        .map(|item| item.identifier().to_string())
        .collect()
}

#[test]
fn test_toggle_true_then_false_restores() {
    let mut set = SelectionSet::from_items(catalog(3));
    let before = chosen_ids(&set);
    set.toggle("id-1", true);
    set.toggle("id-1", false);
    assert_eq!(chosen_ids(&set), before);
}

proptest! {
    #[test]
    fn prop_paired_toggles_restore_selection(
        initial in proptest::collection::vec(any::<bool>(), 1..12),
        target in 0usize..12,
    ) {
        let size = initial.len();
        let target = target % size;
        let mut set = SelectionSet::from_items(catalog(size));
        for (i, chosen) in initial.iter().enumerate() {
            set.toggle(&format!("id-{i}"), *chosen);
        }

        let before = chosen_ids(&set);
        let id = format!("id-{target}");
        let original = set.is_chosen(&id);

        set.toggle(&id, !original);
        set.toggle(&id, original);

        prop_assert_eq!(chosen_ids(&set), before);
    }

    #[test]
    fn prop_chosen_items_keep_catalog_order(
        picks in proptest::collection::vec(0usize..10, 0..20),
    ) {
        let mut set = SelectionSet::from_items(catalog(10));
        for pick in &picks {
            set.toggle(&format!("id-{pick}"), true);
        }

        let indexes: Vec<usize> = chosen_ids(&set)
            .iter()
            .map(|id| id.trim_start_matches("id-").parse().unwrap())
            .collect();
        let mut sorted = indexes.clone();
        sorted.sort_unstable();
        prop_assert_eq!(indexes, sorted);
    }
}
