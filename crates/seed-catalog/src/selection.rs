//! Per-category selection state
//!
//! A [`SelectionSet`] shares the catalog slice and owns an explicit
//! identifier → chosen map. Catalog records are never mutated, so one catalog
//! snapshot can back any number of sessions.

use crate::item::CatalogItem;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

/// Chosen flags over a shared catalog slice
#[derive(Debug, Clone)]
pub struct SelectionSet<T> {
    items: Arc<[T]>,
    chosen: HashMap<String, bool>,
}

impl<T: CatalogItem> SelectionSet<T> {
    /// Create empty selection set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Arc::from(Vec::new()),
            chosen: HashMap::new(),
        }
    }

    /// Create selection set over `items`, nothing chosen
    #[must_use]
    pub fn from_items(items: impl Into<Arc<[T]>>) -> Self {
        let mut set = Self::new();
        set.load(items);
        set
    }

    /// Replace the items, resetting every chosen flag to false
    pub fn load(&mut self, items: impl Into<Arc<[T]>>) {
        self.items = items.into();
        self.chosen = self
            .items
            .iter()
            .map(|item| (item.identifier().to_string(), false))
            .collect();
    }

    /// Choose every item whose derived key is in `keys`
    ///
    /// Persisted compositions store names/titles rather than identifiers, so
    /// re-opening one for edit matches on `key_of`. Unmatched keys are
    /// ignored.
    pub fn mark_chosen_by_key<I, S, F>(&mut self, keys: I, key_of: F)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&T) -> &str,
    {
        let keys: HashSet<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        for item in self.items.iter() {
            if keys.contains(key_of(item)) {
                self.chosen.insert(item.identifier().to_string(), true);
            }
        }
    }

    /// Choose every item whose identifier is in `identifiers`
    pub fn mark_chosen_by_id<I, S>(&mut self, identifiers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for id in identifiers {
            self.toggle(id.as_ref(), true);
        }
    }

    /// Set the chosen flag of one item
    ///
    /// Unknown identifiers are a no-op; returns whether an item matched.
    pub fn toggle(&mut self, identifier: &str, value: bool) -> bool {
        match self.chosen.get_mut(identifier) {
            Some(flag) => {
                *flag = value;
                true
            }
            None => {
                tracing::trace!(identifier, "toggle ignored: unknown identifier");
                false
            }
        }
    }

    /// Choose every item
    pub fn select_all(&mut self) {
        self.chosen.values_mut().for_each(|flag| *flag = true);
    }

    /// Unchoose every item
    pub fn clear(&mut self) {
        self.chosen.values_mut().for_each(|flag| *flag = false);
    }

    /// Check one item
    #[inline]
    #[must_use]
    pub fn is_chosen(&self, identifier: &str) -> bool {
        self.chosen.get(identifier).copied().unwrap_or(false)
    }

    /// Chosen items in catalog order
    #[must_use]
    pub fn chosen_items(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| self.is_chosen(item.identifier()))
            .collect()
    }

    /// Identifiers of chosen items
    #[must_use]
    pub fn chosen_identifiers(&self) -> BTreeSet<String> {
        self.chosen
            .iter()
            .filter(|(_, chosen)| **chosen)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Number of chosen items
    #[inline]
    #[must_use]
    pub fn chosen_count(&self) -> usize {
        self.chosen.values().filter(|chosen| **chosen).count()
    }

    /// At least one item chosen
    #[inline]
    #[must_use]
    pub fn has_any_chosen(&self) -> bool {
        self.chosen.values().any(|chosen| *chosen)
    }

    /// Items with their chosen flag, in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (&T, bool)> {
        self.items
            .iter()
            .map(move |item| (item, self.is_chosen(item.identifier())))
    }

    /// All items in catalog order
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of items
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// No items loaded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: CatalogItem> Default for SelectionSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
