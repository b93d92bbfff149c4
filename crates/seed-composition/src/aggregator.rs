//! Ingredient cost aggregation

use seed_catalog::{Decimal, Ingredient, SelectionSet};

/// Derives the total cost of the chosen ingredients
#[derive(Debug, Clone, Copy, Default)]
pub struct IngredientAggregator;

impl IngredientAggregator {
    /// Exact sum of `price` over the chosen ingredients, without trailing
    /// zeros
    ///
    /// Zero when nothing is chosen.
    #[must_use]
    pub fn total_price(selection: &SelectionSet<Ingredient>) -> Decimal {
        selection
            .chosen_items()
            .into_iter()
            .map(|ingredient| ingredient.price)
            .sum::<Decimal>()
            .normalize()
    }
}
