//! The five selectable reference categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference category a composition selects from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Planting locations
    Location,
    /// Soil types
    Soil,
    /// Weather conditions
    Weather,
    /// Priced materials
    Ingredient,
    /// Growth stages with dated tasks
    Stage,
}

impl Category {
    /// Every category, in form order
    pub const ALL: [Category; 5] = [
        Category::Location,
        Category::Soil,
        Category::Weather,
        Category::Ingredient,
        Category::Stage,
    ];

    /// Plural label, also the composition document key
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Category::Location => "locations",
            Category::Soil => "soils",
            Category::Weather => "weathers",
            Category::Ingredient => "ingredients",
            Category::Stage => "stages",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_document_keys() {
        let labels: Vec<_> = Category::ALL.iter().map(Category::label).collect();
        assert_eq!(
            labels,
            vec!["locations", "soils", "weathers", "ingredients", "stages"]
        );
    }
}
