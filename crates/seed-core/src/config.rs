//! Admin engine configuration
//!
//! Collection names default to the production layout and can be overridden
//! from a TOML file:
//!
//! ```toml
//! notification_limit = 8
//!
//! [collections]
//! rice_seeds = "riceSeedStaging"
//! ```

use crate::error::ConfigError;
use seed_catalog::Category;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Store collection per document kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionNames {
    /// Locations
    pub locations: String,
    /// Soils
    pub soils: String,
    /// Weathers
    pub weathers: String,
    /// Ingredients
    pub ingredients: String,
    /// Stages
    pub stages: String,
    /// Stage tasks
    pub tasks: String,
    /// Rice seed compositions
    pub rice_seeds: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            locations: "locations".to_string(),
            soils: "soil".to_string(),
            weathers: "weather".to_string(),
            ingredients: "riceSeedIngredients".to_string(),
            stages: "stage".to_string(),
            tasks: "task".to_string(),
            rice_seeds: "riceSeed".to_string(),
        }
    }
}

impl CollectionNames {
    /// Collection backing a reference category
    #[must_use]
    pub fn for_category(&self, category: Category) -> &str {
        match category {
            Category::Location => &self.locations,
            Category::Soil => &self.soils,
            Category::Weather => &self.weathers,
            Category::Ingredient => &self.ingredients,
            Category::Stage => &self.stages,
        }
    }

    fn slot(&mut self, category: Category) -> &mut String {
        match category {
            Category::Location => &mut self.locations,
            Category::Soil => &mut self.soils,
            Category::Weather => &mut self.weathers,
            Category::Ingredient => &mut self.ingredients,
            Category::Stage => &mut self.stages,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("locations", &self.locations),
            ("soils", &self.soils),
            ("weathers", &self.weathers),
            ("ingredients", &self.ingredients),
            ("stages", &self.stages),
            ("tasks", &self.tasks),
            ("rice_seeds", &self.rice_seeds),
        ];
        match named.iter().find(|(_, name)| name.trim().is_empty()) {
            Some((key, _)) => Err(ConfigError::BlankCollection(*key)),
            None => Ok(()),
        }
    }
}

/// Admin engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Collection names
    pub collections: CollectionNames,
    /// Transient notifications kept per session
    pub notification_limit: usize,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            collections: CollectionNames::default(),
            notification_limit: 16,
        }
    }
}

impl AdminConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text; missing keys keep their defaults
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on malformed TOML, [`ConfigError::BlankCollection`]
    /// if a collection name is blank
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.collections.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), "config loaded");
        Ok(config)
    }

    /// With collection names
    #[inline]
    #[must_use]
    pub fn with_collections(mut self, collections: CollectionNames) -> Self {
        self.collections = collections;
        self
    }

    /// With the collection of one reference category
    #[must_use]
    pub fn with_category_collection(mut self, category: Category, name: impl Into<String>) -> Self {
        *self.collections.slot(category) = name.into();
        self
    }

    /// With the task collection
    #[inline]
    #[must_use]
    pub fn with_tasks_collection(mut self, name: impl Into<String>) -> Self {
        self.collections.tasks = name.into();
        self
    }

    /// With the composition collection
    #[inline]
    #[must_use]
    pub fn with_rice_seed_collection(mut self, name: impl Into<String>) -> Self {
        self.collections.rice_seeds = name.into();
        self
    }

    /// With notification limit
    #[inline]
    #[must_use]
    pub fn with_notification_limit(mut self, limit: usize) -> Self {
        self.notification_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_store_layout() {
        let config = AdminConfig::default();
        assert_eq!(config.collections.for_category(Category::Soil), "soil");
        assert_eq!(
            config.collections.for_category(Category::Ingredient),
            "riceSeedIngredients"
        );
        assert_eq!(config.collections.rice_seeds, "riceSeed");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = AdminConfig::from_toml_str(
            r#"
            notification_limit = 4

            [collections]
            rice_seeds = "riceSeedStaging"
            "#,
        )
        .unwrap();
        assert_eq!(config.notification_limit, 4);
        assert_eq!(config.collections.rice_seeds, "riceSeedStaging");
        assert_eq!(config.collections.tasks, "task");
    }

    #[test]
    fn blank_collection_is_rejected() {
        let err = AdminConfig::from_toml_str("[collections]\nstages = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::BlankCollection("stages")));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[collections]\ntasks = \"stageTask\"").unwrap();
        let config = AdminConfig::load(file.path()).unwrap();
        assert_eq!(config.collections.tasks, "stageTask");
        assert!(matches!(
            AdminConfig::load("/nonexistent/seed-admin.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn builders_override() {
        let config = AdminConfig::new()
            .with_category_collection(Category::Weather, "climate")
            .with_rice_seed_collection("plans")
            .with_notification_limit(2);
        assert_eq!(config.collections.weathers, "climate");
        assert_eq!(config.collections.rice_seeds, "plans");
        assert_eq!(config.notification_limit, 2);
    }
}
