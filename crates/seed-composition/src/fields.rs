//! Scalar form fields and per-field errors
//!
//! Each required field carries its own message, surfaced next to the field.
//! Numeric fields must also parse as a [`Decimal`].

use crate::error::CompositionError;
use indexmap::IndexMap;
use seed_catalog::Decimal;
use std::fmt;

/// Field name → message, first error per field wins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: IndexMap<String, String>,
}

impl FieldErrors {
    /// Create empty error set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error unless the field already has one
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_insert_with(|| message.into());
    }

    /// Require non-blank text; returns whether it passed
    pub fn require_text(&mut self, field: &str, value: &str, message: &str) -> bool {
        if value.trim().is_empty() {
            self.insert(field, message);
            false
        } else {
            true
        }
    }

    /// Require non-blank decimal text; returns the parsed value if it passed
    pub fn require_decimal(
        &mut self,
        field: &str,
        value: &str,
        required: &str,
        invalid: &str,
    ) -> Option<Decimal> {
        if !self.require_text(field, value, required) {
            return None;
        }
        match Decimal::from_str_exact(value.trim()) {
            Ok(parsed) => Some(parsed.normalize()),
            Err(_) => {
                self.insert(field, invalid);
                None
            }
        }
    }

    /// Message for one field
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// No errors recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failing fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Errors in the order they were found
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }

    /// `Ok` if empty, otherwise [`CompositionError::InvalidFields`]
    ///
    /// # Errors
    /// Returns the collected errors when any field failed
    pub fn into_result(self) -> Result<(), CompositionError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CompositionError::InvalidFields(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Scalar field of a composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarField {
    /// Rice seed name
    Name,
    /// Free-text description
    Description,
    /// Expected crop yield
    CropYield,
    /// Sell price
    SellPrice,
    /// Buy price
    BuyPrice,
}

impl ScalarField {
    /// Every scalar field, in form order
    pub const ALL: [ScalarField; 5] = [
        ScalarField::Name,
        ScalarField::Description,
        ScalarField::CropYield,
        ScalarField::SellPrice,
        ScalarField::BuyPrice,
    ];

    /// Document key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            ScalarField::Name => "name",
            ScalarField::Description => "description",
            ScalarField::CropYield => "cropYields",
            ScalarField::SellPrice => "sellPrice",
            ScalarField::BuyPrice => "buyPrice",
        }
    }

    /// Message when blank
    #[must_use]
    pub fn required_message(&self) -> &'static str {
        match self {
            ScalarField::Name => "Rice seed name is required",
            ScalarField::Description => "Rice seed description is required",
            ScalarField::CropYield => "Crop yield is required",
            ScalarField::SellPrice => "Sell price is required",
            ScalarField::BuyPrice => "Buy price is required",
        }
    }

    /// Message when not a number; `None` for text fields
    #[must_use]
    pub fn invalid_message(&self) -> Option<&'static str> {
        match self {
            ScalarField::Name | ScalarField::Description => None,
            ScalarField::CropYield => Some("Crop yield must be a valid number"),
            ScalarField::SellPrice => Some("Sell price must be a valid number"),
            ScalarField::BuyPrice => Some("Buy price must be a valid number"),
        }
    }
}

/// Raw text of the scalar fields as entered
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScalarFields {
    /// Rice seed name
    pub name: String,
    /// Description
    pub description: String,
    /// Crop yield
    pub crop_yield: String,
    /// Sell price
    pub sell_price: String,
    /// Buy price
    pub buy_price: String,
}

/// Scalar fields after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedScalars {
    /// Trimmed name
    pub name: String,
    /// Trimmed description
    pub description: String,
    /// Crop yield
    pub crop_yield: Decimal,
    /// Sell price
    pub sell_price: Decimal,
    /// Buy price
    pub buy_price: Decimal,
}

impl ScalarFields {
    /// Current text of one field
    #[must_use]
    pub fn get(&self, field: ScalarField) -> &str {
        match field {
            ScalarField::Name => &self.name,
            ScalarField::Description => &self.description,
            ScalarField::CropYield => &self.crop_yield,
            ScalarField::SellPrice => &self.sell_price,
            ScalarField::BuyPrice => &self.buy_price,
        }
    }

    /// Replace the text of one field
    pub fn set(&mut self, field: ScalarField, value: impl Into<String>) {
        let slot = match field {
            ScalarField::Name => &mut self.name,
            ScalarField::Description => &mut self.description,
            ScalarField::CropYield => &mut self.crop_yield,
            ScalarField::SellPrice => &mut self.sell_price,
            ScalarField::BuyPrice => &mut self.buy_price,
        };
        *slot = value.into();
    }

    /// Per-field errors for the current text
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for field in ScalarField::ALL {
            let value = self.get(field);
            match field.invalid_message() {
                Some(invalid) => {
                    errors.require_decimal(field.key(), value, field.required_message(), invalid);
                }
                None => {
                    errors.require_text(field.key(), value, field.required_message());
                }
            }
        }
        errors
    }

    /// Validate and parse
    ///
    /// # Errors
    /// [`CompositionError::InvalidFields`] if any field fails
    pub fn parse(&self) -> Result<ParsedScalars, CompositionError> {
        let mut errors = FieldErrors::new();
        let decimal = |errors: &mut FieldErrors, field: ScalarField| {
            errors.require_decimal(
                field.key(),
                self.get(field),
                field.required_message(),
                field.invalid_message().unwrap_or_default(),
            )
        };

        errors.require_text(
            ScalarField::Name.key(),
            &self.name,
            ScalarField::Name.required_message(),
        );
        errors.require_text(
            ScalarField::Description.key(),
            &self.description,
            ScalarField::Description.required_message(),
        );
        let crop_yield = decimal(&mut errors, ScalarField::CropYield);
        let sell_price = decimal(&mut errors, ScalarField::SellPrice);
        let buy_price = decimal(&mut errors, ScalarField::BuyPrice);

        match (crop_yield, sell_price, buy_price) {
            (Some(crop_yield), Some(sell_price), Some(buy_price)) if errors.is_empty() => {
                Ok(ParsedScalars {
                    name: self.name.trim().to_string(),
                    description: self.description.trim().to_string(),
                    crop_yield,
                    sell_price,
                    buy_price,
                })
            }
            _ => Err(CompositionError::InvalidFields(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ScalarFields {
        ScalarFields {
            name: "Jasmine".to_string(),
            description: "Fragrant long grain".to_string(),
            crop_yield: "4.5".to_string(),
            sell_price: "12".to_string(),
            buy_price: "8.25".to_string(),
        }
    }

    #[test]
    fn filled_fields_validate() {
        assert!(filled().validate().is_empty());
        let parsed = filled().parse().unwrap();
        assert_eq!(parsed.buy_price.to_string(), "8.25");
    }

    #[test]
    fn parsed_numbers_drop_trailing_zeros() {
        let mut errors = FieldErrors::default();
        let parsed = errors.require_decimal("sellPrice", " 12.50 ", "required", "invalid");
        assert_eq!(parsed.map(|d| d.to_string()), Some("12.5".to_string()));
        assert!(errors
            .require_decimal("buyPrice", "1e3", "required", "invalid")
            .is_none());
        assert_eq!(errors.get("buyPrice"), Some("invalid"));
    }

    #[test]
    fn whitespace_counts_as_blank() {
        let mut fields = filled();
        fields.set(ScalarField::Name, "   ");
        let errors = fields.validate();
        assert_eq!(errors.get("name"), Some("Rice seed name is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn numeric_fields_must_parse() {
        let mut fields = filled();
        fields.set(ScalarField::SellPrice, "a lot");
        fields.set(ScalarField::CropYield, "");
        let errors = fields.validate();
        assert_eq!(errors.get("sellPrice"), Some("Sell price must be a valid number"));
        assert_eq!(errors.get("cropYields"), Some("Crop yield is required"));
        assert!(fields.parse().is_err());
    }

    #[test]
    fn first_error_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("name", "first");
        errors.insert("name", "second");
        assert_eq!(errors.get("name"), Some("first"));
        assert_eq!(errors.to_string(), "name: first");
    }
}
