//! Write payloads for the document store
//!
//! A session that started from an existing record updates it in place;
//! otherwise it inserts under a freshly generated identifier.

use crate::error::CompositionError;
use serde::Serialize;
use serde_json::{Map, Value};
use ulid::Ulid;

/// Generate a new document identifier
#[inline]
#[must_use]
pub fn new_document_id() -> String {
    Ulid::new().to_string()
}

/// Keyed store mutation
#[derive(Debug, Clone, PartialEq)]
pub enum WritePayload {
    /// Create a document under a new identifier
    Insert {
        /// Generated identifier
        id: String,
        /// Full document, `id` included
        document: Value,
    },
    /// Partial update of an existing document
    Update {
        /// Existing identifier
        id: String,
        /// Every field except `id`
        fields: Map<String, Value>,
    },
}

impl WritePayload {
    /// Encode `document` (which must carry a string `id`) as a payload
    ///
    /// # Errors
    /// [`CompositionError::Encoding`] if the document is not a JSON object
    /// with a string `id`
    pub fn from_document<T: Serialize>(document: &T, is_new: bool) -> Result<Self, CompositionError> {
        let value =
            serde_json::to_value(document).map_err(|e| CompositionError::Encoding(e.to_string()))?;
        let Value::Object(mut fields) = value else {
            return Err(CompositionError::Encoding(
                "document is not an object".to_string(),
            ));
        };
        let id = fields
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| CompositionError::Encoding("document has no id".to_string()))?;

        if is_new {
            Ok(Self::Insert {
                id,
                document: Value::Object(fields),
            })
        } else {
            fields.shift_remove("id");
            Ok(Self::Update { id, fields })
        }
    }

    /// Target identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Insert { id, .. } | Self::Update { id, .. } => id,
        }
    }

    /// Whether this creates a document
    #[inline]
    #[must_use]
    pub fn is_insert(&self) -> bool {
        matches!(self, Self::Insert { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_keeps_id() {
        let payload = WritePayload::from_document(&json!({"id": "a", "name": "x"}), true).unwrap();
        assert!(payload.is_insert());
        assert_eq!(payload.id(), "a");
        let WritePayload::Insert { document, .. } = payload else {
            panic!("expected insert");
        };
        assert_eq!(document["id"], "a");
    }

    #[test]
    fn update_strips_id() {
        let payload = WritePayload::from_document(&json!({"id": "a", "name": "x"}), false).unwrap();
        let WritePayload::Update { id, fields } = payload else {
            panic!("expected update");
        };
        assert_eq!(id, "a");
        assert!(!fields.contains_key("id"));
        assert_eq!(fields["name"], "x");
    }

    #[test]
    fn update_keeps_field_order() {
        let payload = WritePayload::from_document(
            &json!({"id": "a", "name": "x", "locations": {}, "ingredientTotalPrice": "3"}),
            false,
        )
        .unwrap();
        let WritePayload::Update { fields, .. } = payload else {
            panic!("expected update");
        };
        assert_eq!(
            fields.keys().collect::<Vec<_>>(),
            vec!["name", "locations", "ingredientTotalPrice"]
        );
    }

    #[test]
    fn rejects_documents_without_id() {
        assert!(matches!(
            WritePayload::from_document(&json!({"name": "x"}), true),
            Err(CompositionError::Encoding(_))
        ));
        assert!(WritePayload::from_document(&json!([1, 2]), true).is_err());
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(new_document_id(), new_document_id());
    }
}
