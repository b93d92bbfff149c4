//! Document store collaborator
//!
//! The store is strongly consistent and single-writer from the engine's point
//! of view. [`InMemoryDocumentStore`] keeps every collection in insertion
//! order and can be switched unavailable to exercise failure handling.

use crate::error::StoreError;
use dashmap::DashMap;
use indexmap::IndexMap;
use seed_composition::WritePayload;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Keyed document persistence
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document of `collection`, in insertion order
    ///
    /// An unknown collection is empty.
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Value>, StoreError>;

    /// Create a document under `id`
    async fn insert(&self, collection: &str, id: &str, document: Value) -> Result<(), StoreError>;

    /// Shallow-merge `fields` into the document under `id`
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError>;

    /// Remove the document under `id`
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// One document by identifier
    async fn fetch_one(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
        self.fetch_all(collection)
            .await?
            .into_iter()
            .find(|document| document.get("id").and_then(Value::as_str) == Some(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })
    }

    /// Apply a write payload; returns the written identifier
    async fn write(&self, collection: &str, payload: WritePayload) -> Result<String, StoreError> {
        match payload {
            WritePayload::Insert { id, document } => {
                self.insert(collection, &id, document).await?;
                Ok(id)
            }
            WritePayload::Update { id, fields } => {
                self.update(collection, &id, fields).await?;
                Ok(id)
            }
        }
    }
}

/// Process-local [`DocumentStore`]
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: DashMap<String, IndexMap<String, Value>>,
    unavailable: AtomicBool,
    writes: AtomicU64,
}

impl InMemoryDocumentStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a `{ collection: [documents] }` snapshot
    ///
    /// # Errors
    /// [`StoreError::InvalidDocument`] if the snapshot is not an object of
    /// arrays, or a document has no string `id`
    pub fn from_snapshot(snapshot: Value) -> Result<Self, StoreError> {
        let Value::Object(collections) = snapshot else {
            return Err(StoreError::InvalidDocument(
                "snapshot is not an object".to_string(),
            ));
        };

        let store = Self::new();
        for (collection, documents) in collections {
            let Value::Array(documents) = documents else {
                return Err(StoreError::InvalidDocument(format!(
                    "collection {collection} is not an array"
                )));
            };
            store.seed(&collection, documents)?;
        }
        Ok(store)
    }

    /// Add documents to `collection` without counting them as writes
    ///
    /// # Errors
    /// [`StoreError::InvalidDocument`] if a document has no string `id`
    pub fn seed(&self, collection: &str, documents: Vec<Value>) -> Result<(), StoreError> {
        let mut entry = self.collections.entry(collection.to_string()).or_default();
        for document in documents {
            let id = document
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    StoreError::InvalidDocument(format!("document without id in {collection}"))
                })?;
            entry.insert(id, document);
        }
        Ok(())
    }

    /// Every collection as a `{ collection: [documents] }` object
    ///
    /// Collections are sorted by name.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        let mut names: Vec<String> = self.collections.iter().map(|c| c.key().clone()).collect();
        names.sort_unstable();

        let mut out = Map::new();
        for name in names {
            if let Some(collection) = self.collections.get(&name) {
                out.insert(name.clone(), Value::Array(collection.values().cloned().collect()));
            }
        }
        Value::Object(out)
    }

    /// Make every call fail with [`StoreError::Unavailable`]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of successful inserts, updates and deletes
    #[inline]
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of documents in `collection`
    #[must_use]
    pub fn document_count(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, |c| c.len())
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            tracing::warn!("document store call refused: unavailable");
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }

    fn not_found(collection: &str, id: &str) -> StoreError {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        self.check_available()?;
        Ok(self
            .collections
            .get(collection)
            .map(|c| c.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn insert(&self, collection: &str, id: &str, document: Value) -> Result<(), StoreError> {
        self.check_available()?;
        let Value::Object(mut fields) = document else {
            return Err(StoreError::InvalidDocument(format!(
                "{collection}/{id} is not an object"
            )));
        };
        fields.insert("id".to_string(), Value::String(id.to_string()));

        let mut entry = self.collections.entry(collection.to_string()).or_default();
        if entry.contains_key(id) {
            return Err(StoreError::AlreadyExists {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        entry.insert(id.to_string(), Value::Object(fields));
        drop(entry);

        self.record_write();
        tracing::debug!(collection, id, "document inserted");
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        let mut entry = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| Self::not_found(collection, id))?;
        let Some(Value::Object(existing)) = entry.get_mut(id) else {
            return Err(Self::not_found(collection, id));
        };
        for (key, value) in fields {
            if key != "id" {
                existing.insert(key, value);
            }
        }
        drop(entry);

        self.record_write();
        tracing::debug!(collection, id, "document updated");
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.check_available()?;
        let removed = self
            .collections
            .get_mut(collection)
            .and_then(|mut c| c.shift_remove(id));
        if removed.is_none() {
            return Err(Self::not_found(collection, id));
        }

        self.record_write();
        tracing::debug!(collection, id, "document deleted");
        Ok(())
    }
}
