//! JSON snapshot files backing the in-memory store

use crate::error::ToolError;
use seed_core::InMemoryDocumentStore;
use std::path::Path;

/// Load a store from a snapshot file; a missing file gives an empty store
///
/// # Errors
/// [`ToolError::Io`], [`ToolError::Json`] or [`ToolError::Snapshot`]
pub fn load_store(path: impl AsRef<Path>) -> Result<InMemoryDocumentStore, ToolError> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!(path = %path.display(), "snapshot not found, starting empty");
        return Ok(InMemoryDocumentStore::new());
    }
    let value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    let store = InMemoryDocumentStore::from_snapshot(value)?;
    tracing::debug!(path = %path.display(), "snapshot loaded");
    Ok(store)
}

/// Write every collection of `store` to `path` as pretty JSON
///
/// # Errors
/// [`ToolError::Io`] or [`ToolError::Json`]
pub fn save_store(store: &InMemoryDocumentStore, path: impl AsRef<Path>) -> Result<(), ToolError> {
    let path = path.as_ref();
    let text = serde_json::to_string_pretty(&store.snapshot())?;
    std::fs::write(path, text)?;
    tracing::debug!(path = %path.display(), "snapshot saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = load_store(dir.path().join("absent.json")).unwrap();
        assert_eq!(store.document_count("riceSeed"), 0);
    }

    #[test]
    fn saved_snapshot_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store =
            InMemoryDocumentStore::from_snapshot(json!({"soil": [{"id": "s1", "name": "X"}]}))
                .unwrap();
        save_store(&store, &path).unwrap();

        let loaded = load_store(&path).unwrap();
        assert_eq!(loaded.document_count("soil"), 1);
        assert_eq!(loaded.snapshot(), store.snapshot());
    }

    #[test]
    fn non_object_snapshot_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(load_store(&path), Err(ToolError::Snapshot(_))));
    }
}
