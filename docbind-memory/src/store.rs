//! In-memory document storage.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use tracing::warn;
use uuid::Uuid;

use docbind_core::{
    backend::StoreBackend,
    document::Document,
    error::{ObjectStoreError, ObjectStoreResult},
};

type CollectionMap = HashMap<String, Document>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document storage backend.
///
/// Documents are kept as-is in a map of collections behind a read-write
/// lock. The store is cloneable; clones share the same underlying data.
///
/// # Example
///
/// ```ignore
/// use docbind_memory::InMemoryStore;
/// use docbind::backend::StoreBackend;
/// use docbind::document::Document;
///
/// let store = InMemoryStore::new();
/// store.write_document("Island", "abc", Document::new())?;
/// assert!(store.document_exists("Island", "abc")?);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    collections: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreMap> {
        self.collections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreMap> {
        self.collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StoreBackend for InMemoryStore {
    fn read_document(&self, collection: &str, name: &str) -> ObjectStoreResult<Document> {
        self.read()
            .get(collection)
            .and_then(|documents| documents.get(name))
            .cloned()
            .ok_or_else(|| {
                ObjectStoreError::DocumentNotFound(name.to_string(), collection.to_string())
            })
    }

    fn write_document(
        &self,
        collection: &str,
        name: &str,
        document: Document,
    ) -> ObjectStoreResult<()> {
        self.write()
            .entry(collection.to_string())
            .or_default()
            .insert(name.to_string(), document);

        Ok(())
    }

    fn document_exists(&self, collection: &str, name: &str) -> ObjectStoreResult<bool> {
        Ok(self
            .read()
            .get(collection)
            .is_some_and(|documents| documents.contains_key(name)))
    }

    fn new_unique_key(&self, collection: &str) -> ObjectStoreResult<String> {
        let store = self.read();
        let documents = store.get(collection);

        loop {
            let key = Uuid::new_v4().to_string();
            if !documents.is_some_and(|d| d.contains_key(&key)) {
                return Ok(key);
            }
        }
    }

    fn list_documents(&self, collection: &str) -> ObjectStoreResult<Vec<String>> {
        let mut store = self.write();
        let documents = store.entry(collection.to_string()).or_default();

        let mut names: Vec<String> = documents.keys().cloned().collect();
        names.sort();

        Ok(names)
    }

    fn delete_document(&self, collection: &str, name: &str) -> ObjectStoreResult<()> {
        let removed = self
            .write()
            .get_mut(collection)
            .and_then(|documents| documents.remove(name));

        if removed.is_none() {
            warn!("document {name} not present in collection {collection}, nothing to delete");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_document() -> Document {
        let mut doc = Document::new();
        doc.set("name", json!("one"));
        doc
    }

    #[test]
    fn write_then_read_roundtrip() {
        let store = InMemoryStore::new();
        store
            .write_document("Island", "abc", sample_document())
            .unwrap();

        assert_eq!(store.read_document("Island", "abc").unwrap(), sample_document());
        assert!(store.document_exists("Island", "abc").unwrap());
        assert!(!store.document_exists("Island", "other").unwrap());
    }

    #[test]
    fn read_of_missing_document_fails() {
        let store = InMemoryStore::new();

        assert!(matches!(
            store.read_document("Island", "abc"),
            Err(ObjectStoreError::DocumentNotFound(name, collection))
                if name == "abc" && collection == "Island"
        ));
    }

    #[test]
    fn overwrite_replaces_document() {
        let store = InMemoryStore::new();
        store
            .write_document("Island", "abc", sample_document())
            .unwrap();

        let mut updated = Document::new();
        updated.set("name", json!("two"));
        store
            .write_document("Island", "abc", updated.clone())
            .unwrap();

        assert_eq!(store.read_document("Island", "abc").unwrap(), updated);
    }

    #[test]
    fn list_documents_creates_absent_collection() {
        let store = InMemoryStore::new();

        assert!(store.list_documents("Island").unwrap().is_empty());

        store
            .write_document("Island", "b", sample_document())
            .unwrap();
        store
            .write_document("Island", "a", sample_document())
            .unwrap();
        assert_eq!(store.list_documents("Island").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn unique_keys_are_fresh() {
        let store = InMemoryStore::new();
        let key = store.new_unique_key("Island").unwrap();

        assert!(!key.is_empty());
        assert!(!store.document_exists("Island", &key).unwrap());
    }

    #[test]
    fn delete_of_absent_document_is_a_no_op() {
        let store = InMemoryStore::new();
        store.delete_document("Island", "missing").unwrap();

        store
            .write_document("Island", "abc", sample_document())
            .unwrap();
        store.delete_document("Island", "abc").unwrap();
        assert!(!store.document_exists("Island", "abc").unwrap());
    }

    #[test]
    fn clones_share_data() {
        let store = InMemoryStore::new();
        let clone = store.clone();

        store
            .write_document("Island", "abc", sample_document())
            .unwrap();
        assert!(clone.document_exists("Island", "abc").unwrap());
    }
}
