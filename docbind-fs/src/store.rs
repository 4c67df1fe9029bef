//! File-backed document storage.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::warn;
use uuid::Uuid;

use docbind_core::{
    backend::StoreBackend,
    document::Document,
    error::{ObjectStoreError, ObjectStoreResult},
};

/// File extension marking a document file. Files with any other extension in
/// a collection directory are ignored.
const DOCUMENT_EXTENSION: &str = "json";

/// Document storage backend keeping one JSON file per document.
///
/// Collections are directories under the store root; document names map to
/// `<name>.json` files. Overwrites are atomic from the caller's perspective
/// (temporary file plus rename); concurrent writers of the same document
/// race with last-writer-wins semantics.
///
/// # Example
///
/// ```ignore
/// use docbind_fs::FileStore;
/// use docbind::backend::StoreBackend;
///
/// let store = FileStore::new("/var/lib/myapp/database");
/// let names = store.list_documents("Island")?;
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at the given directory. The directory itself
    /// is created lazily, on first write or listing.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root.join(collection)
    }

    fn document_path(&self, collection: &str, name: &str) -> PathBuf {
        self.collection_dir(collection)
            .join(format!("{name}.{DOCUMENT_EXTENSION}"))
    }
}

impl StoreBackend for FileStore {
    fn read_document(&self, collection: &str, name: &str) -> ObjectStoreResult<Document> {
        let path = self.document_path(collection, name);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ObjectStoreError::DocumentNotFound(
                    name.to_string(),
                    collection.to_string(),
                ));
            }
            Err(err) => return Err(err.into()),
        };

        Ok(serde_json::from_slice(&bytes)?)
    }

    fn write_document(
        &self,
        collection: &str,
        name: &str,
        document: Document,
    ) -> ObjectStoreResult<()> {
        let dir = self.collection_dir(collection);
        fs::create_dir_all(&dir)?;

        let path = self.document_path(collection, name);
        let staging = dir.join(format!("{name}.{DOCUMENT_EXTENSION}.tmp"));

        fs::write(&staging, serde_json::to_vec_pretty(&document)?)?;
        fs::rename(&staging, &path)?;

        Ok(())
    }

    fn document_exists(&self, collection: &str, name: &str) -> ObjectStoreResult<bool> {
        Ok(self.document_path(collection, name).is_file())
    }

    fn new_unique_key(&self, collection: &str) -> ObjectStoreResult<String> {
        loop {
            let key = Uuid::new_v4().to_string();
            if !self.document_path(collection, &key).exists() {
                return Ok(key);
            }
        }
    }

    fn list_documents(&self, collection: &str) -> ObjectStoreResult<Vec<String>> {
        let dir = self.collection_dir(collection);
        fs::create_dir_all(&dir)?;

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    fn delete_document(&self, collection: &str, name: &str) -> ObjectStoreResult<()> {
        let path = self.document_path(collection, name);

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!(
                    "document file {} not present, nothing to delete",
                    path.display()
                );
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_document() -> Document {
        let mut doc = Document::new();
        doc.set("owner", json!("alice"));
        doc.set("home.world", json!("overworld"));
        doc
    }

    fn temp_store() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn write_then_read_roundtrip() {
        let (_dir, store) = temp_store();

        store
            .write_document("Island", "abc", sample_document())
            .unwrap();
        assert_eq!(store.read_document("Island", "abc").unwrap(), sample_document());
        assert!(store.document_exists("Island", "abc").unwrap());
    }

    #[test]
    fn missing_document_is_not_found() {
        let (_dir, store) = temp_store();

        assert!(matches!(
            store.read_document("Island", "abc"),
            Err(ObjectStoreError::DocumentNotFound(..))
        ));
        assert!(!store.document_exists("Island", "abc").unwrap());
    }

    #[test]
    fn corrupt_document_is_a_serialization_error() {
        let (dir, store) = temp_store();

        let collection = dir.path().join("Island");
        fs::create_dir_all(&collection).unwrap();
        fs::write(collection.join("abc.json"), b"{ not json").unwrap();

        assert!(matches!(
            store.read_document("Island", "abc"),
            Err(ObjectStoreError::Serialization(_))
        ));
    }

    #[test]
    fn overwrite_replaces_content() {
        let (_dir, store) = temp_store();
        store
            .write_document("Island", "abc", sample_document())
            .unwrap();

        let mut updated = Document::new();
        updated.set("owner", json!("bob"));
        store
            .write_document("Island", "abc", updated.clone())
            .unwrap();

        assert_eq!(store.read_document("Island", "abc").unwrap(), updated);
    }

    #[test]
    fn list_documents_filters_on_extension_and_creates_dir() {
        let (dir, store) = temp_store();

        // Absent collection directory is created, empty.
        assert!(store.list_documents("Island").unwrap().is_empty());
        assert!(dir.path().join("Island").is_dir());

        store
            .write_document("Island", "b", sample_document())
            .unwrap();
        store
            .write_document("Island", "a", sample_document())
            .unwrap();
        fs::write(dir.path().join("Island/notes.txt"), b"ignored").unwrap();

        assert_eq!(store.list_documents("Island").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn unique_keys_are_fresh() {
        let (_dir, store) = temp_store();
        let key = store.new_unique_key("Island").unwrap();

        assert!(!key.is_empty());
        assert!(!store.document_exists("Island", &key).unwrap());
    }

    #[test]
    fn delete_of_absent_document_is_a_no_op() {
        let (_dir, store) = temp_store();
        store.delete_document("Island", "missing").unwrap();

        store
            .write_document("Island", "abc", sample_document())
            .unwrap();
        store.delete_document("Island", "abc").unwrap();
        assert!(!store.document_exists("Island", "abc").unwrap());
    }

    #[test]
    fn no_staging_files_left_behind() {
        let (dir, store) = temp_store();
        store
            .write_document("Island", "abc", sample_document())
            .unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path().join("Island"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .filter(|name| name.ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
