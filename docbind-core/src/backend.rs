//! Storage backend abstraction for the object mapper.
//!
//! This module defines the trait that abstracts over concrete document
//! stores, keyed by (collection path, document name). The mapper performs
//! one document read or write per operation; everything about the on-disk
//! or in-memory layout belongs to the implementation.
//!
//! Every operation is synchronous and may block the calling thread for the
//! duration of the underlying I/O. The mapper adds no locking, retry, or
//! timeout on top: concurrent writes to the same (collection, name) race at
//! the backend with last-writer-wins semantics.

use std::fmt::Debug;

use crate::{document::Document, error::ObjectStoreResult};

/// Abstract interface for hierarchical key-value document stores.
///
/// Implementations must be thread-safe (`Send + Sync`); the mapper itself
/// keeps no state across calls, so a single backend instance may serve
/// arbitrarily many concurrent mappers.
pub trait StoreBackend: Send + Sync + Debug {
    /// Fetches the named document from a collection.
    ///
    /// # Errors
    ///
    /// Fails with [`DocumentNotFound`](crate::error::ObjectStoreError::DocumentNotFound)
    /// when absent, or a backend error when the document is unreadable or
    /// corrupt.
    fn read_document(&self, collection: &str, name: &str) -> ObjectStoreResult<Document>;

    /// Writes the named document, overwriting any existing one atomically
    /// from the caller's perspective. The collection is created if absent.
    fn write_document(
        &self,
        collection: &str,
        name: &str,
        document: Document,
    ) -> ObjectStoreResult<()>;

    /// Returns `true` if the named document exists in the collection.
    fn document_exists(&self, collection: &str, name: &str) -> ObjectStoreResult<bool>;

    /// Returns a key guaranteed unused in the collection at call time.
    fn new_unique_key(&self, collection: &str) -> ObjectStoreResult<String>;

    /// Lists the logical names of every document in the collection, filtered
    /// to the store's native document convention. An absent collection
    /// location is created (empty) rather than failing.
    fn list_documents(&self, collection: &str) -> ObjectStoreResult<Vec<String>>;

    /// Removes the named document. Removal of an absent document is logged
    /// by the implementation, not raised.
    fn delete_document(&self, collection: &str, name: &str) -> ObjectStoreResult<()>;
}

impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    fn read_document(&self, collection: &str, name: &str) -> ObjectStoreResult<Document> {
        (*self).read_document(collection, name)
    }

    fn write_document(
        &self,
        collection: &str,
        name: &str,
        document: Document,
    ) -> ObjectStoreResult<()> {
        (*self).write_document(collection, name, document)
    }

    fn document_exists(&self, collection: &str, name: &str) -> ObjectStoreResult<bool> {
        (*self).document_exists(collection, name)
    }

    fn new_unique_key(&self, collection: &str) -> ObjectStoreResult<String> {
        (*self).new_unique_key(collection)
    }

    fn list_documents(&self, collection: &str) -> ObjectStoreResult<Vec<String>> {
        (*self).list_documents(collection)
    }

    fn delete_document(&self, collection: &str, name: &str) -> ObjectStoreResult<()> {
        (*self).delete_document(collection, name)
    }
}
