//! Error types and result types for object mapping operations.
//!
//! This module provides error handling for every mapping and backend operation.
//! Use [`ObjectStoreResult<T>`] as the return type for fallible operations.
//!
//! Errors fall into two families. Structural errors (a defective schema, a
//! save with no resolvable document name, a malformed unique identifier)
//! propagate to the caller and abort the whole operation. Data-quality
//! problems in a single stored field (an unmatched enum constant, a stale
//! entity name) never surface here; they are logged and the field is left
//! at its default.

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when mapping objects to and
/// from a document store.
#[derive(Error, Debug)]
pub enum ObjectStoreError {
    /// The schema declaration for a managed type is defective.
    /// This reflects a programmer mistake, not bad stored data.
    #[error("schema error for {type_name}: {message}")]
    Schema {
        /// Name of the managed type whose schema is defective.
        type_name: &'static str,
        /// Description of the defect.
        message: String,
    },
    /// A save could not resolve a non-empty document name for the instance.
    #[error("no unique key available for {0}")]
    MissingKey(&'static str),
    /// A stored unique-identifier string could not be parsed.
    #[error("field {field}: malformed unique identifier {value:?}")]
    InvalidIdentifier {
        /// Storage path of the offending field.
        field: String,
        /// The raw string that failed to parse.
        value: String,
    },
    /// The requested document was not found in the collection.
    /// The first argument is the document name, the second is the collection.
    #[error("document not found {0} in collection {1}")]
    DocumentNotFound(String, String),
    /// Serialization/deserialization error when converting a document.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// An error occurred in the underlying storage backend.
    #[error("backend error: {0}")]
    Backend(String),
    /// An I/O error occurred while reading or writing documents.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for object mapping operations.
pub type ObjectStoreResult<T> = Result<T, ObjectStoreError>;

impl From<SerdeJsonError> for ObjectStoreError {
    fn from(err: SerdeJsonError) -> Self {
        ObjectStoreError::Serialization(err.to_string())
    }
}
