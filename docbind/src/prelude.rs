//! Convenient re-exports of commonly used types from docbind.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use docbind::prelude::*;
//! ```

pub use docbind_core::{
    backend::StoreBackend,
    document::Document,
    error::{ObjectStoreError, ObjectStoreResult},
    mapper::ObjectMapper,
    scalar::{EntityRef, EntityRegistry, Position, Scalar, ScalarKind, StaticRegistry},
    schema::{
        AdapterError, FieldAdapter, FieldDescriptor, Managed, Platform, Schema, SchemaBuilder,
        StoreAt,
    },
    store::ObjectStore,
};
