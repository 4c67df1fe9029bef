//! Main docbind crate providing a reflective object-document mapping layer.
//!
//! This crate is the primary entry point for users of the docbind framework.
//! It re-exports the core types from `docbind-core` and provides convenient
//! access to the storage backends.
//!
//! # Features
//!
//! - **Zero per-type boilerplate at call sites** - Declare a descriptor
//!   table once per type; every load/save/delete call is then fully generic
//! - **Two-level codec system** - Built-in scalar codecs (identifiers,
//!   named entities, coordinate composites, enumerations) plus pluggable
//!   per-field adapters
//! - **Tolerant of legacy documents** - Missing fields keep their defaults;
//!   stale enum constants and unresolvable entity names are logged, never
//!   fatal
//! - **Multiple backends** - In-memory and file-backed stores with an
//!   extensible trait system
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::LazyLock;
//! use docbind::prelude::*;
//! use docbind::memory::InMemoryStore;
//! use uuid::Uuid;
//!
//! #[derive(Debug, Default, Clone)]
//! pub struct Island {
//!     pub unique_id: String,
//!     pub owner: Option<Uuid>,
//! }
//!
//! impl Managed for Island {
//!     fn schema() -> &'static Schema<Self> {
//!         static SCHEMA: LazyLock<Schema<Island>> = LazyLock::new(|| {
//!             Schema::builder("Island")
//!                 .key("uniqueId", |i: &Island| i.unique_id.clone(), |i, v| i.unique_id = v)
//!                 .field(FieldDescriptor::scalar(
//!                     "owner",
//!                     ScalarKind::Uuid,
//!                     |i: &Island| i.owner.into(),
//!                     |i, v| i.owner = v.as_uuid(),
//!                 ))
//!                 .build()
//!                 .expect("island schema")
//!         });
//!         &SCHEMA
//!     }
//! }
//!
//! fn main() -> ObjectStoreResult<()> {
//!     let store = ObjectStore::new(InMemoryStore::new());
//!     let islands = store.mapper::<Island>();
//!
//!     // An empty key is assigned by the store on first save.
//!     let mut island = Island::default();
//!     islands.save(&mut island)?;
//!
//!     let reloaded = islands.load(&island.unique_id)?;
//!     islands.delete(&reloaded)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Settings documents
//!
//! Configuration-flavored types can redirect their document away from the
//! per-type collection with a store-at override. The override applies to
//! every load and to [`save_settings`](prelude::ObjectMapper::save_settings)
//! calls; ordinary [`save`](prelude::ObjectMapper::save) calls always write
//! records into the type's collection.
//!
//! ```ignore
//! Schema::builder("GatewayConfig")
//!     .store_at("config", "gateway")
//!     // ...
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`fs`] - Persistent file-backed storage, one JSON document per file

pub mod prelude;

pub use docbind_core::{backend, codec, collections, document, error, mapper, scalar, schema, store};

/// In-memory storage backend implementations.
pub mod memory {
    pub use docbind_memory::InMemoryStore;
}

/// File-backed storage backend implementations.
pub mod fs {
    pub use docbind_fs::FileStore;
}
