//! Main entry point binding a backend to typed object mappers.
//!
//! An [`ObjectStore`] owns a [`StoreBackend`], the host's entity registry,
//! and the active platform. Typed [`ObjectMapper`]s are borrowed from it per
//! managed type:
//!
//! ```ignore
//! use docbind::store::ObjectStore;
//! use docbind::memory::InMemoryStore;
//!
//! let store = ObjectStore::new(InMemoryStore::new());
//! let islands = store.mapper::<Island>();
//! let island = islands.load("abc-123")?;
//! ```

use std::sync::Arc;

use crate::{
    backend::StoreBackend,
    mapper::ObjectMapper,
    scalar::{EmptyRegistry, EntityRegistry},
    schema::{Managed, Platform, Schema},
};

/// A document store bound to a specific backend implementation, from which
/// typed mappers are obtained.
#[derive(Debug)]
pub struct ObjectStore<B: StoreBackend> {
    backend: B,
    registry: Arc<dyn EntityRegistry>,
    platform: Platform,
}

impl<B: StoreBackend> ObjectStore<B> {
    /// Creates a store over the given backend. The entity registry resolves
    /// nothing and the active platform is [`Platform::Both`] until
    /// overridden.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            registry: Arc::new(EmptyRegistry),
            platform: Platform::default(),
        }
    }

    /// Attaches the host environment's entity registry, used to resolve
    /// named-entity fields on load.
    pub fn with_registry(mut self, registry: Arc<dyn EntityRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Sets the active platform. Fields restricted to another platform are
    /// skipped for both load and save.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Returns a reference to the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the active platform.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Returns a mapper for a managed type, using its registered schema.
    pub fn mapper<T: Managed>(&self) -> ObjectMapper<'_, T, B> {
        self.mapper_with_schema(T::schema())
    }

    /// Returns a mapper bound to an explicitly-supplied schema. Useful when
    /// a schema is built at runtime rather than registered statically.
    pub fn mapper_with_schema<'a, T: Default>(
        &'a self,
        schema: &'a Schema<T>,
    ) -> ObjectMapper<'a, T, B> {
        ObjectMapper::new(schema, &self.backend, &*self.registry, self.platform)
    }
}
