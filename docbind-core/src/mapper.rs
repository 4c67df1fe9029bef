//! The object mapper: composes schema, codecs, identity resolution, and the
//! backend into the load/save/delete lifecycle.
//!
//! An [`ObjectMapper`] is a borrowed, stateless view binding one managed
//! type's schema to a store. Obtain one from
//! [`ObjectStore::mapper`](crate::store::ObjectStore::mapper); nothing is
//! cached between calls, so mappers are free to construct and discard.
//!
//! Record saves and settings saves are distinct entry points ([`save`] and
//! [`save_settings`](ObjectMapper::save_settings)) rather than a shared
//! mutable flag, so concurrent saves never observe each other's mode.
//!
//! [`save`]: ObjectMapper::save

use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    backend::StoreBackend,
    codec::{self, Decoded, NULL_SENTINEL},
    collections,
    document::Document,
    error::{ObjectStoreError, ObjectStoreResult},
    scalar::EntityRegistry,
    schema::{FieldBinding, FieldDescriptor, Platform, Schema},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveMode {
    /// Ordinary record: always stored in the type's collection under its key.
    Record,
    /// Configuration-flavored: the store-at override, when declared, decides
    /// both path and document name.
    Settings,
}

/// Maps instances of one managed type to and from documents in a store.
///
/// Every operation is synchronous and performs at most one backend document
/// access plus, on first-time saves, one unique-key request.
pub struct ObjectMapper<'a, T, B: StoreBackend> {
    schema: &'a Schema<T>,
    backend: &'a B,
    registry: &'a dyn EntityRegistry,
    platform: Platform,
}

impl<'a, T: Default, B: StoreBackend> ObjectMapper<'a, T, B> {
    pub(crate) fn new(
        schema: &'a Schema<T>,
        backend: &'a B,
        registry: &'a dyn EntityRegistry,
        platform: Platform,
    ) -> Self {
        Self {
            schema,
            backend,
            registry,
            platform,
        }
    }

    /// Returns the schema this mapper is bound to.
    pub fn schema(&self) -> &Schema<T> {
        self.schema
    }

    /// Returns `true` if a document for `key` exists in the type's
    /// collection. No instance is constructed.
    pub fn exists(&self, key: &str) -> ObjectStoreResult<bool> {
        self.backend
            .document_exists(self.schema.collection(), key)
    }

    /// Loads the instance stored under `key`.
    ///
    /// The store-at override, when declared, takes precedence over both the
    /// type-name collection default and the passed key. Fields whose storage
    /// path is absent from the document keep their default-constructed
    /// values; data-quality problems in single fields are logged and
    /// isolated per the codec rules.
    ///
    /// # Errors
    ///
    /// Fails if the document is absent or unreadable, or on a fatally
    /// malformed stored identifier.
    pub fn load(&self, key: &str) -> ObjectStoreResult<T> {
        let (path, name) = match self.schema.store_at() {
            Some(store_at) => (store_at.path.as_str(), store_at.filename.as_str()),
            None => (self.schema.collection(), key),
        };

        let document = self.backend.read_document(path, name)?;
        self.populate(&document)
    }

    /// Loads every document in the type's collection.
    ///
    /// An absent collection location is created empty; zero documents yield
    /// an empty vector, not an error.
    pub fn load_all(&self) -> ObjectStoreResult<Vec<T>> {
        let path = self
            .schema
            .store_at()
            .map(|store_at| store_at.path.as_str())
            .unwrap_or_else(|| self.schema.collection());

        self.backend
            .list_documents(path)?
            .iter()
            .map(|name| {
                let document = self.backend.read_document(path, name)?;
                self.populate(&document)
            })
            .collect()
    }

    /// Loads a configuration-flavored instance.
    ///
    /// Reconciliation against a supplied in-memory instance is not part of
    /// the current design: when `existing` is provided it is discarded and
    /// the document is reloaded fresh.
    pub fn load_settings(&self, key: &str, existing: Option<T>) -> ObjectStoreResult<T> {
        if existing.is_some() {
            debug!(
                "{}: reconciliation not supported, reloading fresh",
                self.schema.type_name()
            );
        }

        self.load(key)
    }

    /// Saves the instance as an ordinary record in the type's collection.
    ///
    /// If the unique-key field is empty, a fresh key is requested from the
    /// store and written back onto the instance before any field is
    /// serialized, so the generated key is itself persisted. The resolved
    /// key names the document.
    ///
    /// # Errors
    ///
    /// Fails with [`ObjectStoreError::MissingKey`] if no non-empty document
    /// name can be resolved.
    pub fn save(&self, instance: &mut T) -> ObjectStoreResult<()> {
        self.save_with(instance, SaveMode::Record)
    }

    /// Saves the instance as a settings document, honoring the schema's
    /// store-at override for both collection path and document name.
    pub fn save_settings(&self, instance: &mut T) -> ObjectStoreResult<()> {
        self.save_with(instance, SaveMode::Settings)
    }

    /// Removes the instance's document from the type's collection.
    ///
    /// An instance with an empty key, or an already-absent document, is a
    /// logged no-op.
    pub fn delete(&self, instance: &T) -> ObjectStoreResult<()> {
        let key = self.schema.key_value(instance).unwrap_or_default();
        if key.is_empty() {
            warn!(
                "{}: delete requested for an instance without a key",
                self.schema.type_name()
            );
            return Ok(());
        }

        self.backend
            .delete_document(self.schema.collection(), &key)
    }

    fn save_with(&self, instance: &mut T, mode: SaveMode) -> ObjectStoreResult<()> {
        let mut path = self.schema.collection().to_string();
        let mut filename = String::new();

        if mode == SaveMode::Settings {
            if let Some(store_at) = self.schema.store_at() {
                path = store_at.path.clone();
                filename = store_at.filename.clone();
            }
        }

        // Identity resolution runs before any field is serialized so that a
        // freshly-generated key is part of the written document.
        if let Some(current) = self.schema.key_value(instance) {
            let key = if current.is_empty() {
                let fresh = self.backend.new_unique_key(self.schema.collection())?;
                self.schema.assign_key(instance, &fresh);
                fresh
            } else {
                current
            };

            if filename.is_empty() {
                filename = key;
            }
        }

        if filename.is_empty() {
            return Err(ObjectStoreError::MissingKey(self.schema.type_name()));
        }

        let mut document = Document::new();
        for descriptor in self.schema.fields() {
            if descriptor.applies_on(self.platform) {
                self.write_field(instance, descriptor, &mut document);
            }
        }

        self.backend.write_document(&path, &filename, document)
    }

    fn populate(&self, document: &Document) -> ObjectStoreResult<T> {
        let mut instance = T::default();

        // Adapter fields first, then collections, then scalars.
        for pass in 0u8..=2 {
            for descriptor in self.schema.fields() {
                if descriptor.rank() == pass && descriptor.applies_on(self.platform) {
                    self.apply_field(&mut instance, descriptor, document)?;
                }
            }
        }

        Ok(instance)
    }

    fn apply_field(
        &self,
        instance: &mut T,
        descriptor: &FieldDescriptor<T>,
        document: &Document,
    ) -> ObjectStoreResult<()> {
        let context = self.context(descriptor);
        let Some(raw) = document.get(descriptor.storage_path()) else {
            // Absent storage path: the field keeps its default value.
            return Ok(());
        };

        match &descriptor.binding {
            FieldBinding::Adapter(adapter) => {
                if let Err(err) = adapter.decode(instance, raw) {
                    warn!("{context}: adapter failed to decode: {err}");
                }
            }
            FieldBinding::Scalar { kind, set, .. } => {
                match codec::deserialize(raw, *kind, self.registry, &context)? {
                    Decoded::Value(scalar) => set(instance, scalar),
                    Decoded::Skip => {}
                }
            }
            FieldBinding::Sequence { elem, set, .. } | FieldBinding::Set { elem, set, .. } => {
                if is_explicit_null(raw) {
                    set(instance, None);
                } else if let Some(items) =
                    collections::read_sequence(raw, *elem, self.registry, &context)?
                {
                    set(instance, Some(items));
                }
            }
            FieldBinding::Map { key, value, set, .. } => {
                if is_explicit_null(raw) {
                    set(instance, None);
                } else if let Some(entries) =
                    collections::read_map(raw, *key, *value, self.registry, &context)?
                {
                    set(instance, Some(entries));
                }
            }
        }

        Ok(())
    }

    fn write_field(&self, instance: &T, descriptor: &FieldDescriptor<T>, document: &mut Document) {
        let path = descriptor.storage_path();

        match &descriptor.binding {
            FieldBinding::Adapter(adapter) => match adapter.encode(instance) {
                Ok(Some(value)) => document.set(path, value),
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        "{}: adapter failed to encode: {err}",
                        self.context(descriptor)
                    );
                }
            },
            FieldBinding::Scalar { get, .. } => {
                document.set(path, codec::serialize(&get(instance)));
            }
            FieldBinding::Sequence { get, .. } | FieldBinding::Set { get, .. } => {
                // Null collections are omitted from the document.
                if let Some(items) = get(instance) {
                    document.set(path, collections::write_sequence(&items));
                }
            }
            FieldBinding::Map { get, .. } => {
                if let Some(entries) = get(instance) {
                    document.set(path, collections::write_map(&entries));
                }
            }
        }
    }

    fn context(&self, descriptor: &FieldDescriptor<T>) -> String {
        format!("{}.{}", self.schema.type_name(), descriptor.name())
    }
}

fn is_explicit_null(raw: &Value) -> bool {
    raw.is_null() || raw.as_str() == Some(NULL_SENTINEL)
}
