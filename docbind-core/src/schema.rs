//! Schema declaration for managed types.
//!
//! A managed type registers a [`Schema`]: a statically-declared descriptor
//! table naming every persistable field, its storage path, its declared
//! value kind, and a pair of accessor function values. The table is built
//! once (typically in a `LazyLock` behind the [`Managed`] trait) and shared
//! by every mapping call; no runtime type inspection happens after
//! registration.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::LazyLock;
//! use docbind::schema::{FieldDescriptor, Managed, Schema};
//! use docbind::scalar::{Scalar, ScalarKind};
//!
//! #[derive(Debug, Default, Clone)]
//! struct Island {
//!     unique_id: String,
//!     owner: Option<uuid::Uuid>,
//! }
//!
//! impl Managed for Island {
//!     fn schema() -> &'static Schema<Self> {
//!         static SCHEMA: LazyLock<Schema<Island>> = LazyLock::new(|| {
//!             Schema::builder("Island")
//!                 .key(
//!                     "uniqueId",
//!                     |i: &Island| i.unique_id.clone(),
//!                     |i, v| i.unique_id = v,
//!                 )
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
//! ```

use std::collections::HashSet;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::{
    error::{ObjectStoreError, ObjectStoreResult},
    scalar::{Scalar, ScalarKind},
};

/// Platform a schema entry may be restricted to.
///
/// A field tagged for a platform other than the store's active one (and not
/// the universal [`Platform::Both`]) is skipped entirely: it is neither read
/// from nor written to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    /// Applies everywhere. The default for untagged fields and stores.
    #[default]
    Both,
    Server,
    Client,
}

impl Platform {
    /// Returns `true` if a field tagged `field` applies when `self` is the
    /// active platform.
    pub fn accepts(self, field: Platform) -> bool {
        field == Platform::Both || self == Platform::Both || field == self
    }
}

/// Metadata redirecting a type's documents away from the default collection
/// path and key-derived document name.
///
/// Consulted by settings-flavored saves and by every load of the type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreAt {
    /// Collection path replacing the type-name default.
    pub path: String,
    /// Fixed document name replacing the unique-key default.
    pub filename: String,
}

impl StoreAt {
    pub fn new(path: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            filename: filename.into(),
        }
    }
}

/// Error raised by a [`FieldAdapter`]. Adapter failures are isolated to the
/// field: the mapper logs them and continues.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct AdapterError(pub String);

impl From<String> for AdapterError {
    fn from(message: String) -> Self {
        AdapterError(message)
    }
}

impl From<&str> for AdapterError {
    fn from(message: &str) -> Self {
        AdapterError(message.to_string())
    }
}

/// A user-supplied bidirectional converter for one field.
///
/// An adapter takes precedence over all generic scalar and collection
/// handling for its field. It is instantiated once, at schema-registration
/// time, and owns both directions of the conversion.
pub trait FieldAdapter<T>: Send + Sync {
    /// Produces the stored document value for this field, or `None` to
    /// contribute nothing to the document.
    fn encode(&self, instance: &T) -> Result<Option<Value>, AdapterError>;

    /// Applies the stored document value onto the instance.
    fn decode(&self, instance: &mut T, raw: &Value) -> Result<(), AdapterError>;
}

pub(crate) type ScalarGetter<T> = Box<dyn Fn(&T) -> Scalar + Send + Sync>;
pub(crate) type ScalarSetter<T> = Box<dyn Fn(&mut T, Scalar) + Send + Sync>;
pub(crate) type SequenceGetter<T> = Box<dyn Fn(&T) -> Option<Vec<Scalar>> + Send + Sync>;
pub(crate) type SequenceSetter<T> = Box<dyn Fn(&mut T, Option<Vec<Scalar>>) + Send + Sync>;
pub(crate) type MapGetter<T> = Box<dyn Fn(&T) -> Option<Vec<(Scalar, Scalar)>> + Send + Sync>;
pub(crate) type MapSetter<T> = Box<dyn Fn(&mut T, Option<Vec<(Scalar, Scalar)>>) + Send + Sync>;

pub(crate) enum FieldBinding<T> {
    Scalar {
        kind: ScalarKind,
        get: ScalarGetter<T>,
        set: ScalarSetter<T>,
    },
    Sequence {
        elem: ScalarKind,
        get: SequenceGetter<T>,
        set: SequenceSetter<T>,
    },
    Set {
        elem: ScalarKind,
        get: SequenceGetter<T>,
        set: SequenceSetter<T>,
    },
    Map {
        key: ScalarKind,
        value: ScalarKind,
        get: MapGetter<T>,
        set: MapSetter<T>,
    },
    Adapter(Box<dyn FieldAdapter<T>>),
}

impl<T> FieldBinding<T> {
    fn kind_name(&self) -> &'static str {
        match self {
            FieldBinding::Scalar { .. } => "scalar",
            FieldBinding::Sequence { .. } => "sequence",
            FieldBinding::Set { .. } => "set",
            FieldBinding::Map { .. } => "map",
            FieldBinding::Adapter(_) => "adapter",
        }
    }
}

/// One persistable field of a managed type.
///
/// Carries the field name, the resolved storage path (the name unless
/// overridden with [`at`](FieldDescriptor::at)), an optional platform
/// restriction, and the typed accessor binding.
pub struct FieldDescriptor<T> {
    name: &'static str,
    path: Option<String>,
    platform: Platform,
    pub(crate) binding: FieldBinding<T>,
}

impl<T> FieldDescriptor<T> {
    /// Declares a scalar field of the given kind.
    pub fn scalar(
        name: &'static str,
        kind: ScalarKind,
        get: impl Fn(&T) -> Scalar + Send + Sync + 'static,
        set: impl Fn(&mut T, Scalar) + Send + Sync + 'static,
    ) -> Self {
        Self::with_binding(
            name,
            FieldBinding::Scalar {
                kind,
                get: Box::new(get),
                set: Box::new(set),
            },
        )
    }

    /// Declares an ordered-sequence field. The getter returns `None` for a
    /// null collection (which is then omitted from the document); the setter
    /// receives `None` for an explicitly-null stored value.
    pub fn list(
        name: &'static str,
        elem: ScalarKind,
        get: impl Fn(&T) -> Option<Vec<Scalar>> + Send + Sync + 'static,
        set: impl Fn(&mut T, Option<Vec<Scalar>>) + Send + Sync + 'static,
    ) -> Self {
        Self::with_binding(
            name,
            FieldBinding::Sequence {
                elem,
                get: Box::new(get),
                set: Box::new(set),
            },
        )
    }

    /// Declares a set field. Stored as a sequence in iteration order; on
    /// load, element order is not preserved and duplicate serialized forms
    /// collapse in the caller's set type.
    pub fn set(
        name: &'static str,
        elem: ScalarKind,
        get: impl Fn(&T) -> Option<Vec<Scalar>> + Send + Sync + 'static,
        set: impl Fn(&mut T, Option<Vec<Scalar>>) + Send + Sync + 'static,
    ) -> Self {
        Self::with_binding(
            name,
            FieldBinding::Set {
                elem,
                get: Box::new(get),
                set: Box::new(set),
            },
        )
    }

    /// Declares a keyed-mapping field with the given key and value kinds.
    pub fn map(
        name: &'static str,
        key: ScalarKind,
        value: ScalarKind,
        get: impl Fn(&T) -> Option<Vec<(Scalar, Scalar)>> + Send + Sync + 'static,
        set: impl Fn(&mut T, Option<Vec<(Scalar, Scalar)>>) + Send + Sync + 'static,
    ) -> Self {
        Self::with_binding(
            name,
            FieldBinding::Map {
                key,
                value,
                get: Box::new(get),
                set: Box::new(set),
            },
        )
    }

    /// Declares a field converted by a custom [`FieldAdapter`]. The adapter
    /// bypasses all generic scalar and collection handling.
    pub fn adapter(name: &'static str, adapter: impl FieldAdapter<T> + 'static) -> Self {
        Self::with_binding(name, FieldBinding::Adapter(Box::new(adapter)))
    }

    /// Overrides the storage path (defaults to the field name). Dotted paths
    /// place the field inside nested sections.
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Restricts the field to one platform.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Returns the field's declared name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the resolved storage path within the document.
    pub fn storage_path(&self) -> &str {
        self.path.as_deref().unwrap_or(self.name)
    }

    pub(crate) fn applies_on(&self, active: Platform) -> bool {
        active.accepts(self.platform)
    }

    /// Mapping order: adapter fields first, then collections, then scalars.
    pub(crate) fn rank(&self) -> u8 {
        match self.binding {
            FieldBinding::Adapter(_) => 0,
            FieldBinding::Sequence { .. } | FieldBinding::Set { .. } | FieldBinding::Map { .. } => {
                1
            }
            FieldBinding::Scalar { .. } => 2,
        }
    }

    fn with_binding(name: &'static str, binding: FieldBinding<T>) -> Self {
        Self {
            name,
            path: None,
            platform: Platform::Both,
            binding,
        }
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("path", &self.storage_path())
            .field("platform", &self.platform)
            .field("binding", &self.binding.kind_name())
            .finish()
    }
}

/// The statically-declared descriptor table for one managed type.
///
/// Immutable after construction and shareable across threads; one static
/// schema serves every mapping call for its type.
pub struct Schema<T> {
    type_name: &'static str,
    collection: String,
    store_at: Option<StoreAt>,
    fields: Vec<FieldDescriptor<T>>,
    key_field: Option<usize>,
}

impl<T> Schema<T> {
    /// Starts declaring a schema for the named type. The collection name
    /// defaults to the type name.
    pub fn builder(type_name: &'static str) -> SchemaBuilder<T> {
        SchemaBuilder {
            type_name,
            collection: None,
            store_at: None,
            fields: Vec::new(),
            key_field: None,
        }
    }

    /// Returns the managed type's name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the collection documents of this type are grouped under.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns the store-at override, if the type declares one.
    pub fn store_at(&self) -> Option<&StoreAt> {
        self.store_at.as_ref()
    }

    pub(crate) fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Reads the unique-key field off the instance. `None` when the schema
    /// declares no key field; an explicitly-null key reads as empty.
    pub(crate) fn key_value(&self, instance: &T) -> Option<String> {
        let descriptor = &self.fields[self.key_field?];
        let FieldBinding::Scalar { get, .. } = &descriptor.binding else {
            return None;
        };

        Some(match get(instance) {
            Scalar::Str(s) => s,
            _ => String::new(),
        })
    }

    /// Writes a freshly-generated unique key back onto the instance.
    pub(crate) fn assign_key(&self, instance: &mut T, key: &str) {
        let Some(index) = self.key_field else { return };
        if let FieldBinding::Scalar { set, .. } = &self.fields[index].binding {
            set(instance, Scalar::Str(key.to_string()));
        }
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("collection", &self.collection)
            .field("store_at", &self.store_at)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Builder for [`Schema`] declarations.
pub struct SchemaBuilder<T> {
    type_name: &'static str,
    collection: Option<String>,
    store_at: Option<StoreAt>,
    fields: Vec<FieldDescriptor<T>>,
    key_field: Option<usize>,
}

impl<T> SchemaBuilder<T> {
    /// Overrides the collection name (defaults to the type name).
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection = Some(name.into());
        self
    }

    /// Declares a store-at override for settings-flavored documents.
    pub fn store_at(mut self, path: impl Into<String>, filename: impl Into<String>) -> Self {
        self.store_at = Some(StoreAt::new(path, filename));
        self
    }

    /// Declares the unique-key field: a string field whose value names the
    /// instance's document and is generated by the store when empty.
    pub fn key(
        mut self,
        name: &'static str,
        get: impl Fn(&T) -> String + Send + Sync + 'static,
        set: impl Fn(&mut T, String) + Send + Sync + 'static,
    ) -> Self {
        self.key_field = Some(self.fields.len());
        self.fields.push(FieldDescriptor::scalar(
            name,
            ScalarKind::String,
            move |instance| Scalar::Str(get(instance)),
            move |instance, value| match value {
                Scalar::Str(s) => set(instance, s),
                Scalar::Null => set(instance, String::new()),
                _ => {}
            },
        ));
        self
    }

    /// Adds a field descriptor.
    pub fn field(mut self, descriptor: FieldDescriptor<T>) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Validates and finishes the schema.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectStoreError::Schema`] for an empty field list or for
    /// two fields resolving to the same storage path. Both reflect a
    /// programmer mistake in the type's declaration and fail fast.
    pub fn build(self) -> ObjectStoreResult<Schema<T>> {
        if self.fields.is_empty() {
            return Err(ObjectStoreError::Schema {
                type_name: self.type_name,
                message: "no fields declared".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.storage_path()) {
                return Err(ObjectStoreError::Schema {
                    type_name: self.type_name,
                    message: format!(
                        "fields share the storage path {:?}",
                        field.storage_path()
                    ),
                });
            }
        }

        Ok(Schema {
            type_name: self.type_name,
            collection: self
                .collection
                .unwrap_or_else(|| self.type_name.to_string()),
            store_at: self.store_at,
            fields: self.fields,
            key_field: self.key_field,
        })
    }
}

/// A type whose instances the mapper can persist.
///
/// Implementations build their descriptor table once and hand out a
/// reference to it; a `LazyLock` inside `schema()` is the usual pattern.
pub trait Managed: Default + Sized + Send + Sync + 'static {
    /// Returns the type's schema.
    fn schema() -> &'static Schema<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Sample {
        unique_id: String,
        level: i64,
    }

    fn level_field() -> FieldDescriptor<Sample> {
        FieldDescriptor::scalar(
            "level",
            ScalarKind::Int,
            |s: &Sample| s.level.into(),
            |s, v| s.level = v.as_int().unwrap_or_default(),
        )
    }

    #[test]
    fn collection_defaults_to_type_name() {
        let schema = Schema::builder("Sample").field(level_field()).build().unwrap();

        assert_eq!(schema.collection(), "Sample");
        assert_eq!(schema.store_at(), None);
    }

    #[test]
    fn storage_path_override() {
        let field = level_field().at("progress.level");
        assert_eq!(field.storage_path(), "progress.level");
        assert_eq!(field.name(), "level");
    }

    #[test]
    fn duplicate_storage_paths_are_a_schema_defect() {
        let err = Schema::builder("Sample")
            .field(level_field())
            .field(level_field())
            .build()
            .unwrap_err();

        assert!(matches!(err, ObjectStoreError::Schema { type_name: "Sample", .. }));
    }

    #[test]
    fn empty_schema_is_a_schema_defect() {
        let err = Schema::<Sample>::builder("Sample").build().unwrap_err();
        assert!(matches!(err, ObjectStoreError::Schema { .. }));
    }

    #[test]
    fn key_field_reads_and_writes_through_accessors() {
        let schema = Schema::builder("Sample")
            .key(
                "uniqueId",
                |s: &Sample| s.unique_id.clone(),
                |s, v| s.unique_id = v,
            )
            .build()
            .unwrap();

        let mut sample = Sample::default();
        assert_eq!(schema.key_value(&sample), Some(String::new()));

        schema.assign_key(&mut sample, "abc-123");
        assert_eq!(sample.unique_id, "abc-123");
        assert_eq!(schema.key_value(&sample), Some("abc-123".to_string()));
    }

    #[test]
    fn platform_scoping() {
        assert!(Platform::Both.accepts(Platform::Server));
        assert!(Platform::Server.accepts(Platform::Both));
        assert!(Platform::Server.accepts(Platform::Server));
        assert!(!Platform::Server.accepts(Platform::Client));
    }
}
