//! The core of the docbind object-document mapping layer.
//!
//! docbind persists arbitrary typed objects to, and reconstructs them from,
//! a hierarchical key-value document store: one document per instance,
//! grouped into per-type collections. This crate provides:
//!
//! - **Document value tree** ([`document`]) - Dotted-path addressable
//!   hierarchical values, the persisted form of one instance
//! - **Store backend abstraction** ([`backend`]) - Trait for implementing
//!   different document stores
//! - **Domain scalars** ([`scalar`]) - Identifiers, named entities,
//!   coordinate composites, enumerations, and their declared-kind tags
//! - **Scalar codec** ([`codec`]) - Built-in bidirectional conversions
//!   between domain scalars and stored values
//! - **Collection codec** ([`collections`]) - Recursive mapping of sequence,
//!   set, and keyed-mapping fields
//! - **Schema declaration** ([`schema`]) - Statically-declared descriptor
//!   tables with function-value accessors and pluggable field adapters
//! - **Object mapper** ([`mapper`], [`store`]) - The load/save/delete
//!   lifecycle, including unique-key management
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use std::sync::LazyLock;
//! use docbind_core::schema::{FieldDescriptor, Managed, Schema};
//! use docbind_core::scalar::ScalarKind;
//!
//! #[derive(Debug, Default, Clone)]
//! pub struct Island {
//!     pub unique_id: String,
//!     pub owner: Option<uuid::Uuid>,
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
//! ```

pub mod backend;
pub mod codec;
pub mod collections;
pub mod document;
pub mod error;
pub mod mapper;
pub mod scalar;
pub mod schema;
pub mod store;
