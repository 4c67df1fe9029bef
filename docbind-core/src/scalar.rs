//! Domain scalar values and the declared-kind tags that drive the codec.
//!
//! A [`Scalar`] is the union of leaf values the mapping engine understands:
//! plain primitives, unique identifiers, named-entity handles, coordinate
//! composites, and the explicit null. Field accessors speak `Scalar`; the
//! codec in [`crate::codec`] converts between scalars and stored document
//! values.
//!
//! Because documents carry no type tags, every field descriptor declares a
//! [`ScalarKind`] at registration time. The kind decides which codec branch
//! applies on load.

use std::collections::HashSet;
use std::fmt::Debug;
use std::sync::Arc;

use uuid::Uuid;

/// A domain-level leaf value.
///
/// Accessor closures in a schema produce and consume these. Conversions from
/// common Rust types are provided so closures stay terse:
///
/// ```ignore
/// let s: Scalar = 42i64.into();
/// let s: Scalar = Some(Uuid::new_v4()).into(); // None becomes Scalar::Null
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// An explicit null. Distinguished from an absent field.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A unique identifier in canonical hyphenated form.
    Uuid(Uuid),
    /// A handle to a named entity resolved from the host environment.
    Entity(EntityRef),
    /// A coordinate composite within a named coordinate space.
    Position(Position),
}

impl Scalar {
    /// Returns `true` for [`Scalar::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(f) => Some(*f),
            Scalar::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Consumes the scalar and returns its string content, if any.
    pub fn into_string(self) -> Option<String> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Scalar::Uuid(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&EntityRef> {
        match self {
            Scalar::Entity(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_position(&self) -> Option<&Position> {
        match self {
            Scalar::Position(p) => Some(p),
            _ => None,
        }
    }

    /// Consumes the scalar and returns its position content, if any.
    pub fn into_position(self) -> Option<Position> {
        match self {
            Scalar::Position(p) => Some(p),
            _ => None,
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(value as i64)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl From<Uuid> for Scalar {
    fn from(value: Uuid) -> Self {
        Scalar::Uuid(value)
    }
}

impl From<EntityRef> for Scalar {
    fn from(value: EntityRef) -> Self {
        Scalar::Entity(value)
    }
}

impl From<Position> for Scalar {
    fn from(value: Position) -> Self {
        Scalar::Position(value)
    }
}

impl<V: Into<Scalar>> From<Option<V>> for Scalar {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Scalar::Null,
        }
    }
}

/// The declared value kind of a scalar field, carried by its descriptor.
///
/// Stored documents have no embedded type information, so the kind declared
/// at schema-registration time decides how a raw value is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
    String,
    /// A unique identifier; malformed stored strings are a fatal error.
    Uuid,
    /// A named-entity reference resolved against the live [`EntityRegistry`];
    /// unresolvable names decode to null.
    Entity,
    /// A coordinate composite; unparsable stored strings decode to null.
    Position,
    /// An enumeration matched case-sensitively against its declared constant
    /// names; an unmatched name leaves the field at its default.
    Enum {
        /// The declared constant names, in declaration order.
        variants: &'static [&'static str],
    },
}

/// Handle to a named entity (a world, region, or similar) owned by the host
/// environment.
///
/// The mapper never constructs these itself on load; they come from the
/// [`EntityRegistry`]. Serialized form is the entity's name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef {
    name: Arc<str>,
}

impl EntityRef {
    /// Creates a handle with the given name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the entity's name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Live lookup of named entities, supplied by the host environment.
///
/// Resolution failures are expected at runtime (an entity may simply not be
/// loaded yet), so `resolve` returns an `Option` rather than an error.
pub trait EntityRegistry: Send + Sync + Debug {
    /// Resolves an entity by name. Returns `None` if no such entity is
    /// currently known.
    fn resolve(&self, name: &str) -> Option<EntityRef>;
}

/// A registry that resolves nothing. Default for stores with no host
/// environment attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyRegistry;

impl EntityRegistry for EmptyRegistry {
    fn resolve(&self, _name: &str) -> Option<EntityRef> {
        None
    }
}

/// A registry backed by a fixed set of entity names.
#[derive(Debug, Default, Clone)]
pub struct StaticRegistry {
    names: HashSet<String>,
}

impl StaticRegistry {
    /// Creates a registry resolving exactly the given names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl EntityRegistry for StaticRegistry {
    fn resolve(&self, name: &str) -> Option<EntityRef> {
        self.names.contains(name).then(|| EntityRef::new(name))
    }
}

/// A coordinate composite: a point (plus view angles) within a named
/// coordinate space.
///
/// The canonical string form is `space:x:y:z:yaw:pitch`.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Name of the coordinate space (e.g. a world name).
    pub space: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
}

impl Position {
    /// Creates a position with zero view angles.
    pub fn new(space: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            space: space.into(),
            x,
            y,
            z,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Returns the canonical `space:x:y:z:yaw:pitch` string form.
    pub fn to_canonical(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}:{}",
            self.space, self.x, self.y, self.z, self.yaw, self.pitch
        )
    }

    /// Parses the canonical string form. Returns `None` for anything
    /// malformed; callers treat that as a recoverable data-quality problem.
    pub fn parse(raw: &str) -> Option<Self> {
        let parts: Vec<&str> = raw.split(':').collect();
        if parts.len() != 6 || parts[0].is_empty() {
            return None;
        }

        Some(Self {
            space: parts[0].to_string(),
            x: parts[1].parse().ok()?,
            y: parts[2].parse().ok()?,
            z: parts[3].parse().ok()?,
            yaw: parts[4].parse().ok()?,
            pitch: parts[5].parse().ok()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_canonical_roundtrip() {
        let pos = Position {
            space: "overworld".to_string(),
            x: 100.5,
            y: 64.0,
            z: -200.25,
            yaw: 90.0,
            pitch: -12.5,
        };

        let parsed = Position::parse(&pos.to_canonical()).unwrap();
        assert_eq!(parsed, pos);
    }

    #[test]
    fn position_rejects_malformed_strings() {
        assert_eq!(Position::parse(""), None);
        assert_eq!(Position::parse("overworld:1:2"), None);
        assert_eq!(Position::parse("overworld:a:b:c:0:0"), None);
        assert_eq!(Position::parse(":1:2:3:0:0"), None);
    }

    #[test]
    fn static_registry_resolves_known_names() {
        let registry = StaticRegistry::from_names(["overworld"]);

        assert_eq!(
            registry.resolve("overworld").map(|e| e.name().to_string()),
            Some("overworld".to_string())
        );
        assert_eq!(registry.resolve("nether"), None);
    }

    #[test]
    fn option_conversion_maps_none_to_null() {
        let none: Option<Uuid> = None;
        assert_eq!(Scalar::from(none), Scalar::Null);

        let id = Uuid::new_v4();
        assert_eq!(Scalar::from(Some(id)), Scalar::Uuid(id));
    }
}
