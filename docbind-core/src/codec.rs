//! Built-in bidirectional conversions between stored document values and
//! domain scalars.
//!
//! [`serialize`] maps a [`Scalar`] to its stored representation; null becomes
//! the literal string `"null"` so that stores unable to represent null can
//! still distinguish "explicitly null" from "absent". [`deserialize`] maps a
//! raw stored value back against the field's declared [`ScalarKind`].
//!
//! Decoding failures come in two severities. A malformed unique identifier
//! is a fatal error for the whole instance. Everything else (an unmatched
//! enum constant, an unresolvable entity name, a malformed position string,
//! a value of the wrong shape) is isolated to the field: it decodes to null
//! or is skipped, with a logged warning.

use serde_json::{Number, Value};
use tracing::{debug, warn};

use crate::{
    error::{ObjectStoreError, ObjectStoreResult},
    scalar::{EntityRegistry, Position, Scalar, ScalarKind},
};

/// Stored stand-in for an explicit null value.
pub const NULL_SENTINEL: &str = "null";

/// The outcome of decoding one stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A usable scalar; [`Scalar::Null`] means the field is explicitly null.
    Value(Scalar),
    /// The value could not be used; the field keeps its default.
    Skip,
}

/// Converts a domain scalar to its stored document representation.
pub fn serialize(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Null => Value::String(NULL_SENTINEL.to_string()),
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Int(i) => Value::Number(Number::from(*i)),
        Scalar::Float(f) => Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Scalar::Str(s) => Value::String(s.clone()),
        Scalar::Uuid(u) => Value::String(u.to_string()),
        Scalar::Entity(e) => Value::String(e.name().to_string()),
        Scalar::Position(p) => Value::String(p.to_canonical()),
    }
}

/// Converts a stored document value back to a domain scalar of the declared
/// kind.
///
/// `context` names the type and field being decoded and is used only for
/// logging. Stores sometimes hand back scalars in stringified form (map
/// section keys always arrive as strings), so the primitive kinds also
/// accept their own string renderings.
///
/// # Errors
///
/// Returns [`ObjectStoreError::InvalidIdentifier`] when a `Uuid`-kinded
/// value holds a string that does not parse. All other mismatches are
/// non-fatal and yield [`Decoded::Skip`] or a null value.
pub fn deserialize(
    raw: &Value,
    kind: ScalarKind,
    registry: &dyn EntityRegistry,
    context: &str,
) -> ObjectStoreResult<Decoded> {
    if raw.is_null() {
        return Ok(Decoded::Value(Scalar::Null));
    }
    if raw.as_str() == Some(NULL_SENTINEL) {
        return Ok(Decoded::Value(Scalar::Null));
    }
    // A section where a scalar is expected means the store could not decode
    // the value; treat it as absent.
    if raw.is_object() {
        debug!("{context}: unresolved section treated as absent");
        return Ok(Decoded::Skip);
    }

    match kind {
        ScalarKind::Bool => match raw {
            Value::Bool(b) => Ok(Decoded::Value(Scalar::Bool(*b))),
            Value::String(s) => match s.parse::<bool>() {
                Ok(b) => Ok(Decoded::Value(Scalar::Bool(b))),
                Err(_) => Ok(mismatch(context, "bool", raw)),
            },
            _ => Ok(mismatch(context, "bool", raw)),
        },
        ScalarKind::Int => match raw {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Decoded::Value(Scalar::Int(i))),
                None => Ok(mismatch(context, "integer", raw)),
            },
            Value::String(s) => match s.parse::<i64>() {
                Ok(i) => Ok(Decoded::Value(Scalar::Int(i))),
                Err(_) => Ok(mismatch(context, "integer", raw)),
            },
            _ => Ok(mismatch(context, "integer", raw)),
        },
        ScalarKind::Float => match raw {
            // as_f64 also widens stored integers.
            Value::Number(n) => match n.as_f64() {
                Some(f) => Ok(Decoded::Value(Scalar::Float(f))),
                None => Ok(mismatch(context, "float", raw)),
            },
            Value::String(s) => match s.parse::<f64>() {
                Ok(f) => Ok(Decoded::Value(Scalar::Float(f))),
                Err(_) => Ok(mismatch(context, "float", raw)),
            },
            _ => Ok(mismatch(context, "float", raw)),
        },
        ScalarKind::String => match raw {
            Value::String(s) => Ok(Decoded::Value(Scalar::Str(s.clone()))),
            Value::Number(n) => Ok(Decoded::Value(Scalar::Str(n.to_string()))),
            Value::Bool(b) => Ok(Decoded::Value(Scalar::Str(b.to_string()))),
            _ => Ok(mismatch(context, "string", raw)),
        },
        ScalarKind::Uuid => match raw {
            Value::String(s) => match uuid::Uuid::parse_str(s) {
                Ok(u) => Ok(Decoded::Value(Scalar::Uuid(u))),
                Err(_) => Err(ObjectStoreError::InvalidIdentifier {
                    field: context.to_string(),
                    value: s.clone(),
                }),
            },
            _ => Ok(mismatch(context, "identifier", raw)),
        },
        ScalarKind::Entity => match raw {
            Value::String(s) => match registry.resolve(s) {
                Some(entity) => Ok(Decoded::Value(Scalar::Entity(entity))),
                None => {
                    warn!("{context}: entity {s:?} is not known, storing null");
                    Ok(Decoded::Value(Scalar::Null))
                }
            },
            _ => Ok(mismatch(context, "entity name", raw)),
        },
        ScalarKind::Position => match raw {
            Value::String(s) => match Position::parse(s) {
                Some(pos) => Ok(Decoded::Value(Scalar::Position(pos))),
                None => {
                    warn!("{context}: malformed position {s:?}, storing null");
                    Ok(Decoded::Value(Scalar::Null))
                }
            },
            _ => Ok(mismatch(context, "position", raw)),
        },
        ScalarKind::Enum { variants } => match raw {
            Value::String(s) => {
                if let Some(name) = variants.iter().find(|v| **v == s.as_str()) {
                    Ok(Decoded::Value(Scalar::Str((*name).to_string())))
                } else {
                    warn!("{context}: no enum constant named {s:?}, keeping default");
                    Ok(Decoded::Skip)
                }
            }
            _ => Ok(mismatch(context, "enum constant", raw)),
        },
    }
}

fn mismatch(context: &str, expected: &str, raw: &Value) -> Decoded {
    warn!("{context}: expected {expected}, found {raw}, keeping default");
    Decoded::Skip
}
