//! Recursive mapping of sequence, set, and keyed-mapping fields.
//!
//! Collection fields delegate element, key, and value conversion to the
//! scalar codec in [`crate::codec`]. The stored shapes are:
//!
//! - sequence and set fields: an ordered sequence of serialized elements,
//! - mapping fields: a nested section whose sub-keys are the serialized map
//!   keys and whose values sit under those keys.
//!
//! Element, key, and value kinds come from the field descriptor's explicit
//! tags; the document format itself carries no type information.

use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    codec::{self, Decoded},
    error::ObjectStoreResult,
    scalar::{EntityRegistry, Scalar, ScalarKind},
};

/// Serializes sequence or set elements, in iteration order, to a stored
/// sequence.
pub fn write_sequence(items: &[Scalar]) -> Value {
    Value::Array(items.iter().map(codec::serialize).collect())
}

/// Decodes a stored sequence against the declared element kind.
///
/// Returns `None` if the raw value is not a sequence (the field is then
/// treated as absent). Elements that decode to a skip are dropped; the codec
/// has already logged them. Order is preserved; set semantics (collapsing
/// duplicates) are the caller's concern.
///
/// # Errors
///
/// A fatally malformed element (a bad unique identifier) aborts the load of
/// the whole instance.
pub fn read_sequence(
    raw: &Value,
    elem: ScalarKind,
    registry: &dyn EntityRegistry,
    context: &str,
) -> ObjectStoreResult<Option<Vec<Scalar>>> {
    let Some(items) = raw.as_array() else {
        debug!("{context}: expected a sequence, treating as absent");
        return Ok(None);
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match codec::deserialize(item, elem, registry, context)? {
            Decoded::Value(scalar) => out.push(scalar),
            Decoded::Skip => {}
        }
    }

    Ok(Some(out))
}

/// Serializes map entries to a nested section. Both keys and values pass
/// through the scalar codec; serialized keys are stringified for use as
/// section keys.
pub fn write_map(entries: &[(Scalar, Scalar)]) -> Value {
    let mut section = Map::new();
    for (key, value) in entries {
        section.insert(key_string(&codec::serialize(key)), codec::serialize(value));
    }

    Value::Object(section)
}

/// Decodes a stored section against the declared key and value kinds.
///
/// Returns `None` if the raw value is not a section. A key that fails to
/// decode to the declared key kind (or decodes to null) drops its entry
/// (map keys must be non-null). A value may legitimately decode to null and
/// is still inserted.
///
/// # Errors
///
/// A fatally malformed *value* aborts the load; key failures never do.
pub fn read_map(
    raw: &Value,
    key_kind: ScalarKind,
    value_kind: ScalarKind,
    registry: &dyn EntityRegistry,
    context: &str,
) -> ObjectStoreResult<Option<Vec<(Scalar, Scalar)>>> {
    let Some(section) = raw.as_object() else {
        debug!("{context}: expected a section, treating as absent");
        return Ok(None);
    };

    let mut out = Vec::with_capacity(section.len());
    for (raw_key, raw_value) in section {
        let key_value = Value::String(raw_key.clone());
        let key = match codec::deserialize(&key_value, key_kind, registry, context) {
            Ok(Decoded::Value(k)) if !k.is_null() => k,
            Ok(_) => {
                debug!("{context}: dropping entry with unusable key {raw_key:?}");
                continue;
            }
            Err(_) => {
                debug!("{context}: dropping entry with malformed key {raw_key:?}");
                continue;
            }
        };

        let value = match codec::deserialize(raw_value, value_kind, registry, context)? {
            Decoded::Value(v) => v,
            Decoded::Skip => Scalar::Null,
        };

        out.push((key, value));
    }

    Ok(Some(out))
}

fn key_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::EmptyRegistry;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn sequence_roundtrip_preserves_order_and_duplicates() {
        let items = vec![Scalar::Int(3), Scalar::Int(1), Scalar::Int(3)];

        let stored = write_sequence(&items);
        let back = read_sequence(&stored, ScalarKind::Int, &EmptyRegistry, "t")
            .unwrap()
            .unwrap();
        assert_eq!(back, items);
    }

    #[test]
    fn sequence_drops_unusable_elements() {
        let raw = json!(["LOCKED", "nope", "OPEN"]);
        let kind = ScalarKind::Enum {
            variants: &["LOCKED", "OPEN"],
        };

        let back = read_sequence(&raw, kind, &EmptyRegistry, "t").unwrap().unwrap();
        assert_eq!(
            back,
            vec![
                Scalar::Str("LOCKED".to_string()),
                Scalar::Str("OPEN".to_string())
            ]
        );
    }

    #[test]
    fn sequence_of_wrong_shape_is_absent() {
        assert_eq!(
            read_sequence(&json!("scalar"), ScalarKind::Int, &EmptyRegistry, "t").unwrap(),
            None
        );
    }

    #[test]
    fn malformed_identifier_element_is_fatal() {
        let raw = json!(["not-a-uuid"]);
        assert!(read_sequence(&raw, ScalarKind::Uuid, &EmptyRegistry, "t").is_err());
    }

    #[test]
    fn map_roundtrip_with_identifier_keys() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let entries = vec![
            (Scalar::Uuid(a), Scalar::Int(1)),
            (Scalar::Uuid(b), Scalar::Int(2)),
        ];

        let stored = write_map(&entries);
        let mut back = read_map(&stored, ScalarKind::Uuid, ScalarKind::Int, &EmptyRegistry, "t")
            .unwrap()
            .unwrap();
        back.sort_by_key(|(k, _)| k.as_uuid().unwrap());

        let mut expected = entries;
        expected.sort_by_key(|(k, _)| k.as_uuid().unwrap());
        assert_eq!(back, expected);
    }

    #[test]
    fn map_drops_entries_with_unusable_keys() {
        let raw = json!({
            "not-a-uuid": 1,
            "22222222-2222-2222-2222-222222222222": 2,
        });

        let back = read_map(&raw, ScalarKind::Uuid, ScalarKind::Int, &EmptyRegistry, "t")
            .unwrap()
            .unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].1, Scalar::Int(2));
    }

    #[test]
    fn map_keeps_null_values() {
        let raw = json!({ "rank": "null" });

        let back = read_map(
            &raw,
            ScalarKind::String,
            ScalarKind::Int,
            &EmptyRegistry,
            "t",
        )
        .unwrap()
        .unwrap();
        assert_eq!(back, vec![(Scalar::Str("rank".to_string()), Scalar::Null)]);
    }

    #[test]
    fn map_stringifies_numeric_keys_on_save() {
        let entries = vec![(Scalar::Int(42), Scalar::Str("answer".to_string()))];

        let stored = write_map(&entries);
        assert_eq!(stored, json!({ "42": "answer" }));

        let back = read_map(&stored, ScalarKind::Int, ScalarKind::String, &EmptyRegistry, "t")
            .unwrap()
            .unwrap();
        assert_eq!(back, entries);
    }
}
