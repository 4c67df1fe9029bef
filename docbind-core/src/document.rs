//! The hierarchical document value tree.
//!
//! A [`Document`] is the persisted form of one managed-type instance: a tree
//! of scalar leaves, ordered sequences, and nested key-value sections. Leaves
//! and sections are addressed by dotted paths (`"home.location"` names the
//! `location` entry of the `home` section). The concrete file syntax is a
//! backend concern; the value model here is plain [`serde_json::Value`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The hierarchical key-value representation of one instance.
///
/// One document corresponds to exactly one instance of one managed type and
/// is named by that instance's unique key within its collection.
///
/// # Example
///
/// ```ignore
/// use docbind::document::Document;
/// use serde_json::json;
///
/// let mut doc = Document::new();
/// doc.set("owner", json!("alice"));
/// doc.set("home.world", json!("overworld"));
/// assert!(doc.contains("home.world"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    root: Map<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value at the given dotted path, if present.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.root.get(segments.next()?)?;

        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }

        Some(current)
    }

    /// Returns `true` if the given dotted path is present in the document.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Sets the value at the given dotted path, creating intermediate
    /// sections as needed. An intermediate leaf that is not a section is
    /// replaced by one.
    pub fn set(&mut self, path: &str, value: Value) {
        let mut segments = path.split('.').peekable();
        let mut current = &mut self.root;

        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                current.insert(segment.to_string(), value);
                return;
            }

            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));

            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }

            let Value::Object(next) = entry else { return };
            current = next;
        }
    }

    /// Returns the nested section at the given dotted path, or `None` if the
    /// path is absent or does not name a section.
    pub fn section(&self, path: &str) -> Option<&Map<String, Value>> {
        self.get(path)?.as_object()
    }

    /// Returns the immediate sub-keys of the section at the given path.
    pub fn section_keys(&self, path: &str) -> Option<Vec<String>> {
        Some(self.section(path)?.keys().cloned().collect())
    }

    /// Returns `true` if the document has no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Consumes the document and returns the underlying map.
    pub fn into_inner(self) -> Map<String, Value> {
        self.root
    }
}

impl From<Map<String, Value>> for Document {
    fn from(root: Map<String, Value>) -> Self {
        Self { root }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_and_set_flat_paths() {
        let mut doc = Document::new();
        doc.set("name", json!("island-1"));

        assert_eq!(doc.get("name"), Some(&json!("island-1")));
        assert!(doc.contains("name"));
        assert!(!doc.contains("missing"));
    }

    #[test]
    fn set_creates_intermediate_sections() {
        let mut doc = Document::new();
        doc.set("home.location.world", json!("overworld"));

        assert_eq!(doc.get("home.location.world"), Some(&json!("overworld")));
        assert!(doc.section("home.location").is_some());
    }

    #[test]
    fn set_replaces_leaf_with_section() {
        let mut doc = Document::new();
        doc.set("home", json!("old-leaf"));
        doc.set("home.world", json!("overworld"));

        assert_eq!(doc.get("home.world"), Some(&json!("overworld")));
    }

    #[test]
    fn section_keys_lists_immediate_children() {
        let mut doc = Document::new();
        doc.set("members.alice", json!(1));
        doc.set("members.bob", json!(2));

        let mut keys = doc.section_keys("members").unwrap();
        keys.sort();
        assert_eq!(keys, vec!["alice".to_string(), "bob".to_string()]);
        assert_eq!(doc.section_keys("members.alice"), None);
    }

    #[test]
    fn roundtrips_through_serde() {
        let mut doc = Document::new();
        doc.set("a.b", json!([1, 2, 3]));

        let text = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&text).unwrap();
        assert_eq!(back, doc);
    }
}
