//! Lazy, absence-tolerant traversal over a raw response tree.
//!
//! A [`Node`] is a shared handle on the raw JSON plus a JSON pointer to the
//! value it stands for. Descending never copies or re-walks the tree; the
//! pointer is only resolved when a value is actually read. Missing keys give
//! an absent node, and errors surface only when an absent or incompatible
//! value is coerced into something required.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::endpoint::Endpoint;
use crate::error::{FeedError, FeedResult};
use crate::shape::{Shape, ShapeCatalog, ShapeKind, ShapeList, ShapeTag};

pub(crate) fn value_kind(value: Option<&Value>) -> &'static str {
    match value {
        None => "absent",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "bool",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// A position inside a raw response tree.
#[derive(Clone)]
pub struct Node {
    root: Arc<Value>,
    /// JSON pointer into `root`; `None` for a detached absent node.
    path: Option<String>,
    catalog: Arc<ShapeCatalog>,
}

impl Node {
    /// Wrap a raw value using the built-in shape catalog.
    pub fn new(value: Value) -> Self {
        Self::with_catalog(value, ShapeCatalog::builtin())
    }

    /// Wrap a raw value, classifying against `catalog`.
    pub fn with_catalog(value: Value, catalog: Arc<ShapeCatalog>) -> Self {
        Self {
            root: Arc::new(value),
            path: Some(String::new()),
            catalog,
        }
    }

    /// A node that stands for nothing.
    pub fn absent() -> Self {
        Self {
            root: Arc::new(Value::Null),
            path: None,
            catalog: ShapeCatalog::builtin(),
        }
    }

    pub fn catalog(&self) -> &Arc<ShapeCatalog> {
        &self.catalog
    }

    /// JSON pointer of this node relative to the response root.
    pub fn pointer(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// The raw value, if present.
    pub fn value(&self) -> Option<&Value> {
        self.path.as_deref().and_then(|p| self.root.pointer(p))
    }

    pub fn is_present(&self) -> bool {
        self.value().is_some()
    }

    /// Short name of the value's JSON type, `"absent"` when missing.
    pub fn kind(&self) -> &'static str {
        value_kind(self.value())
    }

    fn child(&self, segment: &str) -> Node {
        let path = self.path.as_ref().map(|p| {
            let escaped = segment.replace('~', "~0").replace('/', "~1");
            format!("{p}/{escaped}")
        });
        Node {
            root: Arc::clone(&self.root),
            path,
            catalog: Arc::clone(&self.catalog),
        }
    }

    /// Descend into an object key. Never fails.
    pub fn key(&self, name: &str) -> Node {
        self.child(name)
    }

    /// Descend into an array element. Never fails.
    pub fn at(&self, index: usize) -> Node {
        self.child(&index.to_string())
    }

    /// Treat this node as an ordered sequence.
    pub fn array(&self) -> FeedResult<NodeList> {
        match self.value() {
            Some(Value::Array(items)) => Ok(NodeList::new(
                (0..items.len()).map(|i| self.at(i)).collect(),
            )),
            _ => Err(FeedError::type_mismatch("array", self.kind())),
        }
    }

    /// Like [`Node::array`], but anything that is not an array reads as empty.
    pub fn items(&self) -> NodeList {
        self.array().unwrap_or_default()
    }

    /// Child nodes in document order.
    pub fn children(&self) -> Vec<Node> {
        match self.value() {
            Some(Value::Object(map)) => map.keys().map(|k| self.key(k)).collect(),
            Some(Value::Array(items)) => (0..items.len()).map(|i| self.at(i)).collect(),
            _ => Vec::new(),
        }
    }

    /// Every shape this node matches in the catalog.
    pub fn classify(&self) -> Vec<Shape> {
        self.catalog.classify(self)
    }

    /// Ordered structural match: the first of `tags` this node matches.
    pub fn as_one_of(&self, tags: &[ShapeTag]) -> Option<Shape> {
        self.catalog.match_one_of(self, tags)
    }

    /// Coerce into a typed shape, `None` when the node is something else.
    pub fn parse_as<T: ShapeKind>(&self) -> Option<T> {
        self.as_one_of(&[T::TAG]).and_then(T::from_shape)
    }

    /// Coerce into a typed shape the caller cannot do without.
    pub fn require<T: ShapeKind>(&self) -> FeedResult<T> {
        self.parse_as::<T>().ok_or_else(|| {
            let found = match self.value() {
                Some(Value::Object(map)) => {
                    let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                    format!("object with keys [{}]", keys.join(", "))
                }
                _ => self.kind().to_string(),
            };
            FeedError::type_mismatch(T::TAG.name(), found)
        })
    }

    /// Read a text field in either `simpleText` or `runs` form.
    pub fn text(&self) -> Option<String> {
        match self.value()? {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => {
                if let Some(Value::String(s)) = map.get("simpleText") {
                    return Some(s.clone());
                }
                if let Some(Value::Array(runs)) = map.get("runs") {
                    return Some(
                        runs.iter()
                            .filter_map(|r| r.get("text").and_then(Value::as_str))
                            .collect(),
                    );
                }
                map.get("content")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            }
            _ => None,
        }
    }

    pub fn string(&self) -> Option<String> {
        self.value().and_then(Value::as_str).map(str::to_string)
    }

    pub fn bool(&self) -> Option<bool> {
        self.value().and_then(Value::as_bool)
    }

    pub fn u64(&self) -> Option<u64> {
        self.value().and_then(Value::as_u64)
    }

    /// Strings of an array node; non-string elements are skipped.
    pub fn strings(&self) -> Vec<String> {
        self.items().iter().filter_map(Node::string).collect()
    }

    /// The endpoint descriptor this node carries, if it is one.
    pub fn endpoint(&self) -> Option<Endpoint> {
        Endpoint::from_node(self)
    }

    /// Value of a visible field: the typed projection's field for shaped
    /// nodes, the raw key otherwise.
    pub fn field(&self, name: &str) -> Option<Value> {
        if let Some(shape) = self.classify().into_iter().next() {
            return shape.fields().get(name).cloned();
        }
        match self.value()? {
            Value::Object(map) => map.get(name).cloned(),
            _ => None,
        }
    }

    /// Whether every constraint equals the node's visible field.
    pub fn matches(&self, constraints: &[(&str, Value)]) -> bool {
        if let Some(shape) = self.classify().into_iter().next() {
            return shape.matches(constraints);
        }
        match self.value() {
            Some(Value::Object(map)) => constraints
                .iter()
                .all(|(k, v)| map.get(*k).is_some_and(|found| found == v)),
            _ => false,
        }
    }

    /// Raw object fields, cloned.
    pub fn object(&self) -> Option<Map<String, Value>> {
        self.value().and_then(Value::as_object).cloned()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("pointer", &self.path)
            .field("kind", &self.kind())
            .finish()
    }
}

/// An ordered sequence of nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeList {
    nodes: Vec<Node>,
}

impl NodeList {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn first(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn at(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Keep the elements matching any of `tags`, in order.
    pub fn filter_by_shape(&self, tags: &[ShapeTag]) -> ShapeList {
        self.nodes.iter().filter_map(|n| n.as_one_of(tags)).collect()
    }

    /// Every element coerced to `T`; elements of other shapes are dropped.
    pub fn as_all<T: ShapeKind>(&self) -> Vec<T> {
        self.nodes.iter().filter_map(Node::parse_as::<T>).collect()
    }

    pub fn first_of_type<T: ShapeKind>(&self) -> Option<T> {
        self.nodes.iter().find_map(Node::parse_as::<T>)
    }

    /// First element whose visible fields match every constraint.
    pub fn get(&self, constraints: &[(&str, Value)]) -> Option<&Node> {
        self.nodes.iter().find(|n| n.matches(constraints))
    }
}

impl IntoIterator for NodeList {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{ChipCloudChip, Tab};
    use serde_json::json;

    fn tabs_node() -> Node {
        Node::new(json!({
            "tabs": [
                { "tabRenderer": { "title": "Home", "selected": false } },
                { "tabRenderer": { "title": { "runs": [{ "text": "Vid" }, { "text": "eos" }] }, "selected": true } },
                { "expandableTabRenderer": { "title": "Search", "selected": false } },
                { "unknownRenderer": {} }
            ]
        }))
    }

    #[test]
    fn test_missing_key_is_absent_not_error() {
        let node = Node::new(json!({ "a": { "b": 1 } }));
        let missing = node.key("x").key("y").at(3);
        assert!(!missing.is_present());
        assert_eq!(missing.kind(), "absent");
        assert_eq!(node.key("a").key("b").u64(), Some(1));
    }

    #[test]
    fn test_keys_with_slashes_are_escaped() {
        let node = Node::new(json!({ "a/b": { "c~d": "ok" } }));
        assert_eq!(node.key("a/b").key("c~d").string().as_deref(), Some("ok"));
    }

    #[test]
    fn test_array_on_non_sequence_is_type_mismatch() {
        let node = Node::new(json!({ "a": { "b": 1 } }));
        let err = node.key("a").array().unwrap_err();
        assert!(matches!(
            err,
            FeedError::TypeMismatch { ref expected, ref found } if expected == "array" && found == "object"
        ));
        assert!(node.key("missing").array().is_err());
        assert!(node.key("missing").items().is_empty());
    }

    #[test]
    fn test_text_forms() {
        let node = Node::new(json!({
            "simple": { "simpleText": "Hello" },
            "runs": { "runs": [{ "text": "Hel" }, { "text": "lo" }] },
            "plain": "Hello",
            "number": 3
        }));
        assert_eq!(node.key("simple").text().as_deref(), Some("Hello"));
        assert_eq!(node.key("runs").text().as_deref(), Some("Hello"));
        assert_eq!(node.key("plain").text().as_deref(), Some("Hello"));
        assert_eq!(node.key("number").text(), None);
    }

    #[test]
    fn test_filter_by_shape_then_get_selected() {
        let tabs = tabs_node().key("tabs").array().unwrap();
        let shaped = tabs.filter_by_shape(&[ShapeTag::Tab, ShapeTag::ExpandableTab]);
        assert_eq!(shaped.len(), 3);

        let selected = shaped.get(&[("selected", json!(true))]).unwrap();
        let tab = Tab::from_shape_ref(selected).unwrap();
        assert_eq!(tab.title.as_deref(), Some("Videos"));
    }

    #[test]
    fn test_as_one_of_respects_candidate_order() {
        let node = tabs_node().key("tabs").at(2);
        assert!(node.as_one_of(&[ShapeTag::Tab]).is_none());
        let shape = node
            .as_one_of(&[ShapeTag::Tab, ShapeTag::ExpandableTab])
            .unwrap();
        assert_eq!(shape.tag(), ShapeTag::ExpandableTab);
    }

    #[test]
    fn test_require_reports_mismatch() {
        let node = tabs_node().key("tabs").at(0);
        let err = node.require::<ChipCloudChip>().unwrap_err();
        match err {
            FeedError::TypeMismatch { expected, found } => {
                assert_eq!(expected, "ChipCloudChip");
                assert_eq!(found, "object with keys [tabRenderer]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_node_list_get_on_raw_objects() {
        let list = Node::new(json!([{ "id": 1, "on": false }, { "id": 2, "on": true }]))
            .array()
            .unwrap();
        let hit = list.get(&[("on", json!(true))]).unwrap();
        assert_eq!(hit.key("id").u64(), Some(2));
        assert!(list.get(&[("on", json!(true)), ("id", json!(1))]).is_none());
    }
}
