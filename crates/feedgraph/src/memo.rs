//! Per-parse index of typed instances by shape.

use std::collections::HashMap;

use serde_json::Value;

use crate::node::Node;
use crate::shape::{Shape, ShapeKind, ShapeTag};

/// Shape tag → typed instances in encounter order.
///
/// Populated while a response is parsed and read-only afterwards. The only
/// foreign entries a memo may hold are the ones applied from a [`MemoSeed`]
/// before its feed is constructed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Memo {
    entries: HashMap<ShapeTag, Vec<Shape>>,
}

impl Memo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one node and append every match. Returns the match count.
    pub fn register(&mut self, node: &Node) -> usize {
        let shapes = node.classify();
        let count = shapes.len();
        for shape in shapes {
            self.add(shape);
        }
        count
    }

    /// Register `node` and everything below it, in document order.
    pub fn walk(&mut self, node: &Node) {
        self.register(node);
        for child in node.children() {
            self.walk(&child);
        }
    }

    pub fn add(&mut self, shape: Shape) {
        self.entries.entry(shape.tag()).or_default().push(shape);
    }

    /// Append every entry of `other` after this memo's own entries.
    pub fn extend(&mut self, other: Memo) {
        for (tag, shapes) in other.entries {
            self.entries.entry(tag).or_default().extend(shapes);
        }
    }

    /// Instances registered under `tag`; empty when there are none.
    pub fn get_by_tag(&self, tag: ShapeTag) -> &[Shape] {
        self.entries.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Instances of several tags, grouped in the order the tags are given.
    pub fn get_types(&self, tags: &[ShapeTag]) -> Vec<&Shape> {
        tags.iter()
            .flat_map(|tag| self.get_by_tag(*tag).iter())
            .collect()
    }

    pub fn of_type<T: ShapeKind>(&self) -> Vec<&T> {
        self.get_by_tag(T::TAG)
            .iter()
            .filter_map(T::from_shape_ref)
            .collect()
    }

    pub fn first<T: ShapeKind>(&self) -> Option<&T> {
        self.get_by_tag(T::TAG).iter().find_map(T::from_shape_ref)
    }

    pub fn find<T: ShapeKind>(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.get_by_tag(T::TAG)
            .iter()
            .filter_map(T::from_shape_ref)
            .find(|item| predicate(item))
    }

    /// First instance of `tag` whose visible fields match every constraint.
    pub fn get_where(&self, tag: ShapeTag, constraints: &[(&str, Value)]) -> Option<&Shape> {
        self.get_by_tag(tag).iter().find(|s| s.matches(constraints))
    }

    pub fn contains(&self, tag: ShapeTag) -> bool {
        !self.get_by_tag(tag).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Total number of registered instances.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Non-empty tags with their instance counts, ordered by tag.
    pub fn summary(&self) -> Vec<(ShapeTag, usize)> {
        let mut summary: Vec<(ShapeTag, usize)> = self
            .entries
            .iter()
            .filter(|(_, shapes)| !shapes.is_empty())
            .map(|(tag, shapes)| (*tag, shapes.len()))
            .collect();
        summary.sort_by_key(|(tag, _)| *tag);
        summary
    }

    /// Replace the entries of each seeded tag.
    pub(crate) fn apply_seed(&mut self, seed: MemoSeed) {
        for (tag, shapes) in seed.entries {
            tracing::debug!("Seeding {} {} entries", shapes.len(), tag);
            self.entries.insert(tag, shapes);
        }
    }
}

/// Entries carried from one page's memo into the next page's memo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoSeed {
    entries: Vec<(ShapeTag, Vec<Shape>)>,
}

impl MemoSeed {
    /// Copy the entries of `tags` out of `memo`.
    pub fn carry(memo: &Memo, tags: &[ShapeTag]) -> Self {
        Self {
            entries: tags
                .iter()
                .map(|tag| (*tag, memo.get_by_tag(*tag).to_vec()))
                .collect(),
        }
    }

    pub fn tags(&self) -> Vec<ShapeTag> {
        self.entries.iter().map(|(tag, _)| *tag).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, shapes)| shapes.is_empty())
    }
}
