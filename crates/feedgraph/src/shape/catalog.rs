//! Data-driven table of shape matchers.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::Value;

use super::{Shape, ShapeKind, ShapeTag};
use crate::error::FeedResult;
use crate::node::Node;

/// Builds a typed instance from the payload under a renderer key.
pub type ShapeBuilder = fn(&Node) -> FeedResult<Shape>;

/// One matcher: a renderer key and the tag it classifies as.
#[derive(Clone)]
pub struct ShapeRule {
    pub tag: ShapeTag,
    pub renderer: Cow<'static, str>,
    pub build: ShapeBuilder,
}

impl ShapeRule {
    /// The built-in rule for `T`.
    pub fn of<T: ShapeKind>() -> Self {
        Self {
            tag: T::TAG,
            renderer: Cow::Borrowed(T::TAG.renderer()),
            build: T::TAG.builder(),
        }
    }

    /// Classify payloads under another renderer key as `T`.
    pub fn alias<T: ShapeKind>(renderer: impl Into<Cow<'static, str>>) -> Self {
        Self {
            renderer: renderer.into(),
            ..Self::of::<T>()
        }
    }
}

impl fmt::Debug for ShapeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeRule")
            .field("tag", &self.tag)
            .field("renderer", &self.renderer)
            .finish()
    }
}

/// The set of rules nodes are classified against.
#[derive(Debug, Clone, Default)]
pub struct ShapeCatalog {
    rules: Vec<ShapeRule>,
    by_renderer: HashMap<String, Vec<usize>>,
}

impl ShapeCatalog {
    /// A catalog that recognises nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Shared catalog holding one rule per [`ShapeTag`].
    pub fn builtin() -> Arc<ShapeCatalog> {
        static BUILTIN: OnceLock<Arc<ShapeCatalog>> = OnceLock::new();
        BUILTIN
            .get_or_init(|| Arc::new(Self::standard()))
            .clone()
    }

    /// An owned copy of the built-in rules, for extending.
    pub fn standard() -> Self {
        ShapeTag::ALL
            .iter()
            .fold(Self::empty(), |catalog, tag| {
                catalog.with_rule(ShapeRule {
                    tag: *tag,
                    renderer: Cow::Borrowed(tag.renderer()),
                    build: tag.builder(),
                })
            })
    }

    pub fn with_rule(mut self, rule: ShapeRule) -> Self {
        self.by_renderer
            .entry(rule.renderer.to_string())
            .or_default()
            .push(self.rules.len());
        self.rules.push(rule);
        self
    }

    pub fn recognizes(&self, tag: ShapeTag) -> bool {
        self.rules.iter().any(|r| r.tag == tag)
    }

    /// Rules whose renderer key appears on `node`, in key then rule order.
    fn candidates<'a>(&'a self, node: &Node) -> Vec<(&'a ShapeRule, Node)> {
        let Some(Value::Object(map)) = node.value() else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for (key, payload) in map {
            if !payload.is_object() {
                continue;
            }
            if let Some(indices) = self.by_renderer.get(key) {
                for &i in indices {
                    out.push((&self.rules[i], node.key(key)));
                }
            }
        }
        out
    }

    fn build(rule: &ShapeRule, payload: &Node) -> Option<Shape> {
        match (rule.build)(payload) {
            Ok(shape) => Some(shape),
            Err(e) => {
                tracing::debug!("Skipping {} at {:?}: {e}", rule.tag, payload.pointer());
                None
            }
        }
    }

    /// Every shape `node` matches. Unknown shapes yield nothing.
    pub fn classify(&self, node: &Node) -> Vec<Shape> {
        self.candidates(node)
            .into_iter()
            .filter_map(|(rule, payload)| Self::build(rule, &payload))
            .collect()
    }

    /// First match trying `tags` in the given order.
    pub fn match_one_of(&self, node: &Node, tags: &[ShapeTag]) -> Option<Shape> {
        let candidates = self.candidates(node);
        tags.iter().find_map(|tag| {
            candidates
                .iter()
                .filter(|(rule, _)| rule.tag == *tag)
                .find_map(|(rule, payload)| Self::build(rule, payload))
        })
    }
}
