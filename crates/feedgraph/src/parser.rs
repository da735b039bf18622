//! Response parsing: root nodes plus memo population.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{FeedError, FeedResult};
use crate::memo::{Memo, MemoSeed};
use crate::node::{value_kind, Node};
use crate::shape::{Shape, ShapeCatalog};

/// Top-level keys a response must carry at least one of.
pub const ANCHORS: &[&str] = &[
    "contents",
    "header",
    "metadata",
    "microformat",
    "sidebar",
    "onResponseReceivedActions",
    "onResponseReceivedEndpoints",
    "continuationContents",
];

/// A parsed response: the top-level regions and the memo built from them.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub root: Node,
    pub contents: Node,
    pub header: Node,
    pub metadata: Node,
    pub microformat: Node,
    pub sidebar: Node,
    pub continuation_contents: Node,
    pub on_response_received_actions: Vec<Shape>,
    pub on_response_received_endpoints: Vec<Shape>,
    memo: Memo,
    header_memo: Memo,
}

impl ParsedResponse {
    /// Every shape found in the response, header included.
    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    /// Shapes found under `header` only.
    pub fn header_memo(&self) -> &Memo {
        &self.header_memo
    }

    pub fn catalog(&self) -> &Arc<ShapeCatalog> {
        self.root.catalog()
    }

    /// Carry foreign entries into this response's memo.
    pub fn with_seed(mut self, seed: MemoSeed) -> Self {
        self.memo.apply_seed(seed);
        self
    }
}

/// Raw JSON, or a response that has already been through the parser.
#[derive(Debug, Clone)]
pub enum PageData {
    Raw(Value),
    Parsed(ParsedResponse),
}

impl PageData {
    pub fn resolve(self, parser: &Parser) -> FeedResult<ParsedResponse> {
        match self {
            PageData::Raw(raw) => parser.parse(raw),
            PageData::Parsed(page) => Ok(page),
        }
    }
}

impl From<Value> for PageData {
    fn from(raw: Value) -> Self {
        PageData::Raw(raw)
    }
}

impl From<ParsedResponse> for PageData {
    fn from(page: ParsedResponse) -> Self {
        PageData::Parsed(page)
    }
}

/// Builds [`ParsedResponse`]s against a shape catalog.
#[derive(Debug, Clone)]
pub struct Parser {
    catalog: Arc<ShapeCatalog>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::with_catalog(ShapeCatalog::builtin())
    }

    pub fn with_catalog(catalog: Arc<ShapeCatalog>) -> Self {
        Self { catalog }
    }

    /// Parse with the built-in catalog.
    pub fn parse_response(raw: Value) -> FeedResult<ParsedResponse> {
        Self::new().parse(raw)
    }

    pub fn parse(&self, raw: Value) -> FeedResult<ParsedResponse> {
        let object = match &raw {
            Value::Object(object) => object,
            other => {
                return Err(FeedError::InvalidStructure(format!(
                    "expected a JSON object at the top level, got {}",
                    value_kind(Some(other))
                )))
            }
        };
        if !ANCHORS.iter().any(|key| object.contains_key(*key)) {
            let keys: Vec<&str> = object.keys().map(String::as_str).collect();
            return Err(FeedError::InvalidStructure(format!(
                "response has none of the expected top-level keys (found: [{}])",
                keys.join(", ")
            )));
        }

        let root = Node::with_catalog(raw, Arc::clone(&self.catalog));
        let contents = root.key("contents");
        let header = root.key("header");
        let metadata = root.key("metadata");
        let microformat = root.key("microformat");
        let sidebar = root.key("sidebar");
        let continuation_contents = root.key("continuationContents");
        let actions = root.key("onResponseReceivedActions");
        let endpoints = root.key("onResponseReceivedEndpoints");

        let mut memo = Memo::new();
        for region in [
            &contents,
            &continuation_contents,
            &endpoints,
            &actions,
            &sidebar,
            &metadata,
            &microformat,
        ] {
            memo.walk(region);
        }

        let mut header_memo = Memo::new();
        header_memo.walk(&header);
        memo.extend(header_memo.clone());

        let page = ParsedResponse {
            on_response_received_actions: classify_sequence(&actions),
            on_response_received_endpoints: classify_sequence(&endpoints),
            root,
            contents,
            header,
            metadata,
            microformat,
            sidebar,
            continuation_contents,
            memo,
            header_memo,
        };

        tracing::debug!(
            "Parsed response: {} shapes, {} received actions, {} received endpoints",
            page.memo.len(),
            page.on_response_received_actions.len(),
            page.on_response_received_endpoints.len()
        );

        Ok(page)
    }
}

/// First shape of every element in a sequence region; unknown elements are
/// skipped.
fn classify_sequence(region: &Node) -> Vec<Shape> {
    region
        .items()
        .iter()
        .filter_map(|item| {
            let shape = item.classify().into_iter().next();
            if shape.is_none() {
                tracing::debug!("Unrecognised entry at {:?}", item.pointer());
            }
            shape
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{ChipCloudChip, ShapeTag, SubscribeButton};
    use serde_json::json;

    #[test]
    fn test_rejects_responses_without_anchors() {
        let err = Parser::parse_response(json!({ "responseContext": {} })).unwrap_err();
        assert!(matches!(err, FeedError::InvalidStructure(_)));

        let err = Parser::parse_response(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, FeedError::InvalidStructure(_)));
    }

    #[test]
    fn test_degraded_response_yields_empty_lookups() {
        let page = Parser::parse_response(json!({ "metadata": {} })).unwrap();
        assert!(page.memo().is_empty());
        assert!(!page.contents.is_present());
        assert!(page.on_response_received_actions.is_empty());
    }

    #[test]
    fn test_header_shapes_land_in_both_memos() {
        let page = Parser::parse_response(json!({
            "header": { "c4TabbedHeaderRenderer": {
                "title": "Rust",
                "subscribeButton": { "subscribeButtonRenderer": { "subscribed": false, "channelId": "UC1" } }
            } },
            "contents": { "chipCloudChipRenderer": { "text": "All", "isSelected": true } }
        }))
        .unwrap();

        assert!(page.header_memo().first::<SubscribeButton>().is_some());
        assert!(page.memo().first::<SubscribeButton>().is_some());
        assert!(page.header_memo().first::<ChipCloudChip>().is_none());
        assert!(page.memo().contains(ShapeTag::C4TabbedHeader));
    }

    #[test]
    fn test_received_actions_are_classified_in_order() {
        let page = Parser::parse_response(json!({
            "onResponseReceivedActions": [
                { "reloadContinuationItemsCommand": { "slot": "RELOAD_CONTINUATION_SLOT_HEADER", "continuationItems": [] } },
                { "somethingNew": {} },
                { "appendContinuationItemsAction": { "continuationItems": [] } }
            ]
        }))
        .unwrap();

        let tags: Vec<ShapeTag> = page
            .on_response_received_actions
            .iter()
            .map(Shape::tag)
            .collect();
        assert_eq!(
            tags,
            [
                ShapeTag::ReloadContinuationItemsCommand,
                ShapeTag::AppendContinuationItemsAction
            ]
        );
    }
}
