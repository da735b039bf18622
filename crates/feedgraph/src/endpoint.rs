//! Callable request descriptors and the transport seam they go through.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::FeedResult;
use crate::node::Node;
use crate::parser::{ParsedResponse, Parser};

/// Executes one API call and returns the raw JSON response.
///
/// Implementations own authentication, client context, timeouts and
/// retries; nothing in this crate retries a failed call.
#[async_trait]
pub trait Actions: Send + Sync {
    async fn execute(&self, target: &str, payload: Value) -> FeedResult<Value>;
}

/// Commands the service embeds in interactive elements, with the API target
/// each one maps to.
const COMMANDS: &[(&str, &str)] = &[
    ("browseEndpoint", "browse"),
    ("continuationCommand", "browse"),
    ("searchEndpoint", "search"),
    ("watchEndpoint", "next"),
    ("reelWatchEndpoint", "reel/reel_item_watch"),
    ("setSettingEndpoint", "account/set_setting"),
    ("feedbackEndpoint", "feedback"),
];

/// Raw keys that describe the page rather than the request.
const NON_REQUEST_KEYS: &[&str] = &["canonicalBaseUrl"];

const API_PREFIX: &str = "/youtubei/v1/";

/// A request descriptor extracted from response content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Endpoint {
    /// Raw command key the descriptor was read from.
    pub command: String,
    /// API target, e.g. `browse` or `account/set_setting`.
    pub target: String,
    pub payload: Map<String, Value>,
    /// Web URL of the page the endpoint leads to.
    pub url: Option<String>,
}

/// Per-call additions to an endpoint's payload.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub query: Option<String>,
    pub params: Map<String, Value>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

fn continuation_target(request: Option<&str>) -> &'static str {
    match request {
        Some("CONTINUATION_REQUEST_TYPE_WATCH_NEXT") => "next",
        Some("CONTINUATION_REQUEST_TYPE_SEARCH") => "search",
        Some("CONTINUATION_REQUEST_TYPE_REEL_WATCH_SEQUENCE") => "reel/reel_watch_sequence",
        _ => "browse",
    }
}

impl Endpoint {
    /// Read an endpoint from a raw command object. `None` when the node
    /// carries neither a known command nor an API URL.
    pub fn from_node(node: &Node) -> Option<Endpoint> {
        let web = node.key("commandMetadata").key("webCommandMetadata");
        let url = web.key("url").string();
        let api_target = web
            .key("apiUrl")
            .string()
            .map(|api| api.trim_start_matches(API_PREFIX).to_string());

        let found = COMMANDS
            .iter()
            .find(|(command, _)| node.key(command).value().is_some_and(Value::is_object));

        let Some((command, default_target)) = found else {
            return api_target.map(|target| Endpoint {
                command: String::from("unknown"),
                target,
                payload: Map::new(),
                url,
            });
        };

        let body = node.key(command);
        let (target, payload) = match *command {
            "continuationCommand" => {
                let request = body.key("request").string();
                let mut payload = Map::new();
                if let Some(token) = body.key("token").string() {
                    payload.insert("continuation".to_string(), Value::String(token));
                }
                (continuation_target(request.as_deref()).to_string(), payload)
            }
            "feedbackEndpoint" => {
                let mut payload = Map::new();
                if let Some(token) = body.key("feedbackToken").string() {
                    payload.insert("feedbackTokens".to_string(), Value::from(vec![token]));
                }
                (default_target.to_string(), payload)
            }
            _ => {
                let mut payload = body.object().unwrap_or_default();
                for key in NON_REQUEST_KEYS {
                    payload.remove(*key);
                }
                (default_target.to_string(), payload)
            }
        };

        Some(Endpoint {
            command: command.to_string(),
            target: api_target.unwrap_or(target),
            payload,
            url,
        })
    }

    /// Last path segment of the page URL.
    pub fn url_suffix(&self) -> Option<&str> {
        let url = self.url.as_deref()?;
        let path = url.split(['?', '#']).next().unwrap_or(url);
        path.rsplit('/').find(|s| !s.is_empty())
    }

    fn request_body(&self, options: CallOptions) -> Value {
        let mut body = self.payload.clone();
        if let Some(query) = options.query {
            body.insert("query".to_string(), Value::String(query));
        }
        body.extend(options.params);
        Value::Object(body)
    }

    /// Invoke the endpoint and return the raw response.
    pub async fn call(&self, actions: &dyn Actions, options: CallOptions) -> FeedResult<Value> {
        tracing::info!("Calling {} ({})", self.target, self.command);
        actions
            .execute(&self.target, self.request_body(options))
            .await
    }

    /// Invoke the endpoint and parse the response with `parser`.
    pub async fn call_parsed(
        &self,
        actions: &dyn Actions,
        options: CallOptions,
        parser: &Parser,
    ) -> FeedResult<ParsedResponse> {
        let raw = self.call(actions, options).await?;
        parser.parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(String, Value)>>,
    }

    #[async_trait]
    impl Actions for Recorder {
        async fn execute(&self, target: &str, payload: Value) -> FeedResult<Value> {
            self.calls
                .lock()
                .unwrap()
                .push((target.to_string(), payload));
            Ok(json!({ "contents": {} }))
        }
    }

    #[test]
    fn test_browse_endpoint_with_url() {
        let node = Node::new(json!({
            "commandMetadata": { "webCommandMetadata": { "url": "/@rustlang/videos", "apiUrl": "/youtubei/v1/browse" } },
            "browseEndpoint": { "browseId": "UC123", "params": "EgZ2aWRlb3M", "canonicalBaseUrl": "/@rustlang" }
        }));
        let endpoint = node.endpoint().unwrap();
        assert_eq!(endpoint.command, "browseEndpoint");
        assert_eq!(endpoint.target, "browse");
        assert_eq!(endpoint.url_suffix(), Some("videos"));
        assert_eq!(endpoint.payload.get("browseId"), Some(&json!("UC123")));
        assert!(!endpoint.payload.contains_key("canonicalBaseUrl"));
    }

    #[test]
    fn test_continuation_request_types() {
        let node = Node::new(json!({
            "continuationCommand": { "token": "abc", "request": "CONTINUATION_REQUEST_TYPE_WATCH_NEXT" }
        }));
        let endpoint = node.endpoint().unwrap();
        assert_eq!(endpoint.target, "next");
        assert_eq!(endpoint.payload, json!({ "continuation": "abc" }).as_object().cloned().unwrap());
    }

    #[test]
    fn test_api_url_only_and_nothing() {
        let node = Node::new(json!({
            "commandMetadata": { "webCommandMetadata": { "apiUrl": "/youtubei/v1/account/account_menu" } }
        }));
        let endpoint = node.endpoint().unwrap();
        assert_eq!(endpoint.target, "account/account_menu");
        assert!(endpoint.payload.is_empty());

        assert!(Node::new(json!({ "clickTrackingParams": "x" })).endpoint().is_none());
        assert!(Node::absent().endpoint().is_none());
    }

    #[tokio::test]
    async fn test_call_merges_options_into_payload() {
        let node = Node::new(json!({ "browseEndpoint": { "browseId": "UC123", "params": "p" } }));
        let endpoint = node.endpoint().unwrap();
        let recorder = Recorder::default();

        let options = CallOptions::new().query("rust").param("hl", "en");
        endpoint.call(&recorder, options).await.unwrap();

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "browse");
        assert_eq!(
            calls[0].1,
            json!({ "browseId": "UC123", "params": "p", "query": "rust", "hl": "en" })
        );
    }
}
