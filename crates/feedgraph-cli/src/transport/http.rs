//! Live transport: JSON POSTs to the service API.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use feedgraph::{Actions, FeedError, FeedResult};

use crate::config::ClientConfig;

/// Longest error body echoed back in a transport error.
const MAX_ERROR_BODY: usize = 200;

/// Sends every call as `POST {base_url}/youtubei/v1/{target}` with the
/// client context merged into the payload. Nothing is retried.
#[derive(Clone)]
pub struct HttpActions {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpActions {
    pub fn new(config: ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(concat!("feedgraph/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request_body(&self, payload: Value) -> Value {
        let mut body = match payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        body.insert("context".to_string(), self.config.context());
        Value::Object(body)
    }
}

#[async_trait]
impl Actions for HttpActions {
    async fn execute(&self, target: &str, payload: Value) -> FeedResult<Value> {
        let url = self.config.endpoint_url(target);
        tracing::debug!("POST {url}");

        let mut request = self.client.post(&url).json(&self.request_body(payload));
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("key", key.as_str()), ("prettyPrint", "false")]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FeedError::Transport(format!("POST {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            tracing::warn!("POST {url} returned {status}");
            return Err(FeedError::Transport(format!(
                "POST {url} returned {status}: {body}"
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FeedError::Transport(format!("invalid JSON from {url}: {e}")))
    }
}
