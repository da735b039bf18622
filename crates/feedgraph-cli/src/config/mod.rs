//! Client configuration loading and resolution.

use serde::Serialize;
use serde_json::{json, Value};

pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";
pub const DEFAULT_CLIENT_NAME: &str = "WEB";
pub const DEFAULT_CLIENT_VERSION: &str = "2.20241010.00.00";
pub const DEFAULT_HL: &str = "en";
pub const DEFAULT_GL: &str = "US";
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

const ENV_BASE_URL: &str = "FEEDGRAPH_BASE_URL";
const ENV_API_KEY: &str = "FEEDGRAPH_API_KEY";
const ENV_HL: &str = "FEEDGRAPH_HL";
const ENV_GL: &str = "FEEDGRAPH_GL";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid base URL \"{0}\": expected an http:// or https:// URL")]
    InvalidBaseUrl(String),

    #[error("Timeout must be greater than zero")]
    ZeroTimeout,
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub hl: Option<String>,
    pub gl: Option<String>,
    pub timeout_ms: Option<u64>,
}

/// Everything the HTTP transport needs to talk to the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub client_name: String,
    pub client_version: String,
    pub hl: String,
    pub gl: String,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            client_name: DEFAULT_CLIENT_NAME.to_string(),
            client_version: DEFAULT_CLIENT_VERSION.to_string(),
            hl: DEFAULT_HL.to_string(),
            gl: DEFAULT_GL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    /// Resolve: CLI flag > environment variable > default.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Like [`ClientConfig::resolve`], reading the environment through `env`.
    pub fn resolve_with(
        overrides: ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let base_url = overrides
            .base_url
            .or_else(|| env(ENV_BASE_URL))
            .unwrap_or(defaults.base_url);
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(base_url));
        }

        let timeout_ms = overrides.timeout_ms.unwrap_or(defaults.timeout_ms);
        if timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: overrides.api_key.or_else(|| env(ENV_API_KEY)),
            hl: overrides.hl.or_else(|| env(ENV_HL)).unwrap_or(defaults.hl),
            gl: overrides.gl.or_else(|| env(ENV_GL)).unwrap_or(defaults.gl),
            client_name: defaults.client_name,
            client_version: defaults.client_version,
            timeout_ms,
        })
    }

    /// Full URL of an API target such as `browse` or `account/set_setting`.
    pub fn endpoint_url(&self, target: &str) -> String {
        format!(
            "{}/youtubei/v1/{}",
            self.base_url,
            target.trim_start_matches('/')
        )
    }

    /// The `context` object every request carries.
    pub fn context(&self) -> Value {
        json!({
            "client": {
                "clientName": self.client_name,
                "clientVersion": self.client_version,
                "hl": self.hl,
                "gl": self.gl
            }
        })
    }
}
