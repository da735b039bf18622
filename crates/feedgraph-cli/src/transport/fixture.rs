//! Offline transport serving saved responses from a directory.
//!
//! Responses are looked up by API target and call order. The n-th call
//! (starting at 0) to `browse` reads `browse.n.json`, falling back to
//! `browse.json`. Slashes in targets become underscores, so
//! `account/set_setting` reads `account_set_setting.json`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use feedgraph::{Actions, FeedError, FeedResult};

pub struct FixtureActions {
    dir: PathBuf,
    calls: Mutex<HashMap<String, usize>>,
}

impl FixtureActions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files tried for the `index`-th call to `target`, in order.
    fn candidates(&self, target: &str, index: usize) -> [PathBuf; 2] {
        let stem = target.trim_matches('/').replace('/', "_");
        [
            self.dir.join(format!("{stem}.{index}.json")),
            self.dir.join(format!("{stem}.json")),
        ]
    }
}

#[async_trait]
impl Actions for FixtureActions {
    async fn execute(&self, target: &str, _payload: Value) -> FeedResult<Value> {
        let index = {
            let mut calls = self.calls.lock().await;
            let count = calls.entry(target.to_string()).or_insert(0);
            let index = *count;
            *count += 1;
            index
        };

        for path in self.candidates(target, index) {
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => {
                    tracing::debug!("Serving {} from {}", target, path.display());
                    return serde_json::from_str(&text).map_err(|e| {
                        FeedError::Transport(format!("fixture {}: {e}", path.display()))
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(FeedError::Transport(format!(
                        "fixture {}: {e}",
                        path.display()
                    )))
                }
            }
        }

        Err(FeedError::Transport(format!(
            "no fixture for call {index} to {target} in {}",
            self.dir.display()
        )))
    }
}
