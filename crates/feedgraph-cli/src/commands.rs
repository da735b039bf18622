//! The work behind each CLI subcommand. Every command returns the report it
//! would print, so the binary only decides where output goes.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde_json::{json, Value};

use feedgraph::{Actions, Channel, FeedError, FeedResult, Parser, Settings, TabSelectable};

use crate::render;

/// Browse id of the account settings overview.
pub const SETTINGS_BROWSE_ID: &str = "SPaccount_overview";

/// What to fetch for `feedgraph channel`.
#[derive(Debug, Clone, Default)]
pub struct ChannelRequest {
    pub browse_id: String,
    /// Tab URL suffix such as `videos` or `shorts`.
    pub tab: Option<String>,
    /// Filter chip text.
    pub filter: Option<String>,
    /// Extra list pages to follow.
    pub pages: usize,
}

/// Parse a saved response and summarise what was recognised in it.
pub async fn inspect(path: &Path) -> anyhow::Result<String> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let raw: Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    let page = Parser::parse_response(raw)?;
    Ok(render::memo_summary(&page))
}

/// `None` at the end of the feed, the next page otherwise.
fn next_page<T>(result: FeedResult<T>) -> FeedResult<Option<T>> {
    match result {
        Ok(page) => Ok(Some(page)),
        Err(FeedError::NoContinuation) => Ok(None),
        Err(e) => Err(e),
    }
}

pub async fn channel(actions: Arc<dyn Actions>, request: &ChannelRequest) -> anyhow::Result<String> {
    let raw = actions
        .execute("browse", json!({ "browseId": request.browse_id }))
        .await?;
    let mut channel = Channel::new(Arc::clone(&actions), raw)?;

    if let Some(url) = &request.tab {
        let tab = channel.get_tab_by_url(url)?.clone();
        let page = channel.select_tab(&tab).await?;
        channel = Channel::new(Arc::clone(&actions), page)?;
    }

    let mut lines = vec![render::channel_report(&channel)];

    if let Some(filter) = &request.filter {
        let mut list = channel.apply_filter(filter.as_str()).await?;
        lines.push(render::list_report(
            &format!("filter {filter}"),
            list.contents.as_ref(),
        ));
        for n in 0..request.pages {
            match next_page(list.get_continuation().await)? {
                Some(next) => list = next,
                None => break,
            }
            lines.push(render::list_report(&format!("page {}", n + 2), list.contents.as_ref()));
        }
        return Ok(lines.join("\n"));
    }

    if request.pages > 0 {
        let Some(mut list) = next_page(channel.get_continuation().await)? else {
            lines.push("No more items".to_string());
            return Ok(lines.join("\n"));
        };
        lines.push(render::list_report("page 2", list.contents.as_ref()));
        for n in 1..request.pages {
            match next_page(list.get_continuation().await)? {
                Some(next) => list = next,
                None => break,
            }
            lines.push(render::list_report(&format!("page {}", n + 2), list.contents.as_ref()));
        }
    }

    Ok(lines.join("\n"))
}

pub async fn settings(actions: Arc<dyn Actions>, item: Option<&str>) -> anyhow::Result<String> {
    let raw = actions
        .execute("browse", json!({ "browseId": SETTINGS_BROWSE_ID }))
        .await?;
    let mut settings = Settings::new(Arc::clone(&actions), raw)?;

    if let Some(item) = item {
        settings = settings.select_sidebar_item(item).await?;
    }

    Ok(render::settings_report(&settings))
}
