use std::sync::Arc;

use async_trait::async_trait;

use super::{Feed, FeedPage};
use crate::endpoint::{Actions, CallOptions};
use crate::error::{FeedError, FeedResult};
use crate::parser::{PageData, ParsedResponse};
use crate::shape::Tab;

/// Pages whose content is split into tabs.
#[async_trait]
pub trait TabSelectable: FeedPage + Sync {
    /// Titles of every tab on the page, in document order.
    fn tabs(&self) -> Vec<String> {
        self.memo()
            .of_type::<Tab>()
            .iter()
            .filter_map(|tab| tab.title.clone())
            .collect()
    }

    /// Title of the selected tab.
    fn title(&self) -> Option<String> {
        self.memo()
            .find::<Tab>(|tab| tab.selected)
            .and_then(|tab| tab.title.clone())
    }

    /// URL suffixes of every tab, the keys accepted by
    /// [`get_tab_by_url`](Self::get_tab_by_url).
    fn tab_urls(&self) -> Vec<String> {
        self.memo()
            .of_type::<Tab>()
            .iter()
            .filter_map(|tab| tab.url_suffix())
            .map(str::to_string)
            .collect()
    }

    fn has_tab_with_url(&self, url: &str) -> bool {
        self.get_tab_by_url(url).is_ok()
    }

    /// The tab whose page URL ends in `url` (`videos`, `featured`, ...).
    fn get_tab_by_url(&self, url: &str) -> FeedResult<&Tab> {
        let tabs = self.memo().of_type::<Tab>();
        tabs.iter()
            .find(|tab| tab.url_suffix() == Some(url))
            .copied()
            .ok_or_else(|| FeedError::TabNotFound {
                requested: url.to_string(),
                available: self.tab_urls(),
            })
    }

    /// The tab with the given title, compared case-insensitively in any
    /// script.
    fn get_tab_by_name(&self, name: &str) -> FeedResult<&Tab> {
        let wanted = name.to_lowercase();
        let tabs = self.memo().of_type::<Tab>();
        tabs.iter()
            .find(|tab| {
                tab.title
                    .as_deref()
                    .is_some_and(|title| title.to_lowercase() == wanted)
            })
            .copied()
            .ok_or_else(|| FeedError::TabNotFound {
                requested: name.to_string(),
                available: self.tabs(),
            })
    }

    /// Fetch the page behind `tab`. The selected tab is the current page
    /// and costs no request.
    async fn select_tab(&self, tab: &Tab) -> FeedResult<ParsedResponse> {
        if tab.selected {
            return Ok(self.page().clone());
        }

        let endpoint = tab.endpoint.as_ref().ok_or_else(|| {
            FeedError::MissingEndpoint(format!(
                "tab {}",
                tab.title.as_deref().unwrap_or("<untitled>")
            ))
        })?;

        let feed = self.feed();
        endpoint
            .call_parsed(feed.actions().as_ref(), CallOptions::default(), &feed.parser())
            .await
    }
}

/// A plain feed with tab selection.
#[derive(Debug, Clone)]
pub struct TabbedFeed {
    feed: Feed,
}

impl TabbedFeed {
    pub fn new(actions: Arc<dyn Actions>, data: impl Into<PageData>) -> FeedResult<Self> {
        Ok(Self {
            feed: Feed::new(actions, data)?,
        })
    }

    /// Select `tab` and wrap the result as a new tabbed feed.
    pub async fn switch_to(&self, tab: &Tab) -> FeedResult<TabbedFeed> {
        let page = self.select_tab(tab).await?;
        TabbedFeed::new(Arc::clone(self.feed.actions()), page)
    }
}

impl From<Feed> for TabbedFeed {
    fn from(feed: Feed) -> Self {
        Self { feed }
    }
}

impl FeedPage for TabbedFeed {
    fn feed(&self) -> &Feed {
        &self.feed
    }
}

impl TabSelectable for TabbedFeed {}
