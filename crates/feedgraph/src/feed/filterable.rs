use std::sync::Arc;

use async_trait::async_trait;

use super::{Feed, FeedPage};
use crate::endpoint::{Actions, CallOptions};
use crate::error::{FeedError, FeedResult};
use crate::memo::MemoSeed;
use crate::parser::{PageData, ParsedResponse};
use crate::shape::{ChipCloudChip, ShapeTag};

/// Shapes that describe the filter bar and travel with continuations.
pub(crate) const FILTER_TAGS: [ShapeTag; 2] =
    [ShapeTag::FeedFilterChipBar, ShapeTag::ChipCloudChip];

/// Which filter to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSelector {
    /// Exact chip text.
    Text(String),
    Chip(ChipCloudChip),
}

impl From<&str> for FilterSelector {
    fn from(text: &str) -> Self {
        FilterSelector::Text(text.to_string())
    }
}

impl From<String> for FilterSelector {
    fn from(text: String) -> Self {
        FilterSelector::Text(text)
    }
}

impl From<ChipCloudChip> for FilterSelector {
    fn from(chip: ChipCloudChip) -> Self {
        FilterSelector::Chip(chip)
    }
}

/// Pages that carry a filter chip bar.
#[async_trait]
pub trait FilterApplicable: FeedPage + Sync {
    /// Every chip on the page in encounter order.
    fn filter_chips(&self) -> Vec<&ChipCloudChip> {
        let bars = self.memo().get_by_tag(ShapeTag::FeedFilterChipBar).len();
        if bars > 1 {
            tracing::warn!("Page has {} filter chip bars, chips from all of them are used", bars);
        }
        self.memo().of_type::<ChipCloudChip>()
    }

    /// Texts of the available filters.
    fn filters(&self) -> Vec<String> {
        self.filter_chips()
            .into_iter()
            .map(|chip| chip.text.clone())
            .collect()
    }

    /// Turn a selector into a concrete chip.
    fn resolve_filter(&self, selector: FilterSelector) -> FeedResult<ChipCloudChip> {
        match selector {
            FilterSelector::Chip(chip) => Ok(chip),
            FilterSelector::Text(text) => self
                .filter_chips()
                .into_iter()
                .find(|chip| chip.text == text)
                .cloned()
                .ok_or_else(|| FeedError::FilterNotFound {
                    requested: text,
                    available_filters: self.filters(),
                }),
        }
    }

    /// Filter bar entries to carry into the next page.
    fn filter_seed(&self) -> MemoSeed {
        MemoSeed::carry(self.memo(), &FILTER_TAGS)
    }

    /// Fetch the page with the selected filter applied. An already selected
    /// chip is the current page.
    async fn get_filtered_feed(&self, selector: FilterSelector) -> FeedResult<ParsedResponse> {
        let chip = self.resolve_filter(selector)?;
        if chip.is_selected {
            return Ok(self.page().clone());
        }

        let endpoint = chip
            .endpoint
            .as_ref()
            .ok_or_else(|| FeedError::MissingEndpoint(format!("filter {}", chip.text)))?;

        let feed = self.feed();
        endpoint
            .call_parsed(feed.actions().as_ref(), CallOptions::default(), &feed.parser())
            .await
    }
}

/// A plain feed with filter chips.
#[derive(Debug, Clone)]
pub struct FilterableFeed {
    feed: Feed,
}

impl FilterableFeed {
    pub fn new(actions: Arc<dyn Actions>, data: impl Into<PageData>) -> FeedResult<Self> {
        Ok(Self {
            feed: Feed::new(actions, data)?,
        })
    }

    pub async fn apply_filter(
        &self,
        selector: impl Into<FilterSelector>,
    ) -> FeedResult<FilterableFeed> {
        let page = self.get_filtered_feed(selector.into()).await?;
        FilterableFeed::new(Arc::clone(self.feed.actions()), page)
    }

    /// Next page, keeping this page's filter bar.
    pub async fn get_continuation(&self) -> FeedResult<FilterableFeed> {
        let page = self.feed.get_continuation_data().await?;
        let seed = self.filter_seed();
        let feed = Feed::continued(Arc::clone(self.feed.actions()), page, Some(seed))?;
        Ok(Self { feed })
    }
}

impl From<Feed> for FilterableFeed {
    fn from(feed: Feed) -> Self {
        Self { feed }
    }
}

impl FeedPage for FilterableFeed {
    fn feed(&self) -> &Feed {
        &self.feed
    }
}

impl FilterApplicable for FilterableFeed {}
