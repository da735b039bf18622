//! The feed continuation protocol and its capabilities.
//!
//! A [`Feed`] owns one parsed page and the actions handle needed to follow
//! the endpoints inside it. Feeds are values: fetching a continuation,
//! selecting a tab or applying a filter always builds a new one.

mod filterable;
mod tabbed;

use std::fmt;
use std::sync::Arc;

pub use filterable::{FilterApplicable, FilterSelector, FilterableFeed};
pub use tabbed::{TabSelectable, TabbedFeed};

use crate::endpoint::{Actions, CallOptions};
use crate::error::{FeedError, FeedResult};
use crate::memo::{Memo, MemoSeed};
use crate::parser::{PageData, ParsedResponse, Parser};
use crate::shape::{ContinuationCommand, ContinuationItem};

/// How a feed came to be. Behaviour is identical either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOrigin {
    /// Built from a top-level response.
    Fresh,
    /// Built from a continuation response.
    Continued,
}

/// A parsed page plus the handle to follow its endpoints.
#[derive(Clone)]
pub struct Feed {
    actions: Arc<dyn Actions>,
    page: ParsedResponse,
    origin: FeedOrigin,
}

impl Feed {
    /// Build a fresh feed. Raw data is parsed; parsed data is used as-is.
    pub fn new(actions: Arc<dyn Actions>, data: impl Into<PageData>) -> FeedResult<Self> {
        let page = data.into().resolve(&Parser::new())?;
        Ok(Self {
            actions,
            page,
            origin: FeedOrigin::Fresh,
        })
    }

    /// Build a feed from a continuation response, applying `seed` to its
    /// memo before the feed exists. A seed without entries leaves the
    /// response's own shapes in place.
    pub fn continued(
        actions: Arc<dyn Actions>,
        data: impl Into<PageData>,
        seed: Option<MemoSeed>,
    ) -> FeedResult<Self> {
        let mut page = data.into().resolve(&Parser::new())?;
        if let Some(seed) = seed.filter(|seed| !seed.is_empty()) {
            page = page.with_seed(seed);
        }
        Ok(Self {
            actions,
            page,
            origin: FeedOrigin::Continued,
        })
    }

    pub fn page(&self) -> &ParsedResponse {
        &self.page
    }

    pub fn memo(&self) -> &Memo {
        self.page.memo()
    }

    pub fn actions(&self) -> &Arc<dyn Actions> {
        &self.actions
    }

    pub fn origin(&self) -> FeedOrigin {
        self.origin
    }

    /// A parser sharing this page's shape catalog.
    pub fn parser(&self) -> Parser {
        Parser::with_catalog(Arc::clone(self.page.catalog()))
    }

    /// The continuation item that fetches the next page.
    ///
    /// Received actions and endpoints are searched first, latest action
    /// first. Otherwise the first continuation item in the body is used;
    /// items that belong to the header are never page continuations.
    pub fn continuation(&self) -> Option<ContinuationItem> {
        let received = self
            .page
            .on_response_received_actions
            .iter()
            .chain(self.page.on_response_received_endpoints.iter())
            .filter_map(ContinuationCommand::from_shape)
            .collect::<Vec<_>>();

        if let Some(item) = received.iter().rev().find_map(ContinuationCommand::continuation) {
            return Some(item);
        }

        let header_items = self.page.header_memo().of_type::<ContinuationItem>();
        self.memo()
            .of_type::<ContinuationItem>()
            .into_iter()
            .filter(|item| item.endpoint.is_some())
            .find(|item| !header_items.contains(item))
            .cloned()
    }

    pub fn has_continuation(&self) -> bool {
        self.continuation().is_some()
    }

    /// Fetch and parse the next page.
    ///
    /// Fails with [`FeedError::NoContinuation`] at the end of the feed.
    pub async fn get_continuation_data(&self) -> FeedResult<ParsedResponse> {
        let item = self.continuation().ok_or(FeedError::NoContinuation)?;
        let endpoint = item
            .endpoint
            .ok_or_else(|| FeedError::MissingEndpoint("continuation item".to_string()))?;

        endpoint
            .call_parsed(self.actions.as_ref(), CallOptions::default(), &self.parser())
            .await
    }

    /// Next page as a plain feed.
    pub async fn get_continuation(&self) -> FeedResult<Feed> {
        let page = self.get_continuation_data().await?;
        Feed::continued(Arc::clone(&self.actions), page, None)
    }
}

impl fmt::Debug for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feed")
            .field("origin", &self.origin)
            .field("memo", &self.page.memo().summary())
            .finish()
    }
}

/// Access to the base feed behind a concrete page type.
pub trait FeedPage {
    fn feed(&self) -> &Feed;

    fn page(&self) -> &ParsedResponse {
        self.feed().page()
    }

    fn memo(&self) -> &Memo {
        self.feed().memo()
    }
}

impl FeedPage for Feed {
    fn feed(&self) -> &Feed {
        self
    }
}
