//! Channel pages and the lists reached from them.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use crate::endpoint::{Actions, CallOptions};
use crate::error::{FeedError, FeedResult};
use crate::feed::{Feed, FeedPage, FilterApplicable, FilterSelector, TabSelectable};
use crate::parser::{PageData, ParsedResponse};
use crate::shape::{
    CarouselHeader, C4TabbedHeader, ChannelAboutFullMetadata, ChannelMetadata, ChipCloudChip,
    ContinuationCommand, ExpandableTab, FeedFilterChipBar, InteractiveTabbedHeader,
    MicroformatData, Shape, ShapeTag, SubscribeButton, Tab, TwoColumnBrowseResults,
};

const HEADER_TAGS: [ShapeTag; 3] = [
    ShapeTag::C4TabbedHeader,
    ShapeTag::CarouselHeader,
    ShapeTag::InteractiveTabbedHeader,
];

/// The header variants a channel page can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelHeader {
    C4Tabbed(C4TabbedHeader),
    Carousel(CarouselHeader),
    InteractiveTabbed(InteractiveTabbedHeader),
}

impl ChannelHeader {
    fn from_shape(shape: Shape) -> Option<Self> {
        match shape {
            Shape::C4TabbedHeader(h) => Some(Self::C4Tabbed(h)),
            Shape::CarouselHeader(h) => Some(Self::Carousel(h)),
            Shape::InteractiveTabbedHeader(h) => Some(Self::InteractiveTabbed(h)),
            _ => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::C4Tabbed(h) => h.title.as_deref(),
            Self::InteractiveTabbed(h) => h.title.as_deref(),
            Self::Carousel(_) => None,
        }
    }
}

/// Channel metadata merged with the page microformat. Microformat values
/// win where both are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChannelInfo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub external_id: Option<String>,
    pub url: Option<String>,
    pub vanity_channel_url: Option<String>,
    pub rss_url: Option<String>,
    pub keywords: Option<String>,
    pub is_family_safe: Option<bool>,
    pub avatar_url: Option<String>,
    pub available_countries: Vec<String>,
    pub url_canonical: Option<String>,
    pub thumbnail_url: Option<String>,
    pub tags: Vec<String>,
    pub noindex: Option<bool>,
    pub unlisted: Option<bool>,
}

impl ChannelInfo {
    fn merge(metadata: Option<ChannelMetadata>, microformat: Option<MicroformatData>) -> Self {
        let mut info = metadata
            .map(|m| ChannelInfo {
                title: m.title,
                description: m.description,
                external_id: m.external_id,
                url: m.url,
                vanity_channel_url: m.vanity_channel_url,
                rss_url: m.rss_url,
                keywords: m.keywords,
                is_family_safe: m.is_family_safe,
                avatar_url: m.avatar_url,
                available_countries: m.available_countries,
                ..ChannelInfo::default()
            })
            .unwrap_or_default();

        if let Some(micro) = microformat {
            info.title = micro.title.or(info.title);
            info.description = micro.description.or(info.description);
            info.is_family_safe = micro.family_safe.or(info.is_family_safe);
            info.url_canonical = micro.url_canonical;
            info.thumbnail_url = micro.thumbnail_url;
            info.tags = micro.tags;
            info.noindex = micro.noindex;
            info.unlisted = micro.unlisted;
        }
        info
    }
}

/// The selected tab of a channel page.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelTab {
    Tab(Tab),
    Expandable(ExpandableTab),
}

impl ChannelTab {
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Tab(tab) => tab.title.as_deref(),
            Self::Expandable(tab) => tab.title.as_deref(),
        }
    }
}

/// A channel page.
#[derive(Debug, Clone)]
pub struct Channel {
    feed: Feed,
    pub header: Option<ChannelHeader>,
    pub metadata: ChannelInfo,
    pub subscribe_button: Option<SubscribeButton>,
    pub current_tab: Option<ChannelTab>,
}

impl Channel {
    pub fn new(actions: Arc<dyn Actions>, data: impl Into<PageData>) -> FeedResult<Self> {
        Self::from_feed(Feed::new(actions, data)?)
    }

    pub fn from_feed(feed: Feed) -> FeedResult<Self> {
        let page = feed.page();

        let metadata = page.metadata.parse_as::<ChannelMetadata>();
        if metadata.is_none() && !page.contents.is_present() {
            return Err(FeedError::InvalidStructure(
                "channel page has neither metadata nor contents".to_string(),
            ));
        }

        let header = page
            .header
            .as_one_of(&HEADER_TAGS)
            .and_then(ChannelHeader::from_shape);
        let microformat = page.microformat.parse_as::<MicroformatData>();
        let subscribe_button = page.header_memo().first::<SubscribeButton>().cloned();

        let tabs = page
            .contents
            .parse_as::<TwoColumnBrowseResults>()
            .map(|results| results.tabs)
            .unwrap_or_else(|| page.contents.key("tabs"));
        let current_tab = tabs
            .items()
            .filter_by_shape(&[ShapeTag::Tab, ShapeTag::ExpandableTab])
            .get(&[("selected", json!(true))])
            .and_then(|shape| match shape {
                Shape::Tab(tab) => Some(ChannelTab::Tab(tab.clone())),
                Shape::ExpandableTab(tab) => Some(ChannelTab::Expandable(tab.clone())),
                _ => None,
            });

        Ok(Self {
            header,
            metadata: ChannelInfo::merge(metadata, microformat),
            subscribe_button,
            current_tab,
            feed,
        })
    }

    fn actions(&self) -> Arc<dyn Actions> {
        Arc::clone(self.feed.actions())
    }

    /// Chips of the page's first filter bar.
    fn filter_bar_chips(&self) -> Vec<ChipCloudChip> {
        self.memo()
            .first::<FeedFilterChipBar>()
            .map(FeedFilterChipBar::chips)
            .unwrap_or_default()
    }

    pub fn filters(&self) -> Vec<String> {
        self.filter_bar_chips()
            .into_iter()
            .map(|chip| chip.text)
            .collect()
    }

    /// Apply a chip of the filter bar, see [`Channel::filters`].
    pub async fn apply_filter(
        &self,
        selector: impl Into<FilterSelector>,
    ) -> FeedResult<FilteredChannelList> {
        let chip = match selector.into() {
            FilterSelector::Chip(chip) => chip,
            FilterSelector::Text(text) => {
                let chips = self.filter_bar_chips();
                let available_filters: Vec<String> = chips.iter().map(|c| c.text.clone()).collect();
                chips
                    .into_iter()
                    .find(|chip| chip.text == text)
                    .ok_or(FeedError::FilterNotFound {
                        requested: text,
                        available_filters,
                    })?
            }
        };

        let endpoint = chip
            .endpoint
            .ok_or_else(|| FeedError::MissingEndpoint(format!("filter {}", chip.text)))?;
        let page = endpoint
            .call_parsed(self.feed.actions().as_ref(), CallOptions::default(), &self.feed.parser())
            .await?;
        FilteredChannelList::new(self.actions(), page)
    }

    async fn open_tab(&self, url: &str) -> FeedResult<ParsedResponse> {
        let tab = self.get_tab_by_url(url)?;
        self.select_tab(tab).await
    }

    async fn channel_tab(&self, url: &str) -> FeedResult<Channel> {
        let page = self.open_tab(url).await?;
        Channel::new(self.actions(), page)
    }

    pub async fn get_home(&self) -> FeedResult<Channel> {
        self.channel_tab("featured").await
    }

    pub async fn get_videos(&self) -> FeedResult<Channel> {
        self.channel_tab("videos").await
    }

    pub async fn get_shorts(&self) -> FeedResult<Channel> {
        self.channel_tab("shorts").await
    }

    pub async fn get_live_streams(&self) -> FeedResult<Channel> {
        self.channel_tab("streams").await
    }

    pub async fn get_playlists(&self) -> FeedResult<Channel> {
        self.channel_tab("playlists").await
    }

    pub async fn get_community(&self) -> FeedResult<Channel> {
        self.channel_tab("community").await
    }

    pub async fn get_channels(&self) -> FeedResult<Channel> {
        self.channel_tab("channels").await
    }

    /// Full about metadata. The about page is not a channel page of its own.
    pub async fn get_about(&self) -> FeedResult<Option<ChannelAboutFullMetadata>> {
        let page = self.open_tab("about").await?;
        Ok(page.memo().first::<ChannelAboutFullMetadata>().cloned())
    }

    /// Search within the channel.
    pub async fn search(&self, query: &str) -> FeedResult<Channel> {
        let tab = self
            .memo()
            .first::<ExpandableTab>()
            .ok_or_else(|| FeedError::TabNotFound {
                requested: "search".to_string(),
                available: self.tab_urls(),
            })?;
        let endpoint = tab
            .endpoint
            .as_ref()
            .ok_or_else(|| FeedError::MissingEndpoint("search tab".to_string()))?;

        let page = endpoint
            .call_parsed(
                self.feed.actions().as_ref(),
                CallOptions::new().query(query),
                &self.feed.parser(),
            )
            .await?;
        Channel::new(self.actions(), page)
    }

    pub async fn get_continuation(&self) -> FeedResult<ChannelListContinuation> {
        let page = self.feed.get_continuation_data().await?;
        ChannelListContinuation::new(self.actions(), page)
    }
}

impl FeedPage for Channel {
    fn feed(&self) -> &Feed {
        &self.feed
    }
}

impl TabSelectable for Channel {}

/// A further page of a channel list.
#[derive(Debug, Clone)]
pub struct ChannelListContinuation {
    feed: Feed,
    pub contents: Option<ContinuationCommand>,
}

impl ChannelListContinuation {
    pub fn new(actions: Arc<dyn Actions>, data: impl Into<PageData>) -> FeedResult<Self> {
        let feed = Feed::continued(actions, data, None)?;
        let page = feed.page();
        let contents = page
            .on_response_received_actions
            .first()
            .or_else(|| page.on_response_received_endpoints.first())
            .and_then(ContinuationCommand::from_shape);
        Ok(Self { feed, contents })
    }

    pub async fn get_continuation(&self) -> FeedResult<ChannelListContinuation> {
        let page = self.feed.get_continuation_data().await?;
        ChannelListContinuation::new(Arc::clone(self.feed.actions()), page)
    }
}

impl FeedPage for ChannelListContinuation {
    fn feed(&self) -> &Feed {
        &self.feed
    }
}

/// A channel list with a filter applied.
#[derive(Debug, Clone)]
pub struct FilteredChannelList {
    feed: Feed,
    pub applied_filter: Option<ChipCloudChip>,
    pub contents: Option<ContinuationCommand>,
}

impl FilteredChannelList {
    pub fn new(actions: Arc<dyn Actions>, data: impl Into<PageData>) -> FeedResult<Self> {
        Ok(Self::from_feed(Feed::new(actions, data)?))
    }

    pub fn from_feed(feed: Feed) -> Self {
        let applied_filter = feed
            .memo()
            .get_where(ShapeTag::ChipCloudChip, &[("is_selected", json!(true))])
            .and_then(Shape::downcast::<ChipCloudChip>)
            .cloned();

        // With several received actions the first one re-renders the chip
        // bar; the list itself follows it.
        let actions = &feed.page().on_response_received_actions;
        let skip = usize::from(actions.len() > 1);
        let contents = actions
            .get(skip)
            .and_then(ContinuationCommand::from_shape);

        Self {
            feed,
            applied_filter,
            contents,
        }
    }

    pub async fn apply_filter(
        &self,
        selector: impl Into<FilterSelector>,
    ) -> FeedResult<FilteredChannelList> {
        let page = self.get_filtered_feed(selector.into()).await?;
        FilteredChannelList::new(Arc::clone(self.feed.actions()), page)
    }

    /// Next page of the list. The filter bar of this page is kept.
    pub async fn get_continuation(&self) -> FeedResult<FilteredChannelList> {
        let page = self.feed.get_continuation_data().await?;
        let seed = self.filter_seed();
        let feed = Feed::continued(Arc::clone(self.feed.actions()), page, Some(seed))?;
        Ok(Self::from_feed(feed))
    }
}

impl FeedPage for FilteredChannelList {
    fn feed(&self) -> &Feed {
        &self.feed
    }
}

impl FilterApplicable for FilteredChannelList {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    #[test]
    fn test_microformat_overrides_metadata() {
        let metadata = Node::new(json!({ "channelMetadataRenderer": {
            "title": "Rust",
            "description": "Systems language",
            "isFamilySafe": true
        } }))
        .parse_as::<ChannelMetadata>();
        let microformat = Node::new(json!({ "microformatDataRenderer": {
            "title": "The Rust Programming Language",
            "familySafe": false,
            "unlisted": false
        } }))
        .parse_as::<MicroformatData>();

        let info = ChannelInfo::merge(metadata, microformat);
        assert_eq!(info.title.as_deref(), Some("The Rust Programming Language"));
        assert_eq!(info.description.as_deref(), Some("Systems language"));
        assert_eq!(info.is_family_safe, Some(false));
        assert_eq!(info.unlisted, Some(false));
    }

    #[test]
    fn test_header_variants() {
        let node = Node::new(json!({ "carouselHeaderRenderer": { "contents": [] } }));
        let header = node
            .as_one_of(&HEADER_TAGS)
            .and_then(ChannelHeader::from_shape)
            .unwrap();
        assert!(matches!(header, ChannelHeader::Carousel(_)));
        assert_eq!(header.title(), None);
    }
}
