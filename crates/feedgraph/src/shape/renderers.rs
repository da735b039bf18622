//! Typed projections of the recognised renderer payloads.
//!
//! Scalars are read eagerly; nested regions stay as [`Node`]s so callers can
//! keep traversing without the whole subtree being projected up front. Node
//! fields are skipped when computing visible fields.

use serde::Serialize;

use crate::endpoint::Endpoint;
use crate::error::{FeedError, FeedResult};
use crate::node::{Node, NodeList};
use crate::shape::{Shape, ShapeTag};

fn thumbnail_url(node: &Node) -> Option<String> {
    node.key("thumbnails").at(0).key("url").string()
}

// ─────────────────────── channel header & metadata ───────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct C4TabbedHeader {
    pub channel_id: Option<String>,
    pub title: Option<String>,
    pub handle: Option<String>,
    pub subscribers: Option<String>,
    pub videos_count: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(skip)]
    pub subscribe_button: Node,
}

impl C4TabbedHeader {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            channel_id: payload.key("channelId").string(),
            title: payload.key("title").text(),
            handle: payload.key("channelHandleText").text(),
            subscribers: payload.key("subscriberCountText").text(),
            videos_count: payload.key("videosCountText").text(),
            avatar_url: thumbnail_url(&payload.key("avatar")),
            subscribe_button: payload.key("subscribeButton"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselHeader {
    #[serde(skip)]
    pub contents: NodeList,
}

impl CarouselHeader {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            contents: payload.key("contents").items(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractiveTabbedHeader {
    pub title: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<String>,
    #[serde(skip)]
    pub buttons: NodeList,
}

impl InteractiveTabbedHeader {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            title: payload.key("title").text(),
            description: payload.key("description").text(),
            metadata: payload.key("metadata").text(),
            buttons: payload.key("buttons").items(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelMetadata {
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
}

impl ChannelMetadata {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            title: payload.key("title").string(),
            description: payload.key("description").string(),
            external_id: payload.key("externalId").string(),
            url: payload.key("channelUrl").string(),
            vanity_channel_url: payload.key("vanityChannelUrl").string(),
            rss_url: payload.key("rssUrl").string(),
            keywords: payload.key("keywords").string(),
            is_family_safe: payload.key("isFamilySafe").bool(),
            avatar_url: thumbnail_url(&payload.key("avatar")),
            available_countries: payload.key("availableCountryCodes").strings(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MicroformatData {
    pub url_canonical: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub tags: Vec<String>,
    pub family_safe: Option<bool>,
    pub noindex: Option<bool>,
    pub unlisted: Option<bool>,
}

impl MicroformatData {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            url_canonical: payload.key("urlCanonical").string(),
            title: payload.key("title").string(),
            description: payload.key("description").string(),
            thumbnail_url: thumbnail_url(&payload.key("thumbnail")),
            tags: payload.key("tags").strings(),
            family_safe: payload.key("familySafe").bool(),
            noindex: payload.key("noindex").bool(),
            unlisted: payload.key("unlisted").bool(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscribeButton {
    pub subscribed: bool,
    pub enabled: bool,
    pub channel_id: Option<String>,
    pub button_text: Option<String>,
}

impl SubscribeButton {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            subscribed: payload.key("subscribed").bool().unwrap_or(false),
            enabled: payload.key("enabled").bool().unwrap_or(true),
            channel_id: payload.key("channelId").string(),
            button_text: payload.key("buttonText").text(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelAboutFullMetadata {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
    pub views: Option<String>,
    pub joined_date: Option<String>,
    pub canonical_channel_url: Option<String>,
    #[serde(skip)]
    pub primary_links: NodeList,
}

impl ChannelAboutFullMetadata {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            id: payload.key("channelId").string(),
            name: payload.key("title").text(),
            description: payload.key("description").text(),
            country: payload.key("country").text(),
            views: payload.key("viewCountText").text(),
            joined_date: payload.key("joinedDateText").text(),
            canonical_channel_url: payload.key("canonicalChannelUrl").string(),
            primary_links: payload.key("primaryLinks").items(),
        })
    }
}

// ─────────────────────── layout ───────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwoColumnBrowseResults {
    #[serde(skip)]
    pub tabs: Node,
    #[serde(skip)]
    pub secondary_contents: Node,
}

impl TwoColumnBrowseResults {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            tabs: payload.key("tabs"),
            secondary_contents: payload.key("secondaryContents"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tab {
    pub title: Option<String>,
    pub selected: bool,
    pub endpoint: Option<Endpoint>,
    #[serde(skip)]
    pub content: Node,
}

impl Tab {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            title: payload.key("title").text(),
            selected: payload.key("selected").bool().unwrap_or(false),
            endpoint: payload.key("endpoint").endpoint(),
            content: payload.key("content"),
        })
    }

    /// Last path segment of the tab's page URL (`videos`, `shorts`, ...).
    pub fn url_suffix(&self) -> Option<&str> {
        self.endpoint.as_ref().and_then(Endpoint::url_suffix)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpandableTab {
    pub title: Option<String>,
    pub selected: bool,
    pub endpoint: Option<Endpoint>,
    #[serde(skip)]
    pub content: Node,
}

impl ExpandableTab {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            title: payload.key("title").text(),
            selected: payload.key("selected").bool().unwrap_or(false),
            endpoint: payload.key("endpoint").endpoint(),
            content: payload.key("content"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionList {
    pub target_id: Option<String>,
    #[serde(skip)]
    pub contents: Node,
}

impl SectionList {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            target_id: payload.key("targetId").string(),
            contents: payload.key("contents"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSection {
    pub target_id: Option<String>,
    #[serde(skip)]
    pub header: Node,
    #[serde(skip)]
    pub contents: Node,
}

impl ItemSection {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            target_id: payload.key("targetId").string(),
            header: payload.key("header"),
            contents: payload.key("contents"),
        })
    }

    pub fn title(&self) -> Option<String> {
        self.header
            .parse_as::<ItemSectionHeader>()
            .and_then(|h| h.title)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSectionHeader {
    pub title: Option<String>,
}

impl ItemSectionHeader {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            title: payload.key("title").text(),
        })
    }
}

// ─────────────────────── filters & continuations ───────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedFilterChipBar {
    #[serde(skip)]
    pub contents: NodeList,
}

impl FeedFilterChipBar {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            contents: payload.key("contents").items(),
        })
    }

    pub fn chips(&self) -> Vec<ChipCloudChip> {
        self.contents.as_all::<ChipCloudChip>()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChipCloudChip {
    pub text: String,
    pub is_selected: bool,
    pub endpoint: Option<Endpoint>,
}

impl ChipCloudChip {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        let text = payload
            .key("text")
            .text()
            .ok_or_else(|| FeedError::type_mismatch("chip text", payload.key("text").kind()))?;
        Ok(Self {
            text,
            is_selected: payload.key("isSelected").bool().unwrap_or(false),
            endpoint: payload.key("navigationEndpoint").endpoint(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppendContinuationItemsAction {
    pub target_id: Option<String>,
    #[serde(skip)]
    pub continuation_items: NodeList,
}

impl AppendContinuationItemsAction {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            target_id: payload.key("targetId").string(),
            continuation_items: payload.key("continuationItems").items(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReloadContinuationItemsCommand {
    pub target_id: Option<String>,
    pub slot: Option<String>,
    #[serde(skip)]
    pub continuation_items: NodeList,
}

impl ReloadContinuationItemsCommand {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            target_id: payload.key("targetId").string(),
            slot: payload.key("slot").string(),
            continuation_items: payload.key("continuationItems").items(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuationItem {
    pub trigger: Option<String>,
    pub endpoint: Option<Endpoint>,
}

impl ContinuationItem {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            trigger: payload.key("trigger").string(),
            endpoint: payload.key("continuationEndpoint").endpoint(),
        })
    }
}

/// A continuation payload: appended items or a reload of the list.
#[derive(Debug, Clone, PartialEq)]
pub enum ContinuationCommand {
    Append(AppendContinuationItemsAction),
    Reload(ReloadContinuationItemsCommand),
}

impl ContinuationCommand {
    pub const TAGS: [ShapeTag; 2] = [
        ShapeTag::AppendContinuationItemsAction,
        ShapeTag::ReloadContinuationItemsCommand,
    ];

    pub fn from_shape(shape: &Shape) -> Option<Self> {
        match shape {
            Shape::AppendContinuationItemsAction(a) => Some(Self::Append(a.clone())),
            Shape::ReloadContinuationItemsCommand(r) => Some(Self::Reload(r.clone())),
            _ => None,
        }
    }

    pub fn target_id(&self) -> Option<&str> {
        match self {
            Self::Append(a) => a.target_id.as_deref(),
            Self::Reload(r) => r.target_id.as_deref(),
        }
    }

    pub fn items(&self) -> &NodeList {
        match self {
            Self::Append(a) => &a.continuation_items,
            Self::Reload(r) => &r.continuation_items,
        }
    }

    /// The trailing continuation item that can fetch the next page.
    pub fn continuation(&self) -> Option<ContinuationItem> {
        self.items()
            .as_all::<ContinuationItem>()
            .into_iter()
            .rev()
            .find(|item| item.endpoint.is_some())
    }
}

// ─────────────────────── settings ───────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageIntroduction {
    pub header_text: Option<String>,
    pub body_text: Option<String>,
    pub page_title: Option<String>,
}

impl PageIntroduction {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            header_text: payload.key("headerText").text(),
            body_text: payload.key("bodyText").text(),
            page_title: payload.key("pageTitle").text(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsOptions {
    pub title: Option<String>,
    pub text: Option<String>,
    #[serde(skip)]
    pub options: Node,
}

impl SettingsOptions {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            title: payload.key("title").text(),
            text: payload.key("text").text(),
            options: payload.key("options"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsSwitch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub enabled: bool,
    pub disabled: bool,
    pub enable_endpoint: Option<Endpoint>,
    pub disable_endpoint: Option<Endpoint>,
}

impl SettingsSwitch {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            title: payload.key("title").text(),
            subtitle: payload.key("subtitle").text(),
            enabled: payload.key("enabled").bool().unwrap_or(false),
            disabled: payload.key("disabled").bool().unwrap_or(false),
            enable_endpoint: payload.key("enableServiceEndpoint").endpoint(),
            disable_endpoint: payload.key("disableServiceEndpoint").endpoint(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsSidebar {
    pub title: Option<String>,
    #[serde(skip)]
    pub items: NodeList,
}

impl SettingsSidebar {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            title: payload.key("title").text(),
            items: payload.key("items").items(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompactLink {
    pub title: Option<String>,
    pub style: Option<String>,
    pub endpoint: Option<Endpoint>,
}

impl CompactLink {
    pub(crate) fn build(payload: &Node) -> FeedResult<Self> {
        Ok(Self {
            title: payload.key("title").text(),
            style: payload.key("style").string(),
            endpoint: payload.key("navigationEndpoint").endpoint(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_continuation_command_takes_trailing_item() {
        let node = Node::new(json!({
            "appendContinuationItemsAction": {
                "targetId": "browse-feed",
                "continuationItems": [
                    { "richItemRenderer": {} },
                    { "continuationItemRenderer": {
                        "trigger": "CONTINUATION_TRIGGER_ON_ITEM_SHOWN",
                        "continuationEndpoint": {
                            "continuationCommand": { "token": "next-1", "request": "CONTINUATION_REQUEST_TYPE_BROWSE" }
                        }
                    } }
                ]
            }
        }));
        let shape = node.as_one_of(&ContinuationCommand::TAGS).unwrap();
        let command = ContinuationCommand::from_shape(&shape).unwrap();
        assert_eq!(command.target_id(), Some("browse-feed"));
        assert_eq!(command.items().len(), 2);

        let item = command.continuation().unwrap();
        let endpoint = item.endpoint.unwrap();
        assert_eq!(endpoint.target, "browse");
        assert_eq!(endpoint.payload.get("continuation"), Some(&json!("next-1")));
    }

    #[test]
    fn test_chip_without_text_is_not_a_chip() {
        let node = Node::new(json!({ "chipCloudChipRenderer": { "isSelected": true } }));
        assert!(node.parse_as::<ChipCloudChip>().is_none());
    }

    #[test]
    fn test_item_section_title_from_header() {
        let node = Node::new(json!({
            "itemSectionRenderer": {
                "header": { "itemSectionHeaderRenderer": { "title": { "runs": [{ "text": "Privacy" }] } } },
                "contents": []
            }
        }));
        let section = node.parse_as::<ItemSection>().unwrap();
        assert_eq!(section.title().as_deref(), Some("Privacy"));
    }
}
