//! The account settings page.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::endpoint::{Actions, CallOptions};
use crate::error::{FeedError, FeedResult};
use crate::node::{Node, NodeList};
use crate::parser::{ParsedResponse, Parser};
use crate::shape::{
    CompactLink, ItemSection, PageIntroduction, SectionList, SettingsOptions, SettingsSidebar,
    SettingsSwitch, Tab, TwoColumnBrowseResults,
};

/// One titled block of settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSection {
    pub title: Option<String>,
    pub contents: NodeList,
}

/// Which sidebar entry to open.
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarSelector {
    Title(String),
    Link(CompactLink),
}

impl From<&str> for SidebarSelector {
    fn from(title: &str) -> Self {
        SidebarSelector::Title(title.to_string())
    }
}

impl From<String> for SidebarSelector {
    fn from(title: String) -> Self {
        SidebarSelector::Title(title)
    }
}

impl From<CompactLink> for SidebarSelector {
    fn from(link: CompactLink) -> Self {
        SidebarSelector::Link(link)
    }
}

/// A settings page: sidebar navigation plus sections of options.
#[derive(Clone)]
pub struct Settings {
    actions: Arc<dyn Actions>,
    page: ParsedResponse,
    pub sidebar: Option<SettingsSidebar>,
    pub introduction: Option<PageIntroduction>,
    pub sections: Vec<SettingsSection>,
}

impl Settings {
    /// Build from a raw settings response. The response must have a selected
    /// tab in its two-column layout.
    pub fn new(actions: Arc<dyn Actions>, raw: Value) -> FeedResult<Self> {
        let page = Parser::parse_response(raw)?;
        let sidebar = page.sidebar.parse_as::<SettingsSidebar>();

        let tabs = page
            .contents
            .parse_as::<TwoColumnBrowseResults>()
            .map(|results| results.tabs.items().as_all::<Tab>())
            .unwrap_or_default();
        let tab = tabs.iter().find(|tab| tab.selected).ok_or_else(|| {
            FeedError::TabNotFound {
                requested: "selected".to_string(),
                available: tabs.iter().filter_map(|tab| tab.title.clone()).collect(),
            }
        })?;

        let mut item_sections = tab
            .content
            .parse_as::<SectionList>()
            .map(|list| list.contents.items().as_all::<ItemSection>())
            .unwrap_or_default()
            .into_iter();

        // The leading section holds the page introduction, not settings.
        let introduction = item_sections
            .next()
            .and_then(|section| section.contents.items().first_of_type::<PageIntroduction>());

        let sections: Vec<SettingsSection> = item_sections
            .map(|section| SettingsSection {
                title: section.title(),
                contents: section.contents.items(),
            })
            .collect();

        tracing::debug!(
            "Settings page: sidebar={}, {} sections",
            sidebar.is_some(),
            sections.len()
        );

        Ok(Self {
            actions,
            page,
            sidebar,
            introduction,
            sections,
        })
    }

    pub fn page(&self) -> &ParsedResponse {
        &self.page
    }

    fn require_sidebar(&self) -> FeedResult<&SettingsSidebar> {
        self.sidebar.as_ref().ok_or(FeedError::SidebarUnavailable)
    }

    fn sidebar_links(&self) -> FeedResult<Vec<CompactLink>> {
        Ok(self.require_sidebar()?.items.as_all::<CompactLink>())
    }

    /// Titles of the sidebar entries.
    pub fn sidebar_items(&self) -> FeedResult<Vec<String>> {
        Ok(self
            .sidebar_links()?
            .into_iter()
            .filter_map(|link| link.title)
            .collect())
    }

    /// Open a sidebar entry and build the settings page behind it.
    pub async fn select_sidebar_item(
        &self,
        selector: impl Into<SidebarSelector>,
    ) -> FeedResult<Settings> {
        let links = self.sidebar_links()?;
        let link = match selector.into() {
            SidebarSelector::Link(link) => link,
            SidebarSelector::Title(title) => {
                let available_items: Vec<String> =
                    links.iter().filter_map(|link| link.title.clone()).collect();
                links
                    .into_iter()
                    .find(|link| link.title.as_deref() == Some(title.as_str()))
                    .ok_or(FeedError::SidebarItemNotFound {
                        requested: title,
                        available_items,
                    })?
            }
        };

        let endpoint = link.endpoint.ok_or_else(|| {
            FeedError::MissingEndpoint(format!(
                "sidebar item {}",
                link.title.as_deref().unwrap_or("<untitled>")
            ))
        })?;
        let raw = endpoint
            .call(self.actions.as_ref(), CallOptions::default())
            .await?;
        Settings::new(Arc::clone(&self.actions), raw)
    }

    /// Every option node across all sections, in page order.
    fn option_nodes(&self) -> Vec<Node> {
        self.sections
            .iter()
            .flat_map(|section| section.contents.iter())
            .filter_map(|content| content.parse_as::<SettingsOptions>())
            .flat_map(|options| options.options.items())
            .collect()
    }

    /// The switch titled `name`.
    pub fn get_setting_option(&self, name: &str) -> FeedResult<SettingsSwitch> {
        self.option_nodes()
            .iter()
            .filter_map(Node::parse_as::<SettingsSwitch>)
            .find(|switch| switch.title.as_deref() == Some(name))
            .ok_or_else(|| FeedError::OptionNotFound {
                requested: name.to_string(),
                available_options: self.setting_options(),
            })
    }

    /// Titles of every option on the page.
    pub fn setting_options(&self) -> Vec<String> {
        self.option_nodes().iter().filter_map(option_title).collect()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("sidebar", &self.sidebar)
            .field("introduction", &self.introduction)
            .field("sections", &self.sections.len())
            .finish()
    }
}

fn option_title(option: &Node) -> Option<String> {
    if let Some(switch) = option.parse_as::<SettingsSwitch>() {
        return switch.title;
    }
    option
        .children()
        .first()
        .and_then(|payload| payload.key("title").text())
}
