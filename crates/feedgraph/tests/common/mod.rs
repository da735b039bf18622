//! Shared fixtures and a scripted transport for the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use feedgraph::{Actions, FeedError, FeedResult};

// ─────────────────────── scripted transport ───────────────────────

/// Answers calls with queued responses and records what was asked.
#[derive(Default)]
pub struct ScriptedActions {
    responses: Mutex<VecDeque<Value>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedActions {
    pub fn new(responses: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Actions for ScriptedActions {
    async fn execute(&self, target: &str, payload: Value) -> FeedResult<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((target.to_string(), payload));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| FeedError::Transport(format!("no scripted response for {target}")))
    }
}

// ─────────────────────── fixtures ───────────────────────

pub fn continuation_command(token: &str) -> Value {
    json!({
        "continuationCommand": { "token": token, "request": "CONTINUATION_REQUEST_TYPE_BROWSE" }
    })
}

pub fn continuation_item(token: &str) -> Value {
    json!({
        "continuationItemRenderer": {
            "trigger": "CONTINUATION_TRIGGER_ON_ITEM_SHOWN",
            "continuationEndpoint": continuation_command(token)
        }
    })
}

pub fn video(id: &str) -> Value {
    json!({ "richItemRenderer": { "content": { "videoRenderer": { "videoId": id } } } })
}

pub fn chip(text: &str, selected: bool) -> Value {
    json!({
        "chipCloudChipRenderer": {
            "text": { "simpleText": text },
            "isSelected": selected,
            "navigationEndpoint": continuation_command(&format!("filter-{}", text.to_lowercase()))
        }
    })
}

pub fn chip_bar(texts: &[&str], selected: &str) -> Value {
    let chips: Vec<Value> = texts.iter().map(|t| chip(t, *t == selected)).collect();
    json!({ "feedFilterChipBarRenderer": { "contents": chips } })
}

pub fn tab(title: &str, suffix: &str, selected: bool, content: Value) -> Value {
    json!({
        "tabRenderer": {
            "title": title,
            "selected": selected,
            "endpoint": {
                "commandMetadata": { "webCommandMetadata": {
                    "url": format!("/@rustlang/{suffix}"),
                    "apiUrl": "/youtubei/v1/browse"
                } },
                "browseEndpoint": { "browseId": "UC123", "params": suffix, "canonicalBaseUrl": "/@rustlang" }
            },
            "content": content
        }
    })
}

pub fn search_tab() -> Value {
    json!({
        "expandableTabRenderer": {
            "title": "Search",
            "selected": false,
            "endpoint": {
                "commandMetadata": { "webCommandMetadata": { "url": "/@rustlang/search" } },
                "browseEndpoint": { "browseId": "UC123", "params": "search-params" }
            }
        }
    })
}

/// Grid of a videos tab: filter bar, two videos and a trailing continuation.
pub fn videos_grid() -> Value {
    json!({
        "richGridRenderer": {
            "header": chip_bar(&["All", "Videos", "Shorts"], "All"),
            "contents": [video("v1"), video("v2"), continuation_item("videos-page-2")]
        }
    })
}

const TABS: &[(&str, &str)] = &[
    ("Home", "featured"),
    ("Videos", "videos"),
    ("Shorts", "shorts"),
    ("Live", "streams"),
    ("About", "about"),
];

/// A channel page with the tab at `selected` (a URL suffix) selected.
pub fn channel_page(selected: &str) -> Value {
    let mut tabs: Vec<Value> = TABS
        .iter()
        .map(|(title, suffix)| {
            let content = if *suffix == selected && *suffix == "videos" {
                videos_grid()
            } else {
                json!({})
            };
            tab(title, suffix, *suffix == selected, content)
        })
        .collect();
    tabs.push(search_tab());

    json!({
        "header": { "c4TabbedHeaderRenderer": {
            "channelId": "UC123",
            "title": "Rust",
            "channelHandleText": { "runs": [{ "text": "@rustlang" }] },
            "subscriberCountText": { "simpleText": "150K subscribers" },
            "subscribeButton": { "subscribeButtonRenderer": {
                "subscribed": false,
                "enabled": true,
                "channelId": "UC123",
                "buttonText": { "runs": [{ "text": "Subscribe" }] }
            } }
        } },
        "contents": { "twoColumnBrowseResultsRenderer": { "tabs": tabs } },
        "metadata": { "channelMetadataRenderer": {
            "title": "Rust",
            "description": "The Rust programming language",
            "externalId": "UC123",
            "channelUrl": "https://www.youtube.com/channel/UC123",
            "isFamilySafe": true,
            "availableCountryCodes": ["US", "DE"]
        } },
        "microformat": { "microformatDataRenderer": {
            "urlCanonical": "https://www.youtube.com/channel/UC123",
            "title": "Rust Language",
            "tags": ["rust", "programming"],
            "noindex": false
        } }
    })
}

/// Response of a filter chip: the chip bar is re-rendered first, the list
/// follows.
pub fn filtered_list(selected: &str, next: Option<&str>) -> Value {
    let mut items = vec![video("f1"), video("f2")];
    if let Some(token) = next {
        items.push(continuation_item(token));
    }
    json!({
        "onResponseReceivedActions": [
            { "reloadContinuationItemsCommand": {
                "targetId": "browse-feedUC123videos",
                "slot": "RELOAD_CONTINUATION_SLOT_HEADER",
                "continuationItems": [chip_bar(&["All", "Videos", "Shorts"], selected)]
            } },
            { "reloadContinuationItemsCommand": {
                "targetId": "browse-feedUC123videos",
                "slot": "RELOAD_CONTINUATION_SLOT_BODY",
                "continuationItems": items
            } }
        ]
    })
}

/// A plain appended page of list items.
pub fn list_continuation(next: Option<&str>) -> Value {
    let mut items = vec![video("c1"), video("c2")];
    if let Some(token) = next {
        items.push(continuation_item(token));
    }
    json!({
        "onResponseReceivedActions": [
            { "appendContinuationItemsAction": {
                "targetId": "browse-feedUC123videos",
                "continuationItems": items
            } }
        ]
    })
}

/// An appended page delivered under `onResponseReceivedEndpoints`.
pub fn endpoints_continuation(next: Option<&str>) -> Value {
    let mut items = vec![video("e1"), video("e2")];
    if let Some(token) = next {
        items.push(continuation_item(token));
    }
    json!({
        "onResponseReceivedEndpoints": [
            { "appendContinuationItemsAction": {
                "targetId": "browse-feedUC123videos",
                "continuationItems": items
            } }
        ]
    })
}

pub fn about_page() -> Value {
    json!({
        "contents": { "twoColumnBrowseResultsRenderer": { "tabs": [
            { "tabRenderer": { "title": "About", "selected": true, "content": {
                "sectionListRenderer": { "contents": [
                    { "itemSectionRenderer": { "contents": [
                        { "channelAboutFullMetadataRenderer": {
                            "channelId": "UC123",
                            "title": { "simpleText": "Rust" },
                            "country": { "simpleText": "United States" },
                            "viewCountText": { "simpleText": "12,345,678 views" },
                            "joinedDateText": { "runs": [{ "text": "Joined " }, { "text": "Jan 1, 2015" }] }
                        } }
                    ] } }
                ] }
            } } }
        ] } }
    })
}

// ─────────────────────── settings ───────────────────────

pub fn switch(title: &str, enabled: bool) -> Value {
    json!({
        "settingsSwitchRenderer": {
            "title": { "runs": [{ "text": title }] },
            "enabled": enabled,
            "enableServiceEndpoint": { "setSettingEndpoint": { "settingItemId": "407", "boolValue": true } },
            "disableServiceEndpoint": { "setSettingEndpoint": { "settingItemId": "407", "boolValue": false } }
        }
    })
}

pub fn sidebar_link(title: &str, url: &str) -> Value {
    json!({
        "compactLinkRenderer": {
            "title": { "simpleText": title },
            "navigationEndpoint": {
                "commandMetadata": { "webCommandMetadata": { "url": url, "apiUrl": "/youtubei/v1/browse" } },
                "browseEndpoint": { "browseId": format!("SP{}", url.trim_start_matches('/').replace('/', "_")) }
            }
        }
    })
}

/// A settings page titled `title` with one section of switches.
pub fn settings_page(title: &str, switches: &[(&str, bool)]) -> Value {
    let options: Vec<Value> = switches.iter().map(|(t, on)| switch(t, *on)).collect();
    json!({
        "sidebar": { "settingsSidebarRenderer": {
            "title": { "simpleText": "Settings" },
            "items": [
                sidebar_link("Account", "/account"),
                sidebar_link("Notifications", "/account_notifications"),
                sidebar_link("Privacy", "/account_privacy")
            ]
        } },
        "contents": { "twoColumnBrowseResultsRenderer": { "tabs": [
            { "tabRenderer": { "selected": true, "content": { "sectionListRenderer": { "contents": [
                { "itemSectionRenderer": { "contents": [
                    { "pageIntroductionRenderer": {
                        "headerText": { "simpleText": title },
                        "bodyText": { "simpleText": format!("Manage {title}") }
                    } }
                ] } },
                { "itemSectionRenderer": {
                    "header": { "itemSectionHeaderRenderer": { "title": { "simpleText": "Your preferences" } } },
                    "contents": [
                        { "settingsOptionsRenderer": {
                            "title": { "simpleText": "General" },
                            "options": options
                        } }
                    ]
                } }
            ] } } } }
        ] } }
    })
}
