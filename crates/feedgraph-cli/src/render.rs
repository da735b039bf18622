//! Plain-text reports printed by the CLI commands.

use feedgraph::shape::ContinuationCommand;
use feedgraph::{Channel, ChannelHeader, FeedPage, ParsedResponse, Settings, TabSelectable};

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

/// Shape counts of a parsed response.
pub fn memo_summary(page: &ParsedResponse) -> String {
    let memo = page.memo();
    let mut lines = vec![format!("{} shapes", memo.len())];
    for (tag, count) in memo.summary() {
        lines.push(format!("  {:<32} {count}", tag.name()));
    }
    lines.push(format!(
        "received actions: {}, received endpoints: {}",
        page.on_response_received_actions.len(),
        page.on_response_received_endpoints.len()
    ));
    lines.join("\n")
}

pub fn channel_report(channel: &Channel) -> String {
    let title = channel
        .metadata
        .title
        .as_deref()
        .or_else(|| channel.header.as_ref().and_then(ChannelHeader::title));

    let mut lines = vec![format!("Channel: {}", or_dash(title))];
    if let Some(ChannelHeader::C4Tabbed(header)) = &channel.header {
        lines.push(format!("Handle: {}", or_dash(header.handle.as_deref())));
        lines.push(format!("Subscribers: {}", or_dash(header.subscribers.as_deref())));
    }
    if let Some(button) = &channel.subscribe_button {
        lines.push(format!("Subscribed: {}", if button.subscribed { "yes" } else { "no" }));
    }
    lines.push(format!("Tabs: {}", channel.tabs().join(", ")));
    lines.push(format!(
        "Current tab: {}",
        or_dash(channel.current_tab.as_ref().and_then(|tab| tab.title()))
    ));

    let filters = channel.filters();
    if !filters.is_empty() {
        lines.push(format!("Filters: {}", filters.join(", ")));
    }
    if channel.feed().has_continuation() {
        lines.push("More items available".to_string());
    }
    lines.join("\n")
}

/// One line per list page: how many entries it carried.
pub fn list_report(label: &str, contents: Option<&ContinuationCommand>) -> String {
    match contents {
        Some(command) => format!("{label}: {} items", command.items().len()),
        None => format!("{label}: no list contents"),
    }
}

pub fn settings_report(settings: &Settings) -> String {
    let mut lines = Vec::new();
    if let Some(intro) = &settings.introduction {
        lines.push(format!("Settings: {}", or_dash(intro.header_text.as_deref())));
    }
    if let Ok(items) = settings.sidebar_items() {
        lines.push(format!("Sidebar: {}", items.join(", ")));
    }
    for section in &settings.sections {
        lines.push(format!("[{}]", or_dash(section.title.as_deref())));
    }
    for name in settings.setting_options() {
        let state = match settings.get_setting_option(&name) {
            Ok(switch) if switch.enabled => "on",
            Ok(_) => "off",
            Err(_) => "-",
        };
        lines.push(format!("  {name}: {state}"));
    }
    lines.join("\n")
}
