//! Concrete page types built on the feed capabilities.

mod channel;
mod settings;

pub use channel::{
    Channel, ChannelHeader, ChannelInfo, ChannelListContinuation, ChannelTab, FilteredChannelList,
};
pub use settings::{Settings, SettingsSection, SidebarSelector};
