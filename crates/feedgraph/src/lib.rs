//! feedgraph: typed, navigable object graph and continuation protocol for
//! InnerTube-style browse responses.

pub mod endpoint;
pub mod error;
pub mod feed;
pub mod memo;
pub mod node;
pub mod pages;
pub mod parser;
pub mod shape;

pub use endpoint::{Actions, CallOptions, Endpoint};
pub use error::{FeedError, FeedResult};
pub use feed::{
    Feed, FeedOrigin, FeedPage, FilterApplicable, FilterSelector, FilterableFeed, TabSelectable,
    TabbedFeed,
};
pub use memo::{Memo, MemoSeed};
pub use node::{Node, NodeList};
pub use pages::{
    Channel, ChannelHeader, ChannelInfo, ChannelListContinuation, ChannelTab, FilteredChannelList,
    Settings, SettingsSection, SidebarSelector,
};
pub use parser::{PageData, ParsedResponse, Parser};
pub use shape::{Shape, ShapeCatalog, ShapeKind, ShapeList, ShapeRule, ShapeTag};
