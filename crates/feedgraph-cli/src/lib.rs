//! feedgraph CLI: browse channel and settings feeds from the terminal.

pub mod commands;
pub mod config;
pub mod render;
pub mod transport;

pub use commands::ChannelRequest;
pub use config::{ClientConfig, ConfigError, ConfigOverrides};
pub use transport::{FixtureActions, HttpActions};
