//! [`feedgraph::Actions`] implementations: live HTTP and recorded fixtures.

pub mod fixture;
pub mod http;

pub use fixture::FixtureActions;
pub use http::HttpActions;
