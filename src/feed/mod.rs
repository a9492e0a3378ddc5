//! Feed data sources
//!
//! - Source: where posts come from (JSON export on disk, or an HTTP endpoint)
//! - Query: filtering and ordering applied on top of a fetched feed

pub mod query;
pub mod source;

pub use query::{FeedFilter, ProfileStats};
pub use source::{FeedSource, FeedSpec, HttpFeedSource, JsonFileSource};
