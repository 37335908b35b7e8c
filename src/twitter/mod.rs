//! Twitter/X API integration module.
//!
//! This module contains the HTTP client used to search for @-mentions and to
//! fetch a user's recent posts through the Twitter API v2.

mod api;
mod search;

pub use search::TwitterClient;

// Crate-internal re-exports (used by tests)
#[allow(unused_imports)]
pub(crate) use api::{parse_tweets, sanitize_for_logging};
