//! Traits for the remote post source.
//!
//! The resolver only ever talks to the network through these traits, so the
//! Twitter client and the in-memory test double are interchangeable.

use async_trait::async_trait;

use crate::models::MentionRecord;

/// Search over posts that mention a handle.
#[async_trait]
pub trait MentionSearch: Send + Sync {
    /// Runs a mention search for `query` (`"@" + handle`) and returns one page of results.
    ///
    /// Records may be incomplete; callers validate them with
    /// [`Post::from_record`](crate::models::Post::from_record).
    async fn search(
        &self,
        query: &str,
    ) -> Result<Vec<MentionRecord>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Access to a user's own recent posts.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetches up to `count` recent posts authored by `handle`.
    async fn user_posts(
        &self,
        handle: &str,
        count: u32,
    ) -> Result<Vec<MentionRecord>, Box<dyn std::error::Error + Send + Sync>>;
}
