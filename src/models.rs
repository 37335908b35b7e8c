//! Post and reply collection types.
//!
//! These are the shapes that flow through reply resolution: raw
//! [`MentionRecord`]s as returned by a mention search, validated [`Post`]s,
//! and the [`ReplyCollection`] attached to each root post.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::parsing::normalize_handle;

/// A post as returned by a mention search or timeline fetch, before validation.
///
/// Every field is optional because the remote API may omit any of them. Records
/// without an id or author are discarded when converted into a [`Post`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MentionRecord {
    pub id: Option<String>,
    pub author: Option<String>,
    pub in_reply_to_id: Option<String>,
    pub text: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl MentionRecord {
    /// Convenience constructor for a record with the three fields resolution needs.
    pub fn new(id: &str, author: &str, in_reply_to_id: Option<&str>) -> Self {
        MentionRecord {
            id: Some(id.to_string()),
            author: Some(author.to_string()),
            in_reply_to_id: in_reply_to_id.map(|s| s.to_string()),
            text: None,
            created_at: None,
        }
    }
}

/// A single post on the social network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Globally unique post identifier
    pub id: String,
    /// Handle of the posting account, without the leading `@`
    pub author: String,
    /// Identifier of the post this one directly replies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Resolved replies; only ever set on root posts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replies: Option<ReplyCollection>,
}

impl Post {
    /// Creates a post with no text, timestamp or replies.
    pub fn new(id: &str, author: &str, in_reply_to_id: Option<&str>) -> Self {
        Post {
            id: id.to_string(),
            author: author.to_string(),
            in_reply_to_id: in_reply_to_id.map(|s| s.to_string()),
            text: None,
            created_at: None,
            replies: None,
        }
    }

    /// Validates a raw record, returning `None` when the id is missing or empty, or
    /// the author is missing or reduces to an empty handle (`"@"`, `" "`).
    pub fn from_record(record: MentionRecord) -> Option<Post> {
        let id = match record.id {
            Some(id) if !id.is_empty() => id,
            _ => {
                debug!("Skipping mention record without an id");
                return None;
            }
        };
        let author = match record.author {
            Some(author) if !normalize_handle(&author).is_empty() => author,
            _ => {
                debug!("Skipping mention record {} without a usable author", id);
                return None;
            }
        };

        Some(Post {
            id,
            author,
            in_reply_to_id: record.in_reply_to_id.filter(|s| !s.is_empty()),
            text: record.text,
            created_at: record.created_at,
            replies: None,
        })
    }

    /// Returns the ids of the resolved replies, or an empty list if none are attached.
    pub fn reply_ids(&self) -> Vec<&str> {
        self.replies
            .as_ref()
            .map(|r| r.items.iter().map(|p| p.id.as_str()).collect())
            .unwrap_or_default()
    }
}

/// The replies discovered for one root post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyCollection {
    /// Replies in discovery order; never contains the root itself
    pub items: Vec<Post>,
    #[serde(rename = "totalItems")]
    pub total_items: usize,
}
