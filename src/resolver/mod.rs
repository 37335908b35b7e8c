//! Reply tree resolution.
//!
//! This module reconstructs the replies to a batch of root posts using only
//! mention searches: a [`MentionCache`] memoizes one search per author, the
//! matcher decides which search results reply to which post, and the
//! [`ReplyResolver`] drives the traversal.

mod builder;
mod cache;
mod matcher;

pub use builder::{ReplyResolver, ResolveWarning, ResolvedBatch};
pub use cache::{CachedMentions, MentionCache};
pub use matcher::is_direct_reply;
