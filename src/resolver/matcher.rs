//! Direct-reply matching.

use crate::models::Post;

/// Returns true if `candidate` is a direct reply to `parent`.
///
/// Only the replied-to identifier is compared, exactly. Author, text and
/// conversation membership are not consulted.
pub fn is_direct_reply(candidate: &Post, parent: &Post) -> bool {
    candidate.in_reply_to_id.as_deref() == Some(parent.id.as_str())
}
