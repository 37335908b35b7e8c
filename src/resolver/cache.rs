//! Per-batch memo of mention searches.

use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::models::Post;
use crate::parsing::{mention_query, normalize_handle};
use crate::source::MentionSearch;

/// Outcome of the single mention search made for one author.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedMentions {
    /// Well-formed posts returned by the search, in the order the API gave them
    Found(Vec<Post>),
    /// The search failed; the message is reported once per root that needs it
    Failed(String),
}

/// Maps normalized author handles to their mention search results.
///
/// One cache lives for exactly one resolution batch. Entries are never
/// refreshed, so each distinct author is searched at most once per batch.
#[derive(Debug, Default)]
pub struct MentionCache {
    entries: HashMap<String, CachedMentions>,
    searches: usize,
}

impl MentionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the cached result for `author`, normalizing the handle first.
    pub fn get(&self, author: &str) -> Option<&CachedMentions> {
        self.entries.get(&normalize_handle(author))
    }

    /// Number of searches issued through this cache so far.
    pub fn search_count(&self) -> usize {
        self.searches
    }

    /// Searches every author in `authors` that is not cached yet.
    ///
    /// Duplicate authors are collapsed before any request is made, then the
    /// searches run concurrently with at most `max_in_flight` outstanding. The
    /// call returns once every search has completed and been stored.
    pub async fn prefetch(
        &mut self,
        search: &Arc<dyn MentionSearch>,
        authors: &[String],
        max_in_flight: usize,
    ) {
        let mut pending: Vec<String> = Vec::new();
        for author in authors {
            let key = normalize_handle(author);
            if key.is_empty() || self.entries.contains_key(&key) || pending.contains(&key) {
                continue;
            }
            pending.push(key);
        }

        if pending.is_empty() {
            return;
        }

        info!(
            "Searching mentions for {} author(s): {}",
            pending.len(),
            pending.join(", ")
        );

        let semaphore = Arc::new(Semaphore::new(max_in_flight.max(1)));
        let mut workers = JoinSet::new();

        for key in pending.iter().cloned() {
            let permits = Arc::clone(&semaphore);
            let search = Arc::clone(search);
            workers.spawn(async move {
                let _permit = permits.acquire_owned().await.ok();
                let query = mention_query(&key);
                let result = search.search(&query).await.map_err(|e| e.to_string());
                (key, result)
            });
            self.searches += 1;
        }

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((key, Ok(records))) => {
                    let returned = records.len();
                    let posts: Vec<Post> =
                        records.into_iter().filter_map(Post::from_record).collect();
                    if posts.len() < returned {
                        debug!(
                            "Discarded {} malformed record(s) from search for @{}",
                            returned - posts.len(),
                            key
                        );
                    }
                    debug!("Cached {} mention(s) of @{}", posts.len(), key);
                    self.entries.insert(key, CachedMentions::Found(posts));
                }
                Ok((key, Err(e))) => {
                    warn!("Mention search for @{} failed: {}", key, e);
                    self.entries.insert(key, CachedMentions::Failed(e));
                }
                Err(e) => {
                    error!("Mention search task did not complete: {}", e);
                }
            }
        }

        for key in pending {
            self.entries.entry(key).or_insert_with(|| {
                CachedMentions::Failed("mention search task did not complete".to_string())
            });
        }
    }
}
