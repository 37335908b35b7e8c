//! Reply tree construction.
//!
//! Replies are found by walking mention searches: the replies to a post by
//! `@alice` must mention `@alice`, so searching for `@alice` and keeping the
//! results whose replied-to id is that post yields its direct replies. Each
//! reply found is in turn expanded the same way until no new replies appear.

use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use super::cache::{CachedMentions, MentionCache};
use super::matcher::is_direct_reply;
use crate::config::ResolverConfig;
use crate::models::{Post, ReplyCollection};
use crate::parsing::normalize_handle;
use crate::source::MentionSearch;

/// A non-fatal problem encountered while resolving one root post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolveWarning {
    pub root_id: String,
    /// Normalized handle whose mention search failed, or the raw handle when it
    /// normalizes to nothing
    pub author: String,
    pub message: String,
}

/// Result of resolving one batch of root posts.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedBatch {
    /// The input roots, in input order, each with `replies` attached
    pub posts: Vec<Post>,
    pub warnings: Vec<ResolveWarning>,
    /// Number of mention searches issued for the batch
    pub searches: usize,
}

/// Resolves reply trees against a mention search collaborator.
#[derive(Clone)]
pub struct ReplyResolver {
    search: Arc<dyn MentionSearch>,
    config: ResolverConfig,
}

impl ReplyResolver {
    pub fn new(search: Arc<dyn MentionSearch>, config: ResolverConfig) -> Self {
        ReplyResolver { search, config }
    }

    /// Attaches a [`ReplyCollection`] to every post in `roots`.
    ///
    /// All roots share one [`MentionCache`], so an author is searched at most
    /// once for the whole batch. A failed search only stops the branches that
    /// needed it; it is reported in [`ResolvedBatch::warnings`] for every root
    /// affected and never aborts the other roots.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use std::sync::Arc;
    /// use replytree::{Post, ReplyResolver, ResolverConfig, TwitterClient, TwitterConfig};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    ///     let client = TwitterClient::new(TwitterConfig::from_env()?)?;
    ///     let resolver = ReplyResolver::new(Arc::new(client), ResolverConfig::default());
    ///     let batch = resolver
    ///         .resolve_replies(vec![Post::new("1", "alice", None)])
    ///         .await;
    ///     println!("{:?}", batch.posts[0].reply_ids());
    ///     Ok(())
    /// }
    /// ```
    pub async fn resolve_replies(&self, roots: Vec<Post>) -> ResolvedBatch {
        info!("Resolving replies for {} root post(s)", roots.len());

        let mut cache = MentionCache::new();
        let mut warnings = Vec::new();
        let mut posts = Vec::with_capacity(roots.len());

        for mut root in roots {
            let replies = self.collect_replies(&root, &mut cache, &mut warnings).await;
            let total_items = self.config.total_items.total_items(replies.len());
            info!(
                "Post {} by @{}: {} repl{} found",
                root.id,
                root.author,
                replies.len(),
                if replies.len() == 1 { "y" } else { "ies" }
            );
            root.replies = Some(ReplyCollection {
                items: replies,
                total_items,
            });
            posts.push(root);
        }

        let searches = cache.search_count();
        info!(
            "Resolved {} root post(s) with {} mention search(es), {} warning(s)",
            posts.len(),
            searches,
            warnings.len()
        );

        ResolvedBatch {
            posts,
            warnings,
            searches,
        }
    }

    /// Walks the reply tree under `root` one layer at a time.
    ///
    /// Authors of the current layer are searched together before any post of
    /// the layer is expanded, so the searches of one layer can run
    /// concurrently. Replies are returned in discovery order.
    async fn collect_replies(
        &self,
        root: &Post,
        cache: &mut MentionCache,
        warnings: &mut Vec<ResolveWarning>,
    ) -> Vec<Post> {
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(root.id.clone());

        let mut warned_authors: HashSet<String> = HashSet::new();
        let mut replies: Vec<Post> = Vec::new();

        let mut seed = root.clone();
        seed.replies = None;
        let mut frontier = vec![seed];
        let mut depth = 0;

        while !frontier.is_empty() {
            let authors: Vec<String> = frontier.iter().map(|p| p.author.clone()).collect();
            cache
                .prefetch(&self.search, &authors, self.config.max_concurrent_searches)
                .await;

            let mut next = Vec::new();
            for parent in &frontier {
                let candidates = match cache.get(&parent.author) {
                    Some(CachedMentions::Found(posts)) => posts.as_slice(),
                    Some(CachedMentions::Failed(message)) => {
                        let author = normalize_handle(&parent.author);
                        if warned_authors.insert(author.clone()) {
                            warn!(
                                "Replies under post {} are incomplete: search for @{} failed",
                                root.id, author
                            );
                            warnings.push(ResolveWarning {
                                root_id: root.id.clone(),
                                author,
                                message: message.clone(),
                            });
                        }
                        continue;
                    }
                    None => {
                        // Only a handle that normalizes to nothing is never searched
                        if warned_authors.insert(String::new()) {
                            warn!(
                                "Replies under post {} are incomplete: invalid author handle '{}'",
                                root.id, parent.author
                            );
                            warnings.push(ResolveWarning {
                                root_id: root.id.clone(),
                                author: parent.author.clone(),
                                message: "invalid author handle".to_string(),
                            });
                        }
                        continue;
                    }
                };

                for candidate in candidates {
                    if is_direct_reply(candidate, parent) && seen.insert(candidate.id.clone()) {
                        next.push(candidate.clone());
                    }
                }
            }

            depth += 1;
            if !next.is_empty() {
                debug!(
                    "Post {}: {} repl{} at depth {}",
                    root.id,
                    next.len(),
                    if next.len() == 1 { "y" } else { "ies" },
                    depth
                );
            }
            replies.extend(next.iter().cloned());
            frontier = next;
        }

        replies
    }
}
