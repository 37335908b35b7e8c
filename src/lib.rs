//! # Replytree Library
//!
//! Reconstructs the full reply trees of Twitter/X posts. The API offers no
//! "replies to this post" endpoint, so replies are found indirectly: every
//! reply to a post by `@alice` mentions `@alice`, so a mention search for
//! `@alice` filtered on the replied-to id yields the direct replies, and the
//! process repeats for each reply's author until the tree is complete.
//!
//! ## Features
//!
//! - Reply resolution with one mention search per distinct author per batch
//! - Concurrent mention searches within each traversal layer
//! - Twitter/X API v2 client with request timeouts
//! - HTTP service exposing timelines with resolved replies
//! - Structured logging
//!
//! ## Configuration
//!
//! - `xapi_bearer_token`: Twitter API Bearer Token (required by the HTTP client)
//! - `REPLIES_TOTAL_ITEMS`: `include_seed` (default) or `replies_only`
//! - `REPLIES_MAX_CONCURRENT_SEARCHES`: searches in flight per layer (defaults to 4)
//! - `PORT`: Server port (defaults to 3000)
//!
//! ## API Endpoints
//!
//! - `GET /`: Returns a welcome message
//! - `GET /health`: Returns service health status
//! - `GET /users/:handle/posts?fetch_replies=true`: A user's posts with their replies
//! - `POST /replies`: Resolves replies for posted root posts

pub mod config;
pub mod handlers;
pub mod models;
pub mod parsing;
pub mod resolver;
pub mod source;
pub mod twitter;

// Re-export commonly used types and functions
pub use config::{get_server_port, ResolverConfig, TotalItemsConvention, TwitterConfig};
pub use handlers::{create_router, AppState};
pub use models::{MentionRecord, Post, ReplyCollection};
pub use resolver::{is_direct_reply, MentionCache, ReplyResolver, ResolveWarning, ResolvedBatch};
pub use source::{MentionSearch, PostSource};
pub use twitter::TwitterClient;
