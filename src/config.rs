//! Configuration module for the replytree service.
//!
//! This module contains configuration structures and environment variable handling
//! for the Twitter/X API client and the reply resolver.

use log::{debug, error, info, warn};
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.x.com/2";
const DEFAULT_MAX_RESULTS: u32 = 100;
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_CONCURRENT_SEARCHES: usize = 4;
const DEFAULT_PORT: u16 = 3000;

/// Masks a secret for logging, keeping at most the first and last 8 characters.
pub(crate) fn mask_token(token: &str) -> String {
    let token_length = token.chars().count();
    let head: String = token.chars().take(8).collect();
    if token_length > 16 {
        let tail: String = token.chars().skip(token_length - 8).collect();
        format!("{}...{}", head, tail)
    } else if token_length > 8 {
        format!("{}...", head)
    } else {
        "...".to_string()
    }
}

/// Configuration struct for Twitter/X API access.
///
/// Holds the bearer token used for the read-only v2 search and timeline
/// endpoints, plus the request shaping parameters of the HTTP client.
#[derive(Debug, Clone)]
pub struct TwitterConfig {
    /// The Bearer Token sent with every request
    pub bearer_token: String,
    /// Base URL of the v2 API, without trailing slash
    pub api_base_url: String,
    /// Number of posts requested per search or timeline call (10..=100)
    pub max_results: u32,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl TwitterConfig {
    /// Creates a new `TwitterConfig` instance by loading settings from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `xapi_bearer_token`: Twitter API Bearer Token
    ///
    /// # Optional Environment Variables
    ///
    /// - `xapi_base_url`: API base URL (defaults to `https://api.x.com/2`)
    /// - `xapi_search_max_results`: Posts per call, clamped to 10..=100 (defaults to 100)
    /// - `xapi_timeout_secs`: Request timeout in seconds (defaults to 10)
    ///
    /// # Returns
    ///
    /// - `Ok(TwitterConfig)`: If the bearer token is present and non-empty
    /// - `Err(Box<dyn std::error::Error + Send + Sync>)`: If the token is missing or empty
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use replytree::TwitterConfig;
    ///
    /// std::env::set_var("xapi_bearer_token", "your_bearer_token");
    /// let config = TwitterConfig::from_env().unwrap();
    /// ```
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        info!("Loading Twitter configuration from environment variables");
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests pass a closure over a map instead of
    /// touching the process environment.
    pub fn from_vars<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error + Send + Sync>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bearer_token = match lookup("xapi_bearer_token") {
            Some(token) => {
                info!(
                    "Found xapi_bearer_token environment variable with length: {}",
                    token.len()
                );
                debug!("Bearer token (masked): {}", mask_token(&token));

                if token.trim().is_empty() {
                    error!("Bearer token is empty");
                    return Err("Bearer token cannot be empty".into());
                }
                if token.len() < 10 {
                    warn!(
                        "Bearer token seems unusually short ({} characters)",
                        token.len()
                    );
                }
                token
            }
            None => {
                error!("Make sure xapi_bearer_token environment variable is set");
                return Err("Missing xapi_bearer_token environment variable".into());
            }
        };

        let api_base_url = lookup("xapi_base_url")
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let max_results = parse_or_default(
            "xapi_search_max_results",
            lookup("xapi_search_max_results"),
            DEFAULT_MAX_RESULTS,
        );
        let clamped = max_results.clamp(10, 100);
        if clamped != max_results {
            warn!(
                "xapi_search_max_results {} out of range, using {}",
                max_results, clamped
            );
        }

        let timeout_secs = parse_or_default(
            "xapi_timeout_secs",
            lookup("xapi_timeout_secs"),
            DEFAULT_TIMEOUT_SECS,
        );

        let config = TwitterConfig {
            bearer_token,
            api_base_url,
            max_results: clamped,
            request_timeout: Duration::from_secs(timeout_secs),
        };

        info!(
            "Twitter configuration loaded: base_url={}, max_results={}, timeout={}s",
            config.api_base_url, config.max_results, timeout_secs
        );
        Ok(config)
    }
}

/// How `totalItems` of a reply collection is counted.
///
/// ActivityStreams reply collections served by this service have counted the
/// seed post in `totalItems`, even though the seed is never listed in `items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TotalItemsConvention {
    /// `totalItems = 1 + items.len()`
    #[default]
    IncludeSeed,
    /// `totalItems = items.len()`
    RepliesOnly,
}

impl TotalItemsConvention {
    /// Computes `totalItems` for a collection holding `reply_count` replies.
    pub fn total_items(self, reply_count: usize) -> usize {
        match self {
            TotalItemsConvention::IncludeSeed => reply_count + 1,
            TotalItemsConvention::RepliesOnly => reply_count,
        }
    }
}

impl FromStr for TotalItemsConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "include_seed" => Ok(TotalItemsConvention::IncludeSeed),
            "replies_only" => Ok(TotalItemsConvention::RepliesOnly),
            other => Err(format!("unknown totalItems convention '{}'", other)),
        }
    }
}

/// Settings for one reply resolver.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub total_items: TotalItemsConvention,
    /// Upper bound on mention searches in flight within one traversal layer
    pub max_concurrent_searches: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            total_items: TotalItemsConvention::default(),
            max_concurrent_searches: DEFAULT_MAX_CONCURRENT_SEARCHES,
        }
    }
}

impl ResolverConfig {
    /// Loads resolver settings from `REPLIES_TOTAL_ITEMS` and
    /// `REPLIES_MAX_CONCURRENT_SEARCHES`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let total_items = match lookup("REPLIES_TOTAL_ITEMS") {
            Some(value) => match value.parse() {
                Ok(convention) => convention,
                Err(e) => {
                    warn!("Invalid REPLIES_TOTAL_ITEMS: {}, using include_seed", e);
                    TotalItemsConvention::default()
                }
            },
            None => TotalItemsConvention::default(),
        };

        let max_concurrent_searches = parse_or_default(
            "REPLIES_MAX_CONCURRENT_SEARCHES",
            lookup("REPLIES_MAX_CONCURRENT_SEARCHES"),
            DEFAULT_MAX_CONCURRENT_SEARCHES,
        )
        .max(1);

        info!(
            "Resolver configuration: total_items={:?}, max_concurrent_searches={}",
            total_items, max_concurrent_searches
        );

        ResolverConfig {
            total_items,
            max_concurrent_searches,
        }
    }
}

fn parse_or_default<T>(name: &str, value: Option<String>, default: T) -> T
where
    T: FromStr + std::fmt::Display + Copy,
{
    match value {
        Some(raw) => match raw.trim().parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("{} is not a valid value ('{}'), using {}", name, raw, default);
                default
            }
        },
        None => default,
    }
}

/// Gets the server port from the `PORT` environment variable.
///
/// Defaults to 3000 when the variable is unset or not a valid port number.
///
/// # Example
///
/// ```rust
/// use replytree::get_server_port;
///
/// // With no PORT set
/// let port = get_server_port(); // Returns 3000
/// ```
pub fn get_server_port() -> u16 {
    parse_or_default("PORT", env::var("PORT").ok(), DEFAULT_PORT)
}
