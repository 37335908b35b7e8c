//! Tweet search and timeline functionality for the Twitter API.
//!
//! [`TwitterClient`] is the production implementation of the
//! [`MentionSearch`] and [`PostSource`] traits, backed by the v2
//! `tweets/search/recent` and `users/:id/tweets` endpoints.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;

use super::api::{build_bearer_auth_header, make_request, parse_tweets, sanitize_for_logging};
use crate::config::TwitterConfig;
use crate::models::MentionRecord;
use crate::parsing::normalize_handle;
use crate::source::{MentionSearch, PostSource};

const TWEET_FIELDS: &str = "created_at,author_id,conversation_id,in_reply_to_user_id,referenced_tweets";
const EXPANSIONS: &str = "author_id,referenced_tweets.id";

/// HTTP client for the Twitter/X API v2.
#[derive(Debug, Clone)]
pub struct TwitterClient {
    client: Client,
    config: TwitterConfig,
}

impl TwitterClient {
    /// Creates a client whose requests time out after `config.request_timeout`.
    ///
    /// # Returns
    ///
    /// - `Ok(TwitterClient)`: The configured client
    /// - `Err(Box<dyn std::error::Error + Send + Sync>)`: If the underlying HTTP client cannot be built
    pub fn new(config: TwitterConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(TwitterClient { client, config })
    }

    /// Builds the recent-search URL for a raw query string.
    pub(crate) fn search_url(&self, query: &str) -> String {
        format!(
            "{}/tweets/search/recent?query={}&max_results={}&expansions={}&user.fields=id,username,name&tweet.fields={}",
            self.config.api_base_url,
            urlencoding::encode(query),
            self.config.max_results,
            EXPANSIONS,
            TWEET_FIELDS
        )
    }

    /// Looks up a user's numeric id by handle.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(user_id))`: If the user exists
    /// - `Ok(None)`: If the API reports no such user
    /// - `Err(Box<dyn std::error::Error + Send + Sync>)`: If the request fails
    pub async fn lookup_user_id(
        &self,
        handle: &str,
    ) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let username = normalize_handle(handle);
        info!("Looking up user by username: {}", username);

        let url = format!(
            "{}/users/by/username/{}?user.fields=id,username",
            self.config.api_base_url,
            urlencoding::encode(&username)
        );
        let request_builder = self
            .client
            .get(&url)
            .header("Authorization", build_bearer_auth_header(&self.config.bearer_token));

        let response_text = make_request(request_builder, "lookup_user").await?;
        let json_response: serde_json::Value = serde_json::from_str(&response_text)?;

        match json_response
            .get("data")
            .and_then(|data| data.get("id"))
            .and_then(|v| v.as_str())
        {
            Some(id) => {
                debug!("Found user @{} with id {}", username, id);
                Ok(Some(id.to_string()))
            }
            None => {
                warn!("User {} not found", username);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl MentionSearch for TwitterClient {
    async fn search(
        &self,
        query: &str,
    ) -> Result<Vec<MentionRecord>, Box<dyn std::error::Error + Send + Sync>> {
        let url = self.search_url(query);
        info!("Searching recent tweets for query: {}", sanitize_for_logging(query, 64));
        debug!("Search URL: {}", url);
        debug!("Request headers: Authorization: Bearer [REDACTED]");

        let request_builder = self
            .client
            .get(&url)
            .header("Authorization", build_bearer_auth_header(&self.config.bearer_token));

        let response_text = make_request(request_builder, "search_mentions").await?;
        let json_response: serde_json::Value = serde_json::from_str(&response_text)?;

        if json_response
            .get("meta")
            .and_then(|meta| meta.get("next_token"))
            .is_some()
        {
            debug!("More search results available for {}; only the first page is used", query);
        }

        Ok(parse_tweets(&json_response))
    }
}

#[async_trait]
impl PostSource for TwitterClient {
    async fn user_posts(
        &self,
        handle: &str,
        count: u32,
    ) -> Result<Vec<MentionRecord>, Box<dyn std::error::Error + Send + Sync>> {
        let user_id = match self.lookup_user_id(handle).await? {
            Some(id) => id,
            None => return Err(format!("User {} not found", normalize_handle(handle)).into()),
        };

        let max_results = count.clamp(5, 100);
        let url = format!(
            "{}/users/{}/tweets?max_results={}&expansions={}&user.fields=id,username,name&tweet.fields={}",
            self.config.api_base_url, user_id, max_results, EXPANSIONS, TWEET_FIELDS
        );
        info!(
            "Fetching up to {} posts for @{}",
            max_results,
            normalize_handle(handle)
        );
        debug!("Timeline URL: {}", url);

        let request_builder = self
            .client
            .get(&url)
            .header("Authorization", build_bearer_auth_header(&self.config.bearer_token));

        let response_text = make_request(request_builder, "user_posts").await?;
        let json_response: serde_json::Value = serde_json::from_str(&response_text)?;

        Ok(parse_tweets(&json_response))
    }
}
