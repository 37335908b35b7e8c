//! Core Twitter API utilities.
//!
//! This module contains the low-level helpers for making authenticated
//! requests to the Twitter API v2 and turning its JSON payloads into
//! [`MentionRecord`]s.

use log::{debug, error, info, warn};
use std::collections::HashMap;

use crate::models::MentionRecord;

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// This function:
/// - Truncates long text to prevent log flooding
/// - Replaces control characters that could manipulate log output
/// - Escapes newlines to prevent log injection
///
/// # Parameters
///
/// - `text`: The text to sanitize
/// - `max_len`: Maximum length in characters before truncation
///
/// # Returns
///
/// A sanitized string safe for logging
pub(crate) fn sanitize_for_logging(text: &str, max_len: usize) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.chars().count() > max_len {
        let truncated: String = sanitized.chars().take(max_len).collect();
        format!(
            "{}... [truncated, {} total bytes]",
            truncated,
            text.len()
        )
    } else {
        sanitized
    }
}

/// Builds the Authorization header for OAuth 2.0 Bearer Token authentication.
pub(crate) fn build_bearer_auth_header(bearer_token: &str) -> String {
    format!("Bearer {}", bearer_token)
}

/// Sends a request to the Twitter API and returns the body on success.
///
/// Non-success statuses become errors naming the operation; 401/403 and 429
/// get dedicated messages since they are the common failure modes of search.
///
/// # Parameters
///
/// - `request_builder`: A configured reqwest::RequestBuilder ready to send
/// - `operation_name`: Human-readable name for the operation (for logging)
///
/// # Returns
///
/// - `Ok(String)`: The API response body on success
/// - `Err(Box<dyn std::error::Error + Send + Sync>)`: If the request fails or the API reports an error
pub(crate) async fn make_request(
    request_builder: reqwest::RequestBuilder,
    operation_name: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    debug!("Sending request for operation: {}", operation_name);

    let response = request_builder.send().await?;
    let status = response.status();
    debug!(
        "Received response with status: {} for operation: {}",
        status, operation_name
    );

    let response_text = response.text().await?;

    if status.is_success() {
        debug!(
            "Response summary for '{}': {} bytes received",
            operation_name,
            response_text.len()
        );
        return Ok(response_text);
    }

    error!("Operation '{}' failed - Status: {}", operation_name, status);
    debug!(
        "Error response for '{}': {}",
        operation_name,
        sanitize_for_logging(&response_text, 200)
    );

    match status.as_u16() {
        401 | 403 => Err(format!(
            "Twitter API rejected credentials for operation '{}' ({})",
            operation_name, status
        )
        .into()),
        429 => {
            warn!("Rate limited during operation '{}'", operation_name);
            Err(format!(
                "Twitter API rate limit reached for operation '{}'",
                operation_name
            )
            .into())
        }
        _ => Err(format!(
            "Twitter API error for operation '{}' ({})",
            operation_name, status
        )
        .into()),
    }
}

/// Converts a v2 tweets payload into mention records.
///
/// Author handles are resolved through `includes.users`; the replied-to id is
/// taken from the `referenced_tweets` entry of type `replied_to`. Tweets are
/// kept even if fields are missing, so the caller decides what is malformed.
///
/// # Parameters
///
/// - `json_response`: A response from a v2 endpoint returning a `data` array of tweets
///
/// # Returns
///
/// One record per element of `data`, in API order
pub(crate) fn parse_tweets(json_response: &serde_json::Value) -> Vec<MentionRecord> {
    let mut users_username_map = HashMap::new();
    if let Some(users) = json_response
        .get("includes")
        .and_then(|includes| includes.get("users"))
        .and_then(|users| users.as_array())
    {
        for user in users {
            if let (Some(id), Some(username)) = (
                user.get("id").and_then(|v| v.as_str()),
                user.get("username").and_then(|v| v.as_str()),
            ) {
                users_username_map.insert(id.to_string(), username.to_string());
            }
        }
    }

    let tweets = match json_response.get("data").and_then(|d| d.as_array()) {
        Some(tweets) => tweets,
        None => {
            if json_response.get("data").is_some() {
                warn!("Unexpected response format: data is not an array");
            }
            return Vec::new();
        }
    };

    let mut records = Vec::with_capacity(tweets.len());
    for tweet in tweets {
        let id = tweet.get("id").and_then(|v| v.as_str()).map(String::from);

        let author = tweet
            .get("author_id")
            .and_then(|v| v.as_str())
            .and_then(|author_id| users_username_map.get(author_id))
            .cloned();

        let in_reply_to_id = tweet
            .get("referenced_tweets")
            .and_then(|r| r.as_array())
            .and_then(|refs| {
                refs.iter().find(|r| {
                    r.get("type").and_then(|t| t.as_str()) == Some("replied_to")
                })
            })
            .and_then(|r| r.get("id"))
            .and_then(|v| v.as_str())
            .map(String::from);

        let created_at = match tweet.get("created_at").and_then(|v| v.as_str()) {
            Some(created_at_str) => match chrono::DateTime::parse_from_rfc3339(created_at_str) {
                Ok(dt) => Some(dt.with_timezone(&chrono::Utc)),
                Err(e) => {
                    warn!("Failed to parse created_at '{}': {}", created_at_str, e);
                    None
                }
            },
            None => None,
        };

        let text = tweet.get("text").and_then(|v| v.as_str()).map(String::from);

        records.push(MentionRecord {
            id,
            author,
            in_reply_to_id,
            text,
            created_at,
        });
    }

    info!("Parsed {} tweet(s) from response", records.len());
    records
}
