//! Reply Tree Fetching Script
//!
//! This script fetches a user's recent posts from Twitter/X together with
//! their full reply trees and prints the result as JSON.

use std::io::{self, Write};
use std::sync::Arc;

use replytree::parsing::is_valid_handle;
use replytree::{Post, PostSource, ReplyResolver, ResolverConfig, TwitterClient, TwitterConfig};

/// Reads one trimmed line from stdin after printing `prompt`.
fn prompt_line(prompt: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();

    println!("🧵 Twitter Reply Tree Tool");
    println!("==========================");

    let bearer_token = match std::env::var("xapi_bearer_token") {
        Ok(token) if !token.is_empty() => token,
        _ => prompt_line("🔑 Enter your Twitter Bearer Token: ")?,
    };

    if bearer_token.is_empty() {
        println!("❌ Bearer token cannot be empty!");
        return Err("Bearer token is required".into());
    }

    let handle = prompt_line("👤 Enter the handle whose posts to fetch: ")?;
    if !is_valid_handle(&handle) {
        println!("❌ '{}' is not a valid handle!", handle);
        return Err("A valid handle is required".into());
    }

    let config = TwitterConfig::from_vars(|key| match key {
        "xapi_bearer_token" => Some(bearer_token.clone()),
        other => std::env::var(other).ok(),
    })?;
    let client = Arc::new(TwitterClient::new(config)?);

    println!("\n📥 Fetching posts for {}...", handle);
    let records = client.user_posts(&handle, 100).await?;
    let posts: Vec<Post> = records.into_iter().filter_map(Post::from_record).collect();
    println!("📄 Found {} posts", posts.len());

    println!("🔎 Resolving replies...");
    let resolver = ReplyResolver::new(client, ResolverConfig::from_env());
    let batch = resolver.resolve_replies(posts).await;

    for warning in &batch.warnings {
        println!(
            "⚠️  Post {}: search for @{} failed: {}",
            warning.root_id, warning.author, warning.message
        );
    }
    println!(
        "✅ Done with {} mention searches\n",
        batch.searches
    );
    println!("{}", serde_json::to_string_pretty(&batch.posts)?);

    Ok(())
}
