//! # Replytree
//!
//! A Rust web service that reconstructs full reply trees for Twitter/X posts
//! by walking @-mention searches.
//!
//! ## Environment Variables
//!
//! - `xapi_bearer_token`: Twitter API Bearer Token (required)
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

use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use replytree::{
    create_router, get_server_port, AppState, ReplyResolver, ResolverConfig, TwitterClient,
    TwitterConfig,
};

/// Main entry point for the replytree web service.
///
/// Initializes logging, loads configuration, builds the Twitter client and
/// reply resolver, and serves HTTP until Ctrl-C is received.
///
/// # Logging
///
/// The application uses the `env_logger` crate. Log levels can be controlled
/// via the `RUST_LOG` environment variable.
///
/// # Example Usage
///
/// ```bash
/// # Run with default port 3000
/// xapi_bearer_token=... cargo run
///
/// # Run with debug logging
/// RUST_LOG=debug xapi_bearer_token=... cargo run
/// ```
#[tokio::main]
async fn main() {
    // Initialize the logging system
    env_logger::init();

    let twitter_config = match TwitterConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load Twitter configuration: {}", e);
            std::process::exit(1);
        }
    };

    let client = match TwitterClient::new(twitter_config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to build Twitter client: {}", e);
            std::process::exit(1);
        }
    };

    let resolver = ReplyResolver::new(client.clone(), ResolverConfig::from_env());
    let state = AppState {
        posts: client,
        resolver,
    };

    // Build the HTTP application with all routes and middleware
    let app = create_router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let port = get_server_port();
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    info!("Starting replytree server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
        info!("Shutdown signal received");
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
    {
        error!("HTTP server error: {}", e);
    }
}
