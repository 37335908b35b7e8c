//! HTTP route handlers for the replytree service.
//!
//! This module contains all the HTTP route handler functions that process
//! incoming requests and return appropriate responses, plus the router that
//! wires them together.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use log::{error, info, warn};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::models::Post;
use crate::parsing::{is_valid_handle, normalize_handle};
use crate::resolver::ReplyResolver;
use crate::source::PostSource;

const DEFAULT_POST_COUNT: u32 = 100;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where user timelines come from
    pub posts: Arc<dyn PostSource>,
    pub resolver: ReplyResolver,
}

/// Query parameters of `GET /users/:handle/posts`.
#[derive(Debug, Deserialize)]
pub struct PostsQuery {
    #[serde(default)]
    pub fetch_replies: bool,
    pub count: Option<u32>,
}

/// Body of `POST /replies`.
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub posts: Vec<Post>,
}

/// Builds the application router with every route.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/users/:handle/posts", get(handle_user_posts))
        .route("/replies", post(handle_resolve_replies))
        .with_state(state)
}

/// Handles GET requests to the root `/` endpoint.
pub async fn handle_root() -> &'static str {
    "replytree: reply trees for Twitter/X posts"
}

/// Handles GET requests to the `/health` endpoint.
///
/// # Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "replytree"
/// }
/// ```
pub async fn handle_health() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "replytree"}))
}

/// Handles GET requests to `/users/:handle/posts`.
///
/// Fetches the user's recent posts and, when `fetch_replies=true`, resolves
/// the reply tree of every post in a single batch.
///
/// # Returns
///
/// - `Ok(Json<Value>)`: `{"status": "success", "posts": [...], "warnings": [...]}`
/// - `Err((StatusCode, Json<Value>))`: 400 for an invalid handle, 502 if the post source fails
pub async fn handle_user_posts(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(query): Query<PostsQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !is_valid_handle(&handle) {
        warn!("Rejected posts request for invalid handle");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"status": "error", "message": "Invalid handle"})),
        ));
    }

    let handle = normalize_handle(&handle);
    let count = query.count.unwrap_or(DEFAULT_POST_COUNT);
    info!(
        "Fetching posts for @{} (count: {}, fetch_replies: {})",
        handle, count, query.fetch_replies
    );

    let records = match state.posts.user_posts(&handle, count).await {
        Ok(records) => records,
        Err(e) => {
            error!("Failed to fetch posts for @{}: {}", handle, e);
            return Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "status": "error",
                    "message": "Failed to fetch posts",
                    "error": e.to_string()
                })),
            ));
        }
    };

    let posts: Vec<Post> = records.into_iter().filter_map(Post::from_record).collect();

    if !query.fetch_replies {
        return Ok(Json(
            json!({"status": "success", "posts": posts, "warnings": []}),
        ));
    }

    let batch = state.resolver.resolve_replies(posts).await;
    Ok(Json(json!({
        "status": "success",
        "posts": batch.posts,
        "warnings": batch.warnings,
        "searches": batch.searches
    })))
}

/// Handles POST requests to the `/replies` endpoint.
///
/// Resolves the replies of the posts given in the request body.
///
/// # Success Response
///
/// ```json
/// {
///   "status": "success",
///   "posts": [{"id": "1", "author": "alice", "replies": {"items": [], "totalItems": 1}}],
///   "warnings": [],
///   "searches": 1
/// }
/// ```
pub async fn handle_resolve_replies(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> Json<Value> {
    info!("Resolving replies for {} posted root(s)", request.posts.len());
    let batch = state.resolver.resolve_replies(request.posts).await;
    Json(json!({
        "status": "success",
        "posts": batch.posts,
        "warnings": batch.warnings,
        "searches": batch.searches
    }))
}
