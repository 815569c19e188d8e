//! API Routes
//!
//! Configures the Axum router with all cache service endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cleanup_handler, clear_handler, delete_handler, get_handler, health_handler,
    prayer_times_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /cache` - Store a JSON value
/// - `DELETE /cache` - Drop every entry
/// - `GET /cache/:key` - Retrieve a value by key
/// - `DELETE /cache/:key` - Invalidate a key
/// - `POST /cache/cleanup` - Sweep expired entries now
/// - `GET /prayer-times` - Cached prayer schedule (`?date=YYYY-MM-DD`)
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// `cleanup` is a static segment and wins over `:key`, so a key literally
/// named `cleanup` is not reachable over HTTP.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/cache", put(set_handler).delete(clear_handler))
        .route("/cache/cleanup", post(cleanup_handler))
        .route("/cache/:key", get(get_handler).delete(delete_handler))
        .route("/prayer-times", get(prayer_times_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
