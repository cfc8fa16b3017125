//! API Routes
//!
//! Configures the Axum router with all diagnostics endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    fetch_handler, health_handler, invalidate_handler, optimistic_handler, preload_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /fetch/:store/*key` - Cache-or-coalesced fetch against a store
/// - `PUT /optimistic` - Optimistic write into a store
/// - `DELETE /invalidate/:pattern` - Substring purge across stores
/// - `POST /preload` - Preload an asset URL
/// - `GET /stats` - Store and preloader statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/fetch/:store/*key", get(fetch_handler))
        .route("/optimistic", put(optimistic_handler))
        .route("/invalidate/:pattern", delete(invalidate_handler))
        .route("/preload", post(preload_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
