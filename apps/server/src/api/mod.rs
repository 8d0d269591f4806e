//! API layer - routes, handlers, and middleware

pub mod handlers;
pub mod middleware;
pub mod routes;

use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.server.max_request_body_size;
    let cors_origins = state.config.server.cors_origins.clone();
    let cache_state = state.clone();

    Router::new()
        // Health check
        .route("/api/health", get(health_check))
        // Root endpoint
        .route("/", get(root))
        // Favicon handler (returns 204 to prevent 404 logs)
        .route("/favicon.ico", get(favicon))
        // Candidate routes (listing GET is cached)
        .merge(routes::candidate_routes(cache_state))
        // Add state
        .with_state(state)
        // Add middleware (applied in reverse order)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(middleware::compression())
        .layer(middleware::cors(&cors_origins))
        // Limit request body size to prevent DoS via large payloads
        .layer(DefaultBodyLimit::max(max_body_size))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "Backend is running!"
    }))
}

async fn root() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "server": "Candideval ATS (Rust)",
            "version": env!("CARGO_PKG_VERSION"),
            "status": "running"
        })),
    )
}

async fn favicon() -> impl IntoResponse {
    // Return 204 No Content to indicate no favicon is available
    StatusCode::NO_CONTENT
}
