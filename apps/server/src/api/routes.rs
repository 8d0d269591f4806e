//! Candidate route table
//!
//! The listing GET goes through the response cache middleware; writes bypass
//! it and invalidate the listing family instead.

use crate::api::handlers::candidates;
use crate::api::middleware::response_cache_middleware;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

/// Path of the cached listing family.
pub const CANDIDATES_PATH: &str = "/api/candidates";

pub fn candidate_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/candidates",
            get(candidates::list_candidates).post(candidates::create_candidate),
        )
        .route(
            "/api/candidates/:id",
            get(candidates::get_candidate).put(candidates::update_candidate),
        )
        .route(
            "/api/candidates/:id/enable",
            post(candidates::enable_candidate),
        )
        .route(
            "/api/candidates/:id/disable",
            post(candidates::disable_candidate),
        )
        .layer(axum::middleware::from_fn_with_state(
            state,
            response_cache_middleware,
        ))
}
