//! Read-through response cache middleware for the candidate listing.
//!
//! On a hit the cached body is returned verbatim with `X-Cache: HIT` and the
//! handler never runs. On a miss the handler's 2xx body is captured and
//! stored under `cache:<path+query>` with the route's fixed TTL, and the
//! response carries `X-Cache: MISS`. Error responses are never stored.
//!
//! A read that was in flight when a writer invalidated can still repopulate
//! the cache with pre-write data; that staleness is bounded by the TTL.

use crate::{
    api::routes::CANDIDATES_PATH,
    cache,
    db::traits::{AccessSource, AuditEntry},
    request_context::RequestContext,
    state::AppState,
};
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Duration;

pub async fn response_cache_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    // Only the listing GET is cached; writes and instance reads pass through.
    if req.method() != Method::GET || req.uri().path() != CANDIDATES_PATH {
        return next.run(req).await;
    }

    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let key = cache::response_key(&path_and_query);

    let request_id = req
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone());
    let raw_query = req.uri().query().map(String::from);

    if let Some(body) = state.cache.get(&key).await {
        tracing::debug!(%key, "CACHE HIT");
        state.audit.record(AuditEntry::list_access(
            AccessSource::Cache,
            request_id,
            raw_query,
        ));

        let mut response = Response::new(Body::from(body));
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert("x-cache", HeaderValue::from_static("HIT"));
        return response;
    }

    tracing::debug!(%key, "CACHE MISS");
    let response = next.run(req).await;
    let (mut parts, body) = response.into_parts();

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, "Failed to buffer listing response body");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // Only cache successful responses. The set is fire-and-forget in the
    // failure sense: errors are absorbed by the backend and cannot fail a
    // request that already succeeded.
    if parts.status.is_success() {
        let ttl = Duration::from_secs(state.config.cache.ttl_seconds);
        state.cache.set(&key, &bytes, ttl).await;
    }

    parts
        .headers
        .insert("x-cache", HeaderValue::from_static("MISS"));

    Response::from_parts(parts, Body::from(bytes))
}
