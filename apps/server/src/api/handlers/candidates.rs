//! Candidate handlers
//!
//! The listing handler is the query planner's entry point: it validates the
//! untrusted parameters, runs the count/fetch pair through the store, and
//! assembles the pagination envelope. Every write handler invalidates the
//! cached listing family before responding; invalidation failures are logged
//! inside the cache layer and never fail the write.

use crate::{
    cache::CANDIDATE_LIST_PREFIX,
    db::search::{ListQuery, ListingParams},
    db::traits::{AccessSource, AuditEntry},
    models::{Candidate, CandidateUpdate, NewCandidate, Page, Pagination},
    request_context::RequestContext,
    state::AppState,
    Error, Result,
};
use axum::{
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use validator::Validate;

/// GET /api/candidates
pub async fn list_candidates(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
    RawQuery(raw_query): RawQuery,
    ctx: Option<Extension<RequestContext>>,
) -> Result<Json<Page<Candidate>>> {
    let query = ListQuery::from_params(&params);
    let (data, total) = state.store.list(&query).await?;

    let request_id = ctx.map(|Extension(ctx)| ctx.request_id);
    state.audit.record(AuditEntry::list_access(
        AccessSource::Api,
        request_id,
        raw_query,
    ));

    let pagination = Pagination::new(query.page, query.limit, total);
    Ok(Json(Page { data, pagination }))
}

/// GET /api/candidates/:id
pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Candidate>> {
    let candidate = state
        .store
        .get(id)
        .await?
        .ok_or(Error::CandidateNotFound { id })?;

    Ok(Json(candidate))
}

/// POST /api/candidates
pub async fn create_candidate(
    State(state): State<AppState>,
    Json(payload): Json<NewCandidate>,
) -> Result<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| Error::Validation(e.to_string()))?;

    let id = state.store.create(&payload).await?;

    // The listing family is stale now; drop it before responding.
    state.cache.invalidate_prefix(CANDIDATE_LIST_PREFIX).await;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "Candidate created successfully" })),
    ))
}

/// PUT /api/candidates/:id
pub async fn update_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CandidateUpdate>,
) -> Result<Json<serde_json::Value>> {
    payload
        .validate()
        .map_err(|e| Error::Validation(e.to_string()))?;

    if !state.store.update(id, &payload).await? {
        return Err(Error::CandidateNotFound { id });
    }

    state.cache.invalidate_prefix(CANDIDATE_LIST_PREFIX).await;

    Ok(Json(json!({ "message": "Candidate updated successfully" })))
}

/// POST /api/candidates/:id/enable
pub async fn enable_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    set_enabled(&state, id, true).await
}

/// POST /api/candidates/:id/disable
///
/// Candidates are never hard-deleted; disabling is the soft-delete.
pub async fn disable_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    set_enabled(&state, id, false).await
}

async fn set_enabled(state: &AppState, id: i64, enabled: bool) -> Result<Json<serde_json::Value>> {
    if !state.store.set_enabled(id, enabled).await? {
        return Err(Error::CandidateNotFound { id });
    }

    state.cache.invalidate_prefix(CANDIDATE_LIST_PREFIX).await;

    let message = if enabled {
        "Candidate enabled"
    } else {
        "Candidate disabled"
    };
    Ok(Json(json!({ "message": message })))
}
