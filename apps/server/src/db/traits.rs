//! Core traits for the candidate storage backends
//!
//! The HTTP layer only ever talks to these traits, so the real PostgreSQL
//! store and the in-memory test substitute are interchangeable.

use crate::{
    db::search::ListQuery,
    models::{Candidate, CandidateUpdate, NewCandidate},
    Result,
};
use async_trait::async_trait;

/// Storage operations for candidate records.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Execute a validated listing query.
    ///
    /// Returns the page of rows plus the total count of rows matching the
    /// same predicate. The two are computed by separate queries with no
    /// shared snapshot; a concurrent write between them can make the count
    /// and the page transiently disagree.
    async fn list(&self, query: &ListQuery) -> Result<(Vec<Candidate>, i64)>;

    /// Read one candidate by id.
    async fn get(&self, id: i64) -> Result<Option<Candidate>>;

    /// Insert a candidate; `enabled` defaults to true. Returns the new id.
    async fn create(&self, candidate: &NewCandidate) -> Result<i64>;

    /// Full update. Returns false when the id does not exist.
    async fn update(&self, id: i64, update: &CandidateUpdate) -> Result<bool>;

    /// Flip the soft-delete flag. Returns false when the id does not exist.
    async fn set_enabled(&self, id: i64, enabled: bool) -> Result<bool>;
}

/// Where a listing access was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessSource {
    /// Served from the response cache.
    Cache,
    /// Served by executing the query planner.
    Api,
}

impl AccessSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Api => "api",
        }
    }
}

/// One audit_log row: a single listing access.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub interaction: String,
    pub source: AccessSource,
    pub request_id: Option<String>,
    pub query: Option<String>,
}

impl AuditEntry {
    pub fn list_access(
        source: AccessSource,
        request_id: Option<String>,
        query: Option<String>,
    ) -> Self {
        Self {
            interaction: "list".to_string(),
            source,
            request_id,
            query,
        }
    }
}

/// Persistence for the audit trail, kept separate from `CandidateStore`
/// because emission is best-effort and must never block candidate reads.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, entry: &AuditEntry) -> Result<()>;
}
