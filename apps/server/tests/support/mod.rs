#![allow(dead_code)]

use anyhow::Context as _;
use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use candideval::{
    api::create_router,
    cache::{InMemoryResponseCache, ResponseCache},
    db::search::{ListQuery, SortColumn, SortOrder},
    db::traits::{AuditEntry, AuditSink, CandidateStore},
    models::{Candidate, CandidateUpdate, NewCandidate},
    services::AuditService,
    AppState, Config, Result,
};
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt as _;

/// In-memory store interpreting the planner's validated query the same way
/// the SQL backend does: every term is a required, prefix-matching token
/// over name, email, and tags.
#[derive(Default)]
pub struct InMemoryCandidateStore {
    rows: Mutex<Vec<Candidate>>,
    audit: Mutex<Vec<AuditEntry>>,
    next_id: AtomicI64,
}

impl InMemoryCandidateStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            audit: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Insert a row with a deterministic created_at so sort order is stable
    /// across test runs.
    pub fn insert_seed(&self, name: &str, email: &str, tags: Option<&str>, seq: i64) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        self.rows.lock().unwrap().push(Candidate {
            id,
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            tags: tags.map(String::from),
            resume_url: None,
            enabled: true,
            created_at: base + ChronoDuration::seconds(seq),
        });
        id
    }

    pub fn rows(&self) -> Vec<Candidate> {
        self.rows.lock().unwrap().clone()
    }

    pub fn audit_entries(&self) -> Vec<AuditEntry> {
        self.audit.lock().unwrap().clone()
    }
}

fn matches_terms(candidate: &Candidate, terms: &[String]) -> bool {
    if terms.is_empty() {
        return true;
    }
    let mut haystack = format!("{} {}", candidate.name, candidate.email);
    if let Some(tags) = &candidate.tags {
        haystack.push(' ');
        haystack.push_str(tags);
    }
    let tokens: Vec<String> = haystack
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect();

    terms.iter().all(|term| {
        let term = term.to_lowercase();
        tokens.iter().any(|token| token.starts_with(&term))
    })
}

#[async_trait]
impl CandidateStore for InMemoryCandidateStore {
    async fn list(&self, query: &ListQuery) -> Result<(Vec<Candidate>, i64)> {
        let mut matched: Vec<Candidate> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches_terms(c, &query.terms))
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            let ordering = match query.sort_by {
                SortColumn::Name => a.name.cmp(&b.name),
                SortColumn::Email => a.email.cmp(&b.email),
                SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
            };
            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matched.len() as i64;
        let page = matched
            .into_iter()
            .skip(query.offset().max(0) as usize)
            .take(query.limit as usize)
            .collect();

        Ok((page, total))
    }

    async fn get(&self, id: i64) -> Result<Option<Candidate>> {
        Ok(self.rows.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn create(&self, candidate: &NewCandidate) -> Result<i64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let seq = id;
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        self.rows.lock().unwrap().push(Candidate {
            id,
            name: candidate.name.clone(),
            email: candidate.email.clone(),
            phone: candidate.phone.clone(),
            tags: candidate.tags.clone(),
            resume_url: candidate.resume_url.clone(),
            enabled: true,
            created_at: base + ChronoDuration::seconds(seq),
        });
        Ok(id)
    }

    async fn update(&self, id: i64, update: &CandidateUpdate) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|c| c.id == id) {
            Some(row) => {
                row.name = update.name.clone();
                row.email = update.email.clone();
                row.phone = update.phone.clone();
                row.tags = update.tags.clone();
                row.resume_url = update.resume_url.clone();
                row.enabled = update.enabled;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_enabled(&self, id: i64, enabled: bool) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|c| c.id == id) {
            Some(row) => {
                row.enabled = enabled;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl AuditSink for InMemoryCandidateStore {
    async fn append(&self, entry: &AuditEntry) -> Result<()> {
        self.audit.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

/// Backend whose every operation fails internally, as with an unreachable
/// Redis. The trait absorbs the failures, so gets are misses and writes are
/// no-ops.
pub struct FailingCache;

#[async_trait]
impl ResponseCache for FailingCache {
    async fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) {}

    async fn invalidate_prefix(&self, _prefix: &str) {}
}

/// Store whose queries always fail, for exercising the data-store error path.
pub struct BrokenStore;

#[async_trait]
impl CandidateStore for BrokenStore {
    async fn list(&self, _query: &ListQuery) -> Result<(Vec<Candidate>, i64)> {
        Err(candideval::Error::Internal("store is down".to_string()))
    }

    async fn get(&self, _id: i64) -> Result<Option<Candidate>> {
        Err(candideval::Error::Internal("store is down".to_string()))
    }

    async fn create(&self, _candidate: &NewCandidate) -> Result<i64> {
        Err(candideval::Error::Internal("store is down".to_string()))
    }

    async fn update(&self, _id: i64, _update: &CandidateUpdate) -> Result<bool> {
        Err(candideval::Error::Internal("store is down".to_string()))
    }

    async fn set_enabled(&self, _id: i64, _enabled: bool) -> Result<bool> {
        Err(candideval::Error::Internal("store is down".to_string()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryCandidateStore>,
    pub cache: Arc<InMemoryResponseCache>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(configure: impl FnOnce(&mut Config)) -> Self {
        let mut config = Config::default();
        configure(&mut config);

        let store = Arc::new(InMemoryCandidateStore::new());
        let cache = Arc::new(InMemoryResponseCache::new());
        let audit = AuditService::new(
            store.clone() as Arc<dyn AuditSink>,
            config.logging.audit.enabled,
        );
        let state = AppState::from_parts(
            config,
            store.clone() as Arc<dyn CandidateStore>,
            cache.clone() as Arc<dyn ResponseCache>,
            audit,
        );

        Self {
            router: create_router(state),
            store,
            cache,
        }
    }

    /// App wired to an arbitrary cache backend (e.g. [`FailingCache`]).
    pub fn with_cache(cache: Arc<dyn ResponseCache>) -> (Router, Arc<InMemoryCandidateStore>) {
        let config = Config::default();
        let store = Arc::new(InMemoryCandidateStore::new());
        let audit = AuditService::new(store.clone() as Arc<dyn AuditSink>, false);
        let state = AppState::from_parts(
            config,
            store.clone() as Arc<dyn CandidateStore>,
            cache,
            audit,
        );
        (create_router(state), store)
    }

    /// App wired to an arbitrary store (e.g. [`BrokenStore`]).
    pub fn with_store(store: Arc<dyn CandidateStore>) -> (Router, Arc<InMemoryResponseCache>) {
        let config = Config::default();
        let cache = Arc::new(InMemoryResponseCache::new());
        let state = AppState::from_parts(
            config,
            store,
            cache.clone() as Arc<dyn ResponseCache>,
            AuditService::disabled(),
        );
        (create_router(state), cache)
    }

    pub async fn request(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<serde_json::Value>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        dispatch(&self.router, method, path_and_query, body).await
    }
}

pub async fn dispatch(
    router: &Router,
    method: Method,
    path_and_query: &str,
    body: Option<serde_json::Value>,
) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path_and_query)
        .header("host", "example.org");

    let request = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            builder
                .body(Body::from(serde_json::to_vec(&json)?))
                .context("build request")?
        }
        None => builder.body(Body::empty()).context("build request")?,
    };

    let response = router
        .clone()
        .oneshot(request)
        .await
        .context("dispatch request")?;

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .context("read response body")?;

    Ok((status, headers, body))
}

/// Seed `n` candidates named Cand01..CandNN with increasing created_at.
pub fn seed_candidates(store: &InMemoryCandidateStore, n: usize) {
    for i in 1..=n {
        store.insert_seed(
            &format!("Cand{i:02}"),
            &format!("cand{i:02}@example.com"),
            None,
            i as i64,
        );
    }
}

pub fn parse_json(body: &Bytes) -> anyhow::Result<serde_json::Value> {
    serde_json::from_slice(body).context("parse response body as JSON")
}

/// Names of the returned candidates, in order.
pub fn data_names(body: &serde_json::Value) -> Vec<String> {
    body["data"]
        .as_array()
        .map(|rows| {
            rows.iter()
                .map(|row| row["name"].as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Audit emission is asynchronous; poll until `count` entries landed or a
/// short deadline passes.
pub async fn wait_for_audit(store: &InMemoryCandidateStore, count: usize) -> Vec<AuditEntry> {
    for _ in 0..100 {
        if store.audit_entries().len() >= count {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    store.audit_entries()
}
