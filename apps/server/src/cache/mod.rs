//! Response cache layer
//!
//! A read-through cache for the candidate listing, modeled as an injected
//! collaborator so the HTTP layer never knows which backend is behind it.
//! Every method is infallible at the call site: backend failures are logged
//! and absorbed, a failed `get` is a miss, a failed `set` or
//! `invalidate_prefix` is a no-op. The serving path stays fully functional
//! with the cache down.

pub mod memory;
pub mod redis;

pub use memory::{InMemoryResponseCache, NoopCache};
pub use redis::RedisResponseCache;

use crate::config::{CacheBackend, CacheConfig};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Prefix shared by every cached response for the candidate listing family.
/// Writers invalidate this prefix.
pub const CANDIDATE_LIST_PREFIX: &str = "cache:/api/candidates";

/// Cache key for a listing response: the namespace plus the verbatim request
/// path and query string. Keys are order-sensitive on purpose; two requests
/// differing only in parameter order are unrelated entries.
pub fn response_key(path_and_query: &str) -> String {
    format!("cache:{path_and_query}")
}

/// Key-value store holding serialized response bodies with a TTL.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Fetch a stored body. A backend failure is a miss.
    async fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Store a body with an expiry. Failures are logged, never surfaced.
    async fn set(&self, key: &str, value: &[u8], ttl: Duration);

    /// Delete every key starting with `prefix`, scanning incrementally so a
    /// large key space never blocks the backend. Failures are logged only;
    /// the write that triggered the invalidation has already succeeded.
    async fn invalidate_prefix(&self, prefix: &str);
}

/// Select and connect the configured backend.
///
/// A Redis backend that cannot be reached at startup degrades to the no-op
/// backend instead of failing the server: fail-open extends to boot.
pub async fn build(config: &CacheConfig) -> Arc<dyn ResponseCache> {
    match config.backend {
        CacheBackend::Redis => {
            match RedisResponseCache::connect(&config.url, config.scan_batch_size).await {
                Ok(cache) => {
                    tracing::info!(url = %config.url, "Connected to Redis");
                    Arc::new(cache)
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Redis unavailable at startup, serving without a response cache"
                    );
                    Arc::new(NoopCache)
                }
            }
        }
        CacheBackend::Memory => Arc::new(InMemoryResponseCache::new()),
        CacheBackend::Disabled => Arc::new(NoopCache),
    }
}
