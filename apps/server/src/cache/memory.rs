//! In-process cache backends
//!
//! `InMemoryResponseCache` is a map with lazy TTL expiry, suitable for a
//! single instance running without Redis and as the test substitute.
//! `NoopCache` stores nothing; every request is a miss.

use super::ResponseCache;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry {
    expires_at: Instant,
    body: Vec<u8>,
}

#[derive(Default)]
pub struct InMemoryResponseCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.expires_at > now)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResponseCache for InMemoryResponseCache {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.body.clone()),
            Some(_) => {
                // Expired: equivalent to absent.
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key.to_string(),
            Entry {
                expires_at: Instant::now() + ttl,
                body: value.to_vec(),
            },
        );
    }

    async fn invalidate_prefix(&self, prefix: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|key, _| !key.starts_with(prefix));
    }
}

/// Backend used when caching is disabled or Redis is unreachable at startup.
pub struct NoopCache;

#[async_trait]
impl ResponseCache for NoopCache {
    async fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) {}

    async fn invalidate_prefix(&self, _prefix: &str) {}
}
