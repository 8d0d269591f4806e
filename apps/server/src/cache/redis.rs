//! Redis response cache backend
//!
//! Uses a `ConnectionManager` so a dropped connection reconnects on its own.
//! Prefix invalidation walks the key space with incremental SCAN (bounded
//! batch) and deletes matches in batches, never blocking the server with an
//! unbounded enumeration.

use super::ResponseCache;
use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use std::time::Duration;

pub struct RedisResponseCache {
    conn: ConnectionManager,
    scan_batch: u64,
}

impl RedisResponseCache {
    /// Connect eagerly. The caller decides what to do when the backend is
    /// down at startup (the builder degrades to a no-op cache).
    pub async fn connect(url: &str, scan_batch: u64) -> anyhow::Result<Self> {
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(1)
            .set_connection_timeout(Duration::from_millis(500));

        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager_with_config(config).await?;

        Ok(Self { conn, scan_batch })
    }
}

#[async_trait]
impl ResponseCache for RedisResponseCache {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<Vec<u8>>>(key).await {
            Ok(value) => value,
            Err(e) => {
                // Fail open: an unreachable backend is a miss.
                tracing::warn!(%key, error = %e, "Redis GET failed, treating as miss");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) {
        let mut conn = self.conn.clone();
        let seconds = ttl.as_secs().max(1);
        if let Err(e) = conn.set_ex::<_, _, ()>(key, value, seconds).await {
            tracing::warn!(%key, error = %e, "Redis SET failed, response not cached");
        }
    }

    async fn invalidate_prefix(&self, prefix: &str) {
        let mut conn = self.conn.clone();
        let pattern = format!("{prefix}*");
        let mut cursor: u64 = 0;
        let mut deleted: usize = 0;

        loop {
            let batch: Result<(u64, Vec<String>), _> = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(self.scan_batch)
                .query_async(&mut conn)
                .await;

            match batch {
                Ok((next_cursor, keys)) => {
                    if !keys.is_empty() {
                        deleted += keys.len();
                        if let Err(e) = conn.del::<_, ()>(keys).await {
                            tracing::warn!(%prefix, error = %e, "Redis DEL failed during invalidation");
                        }
                    }
                    cursor = next_cursor;
                    if cursor == 0 {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(%prefix, error = %e, "Redis SCAN failed during invalidation");
                    break;
                }
            }
        }

        if deleted > 0 {
            tracing::info!(%prefix, deleted, "Invalidated cached listing responses");
        }
    }
}
