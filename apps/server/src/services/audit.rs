//! Audit trail for listing accesses.
//!
//! Every listing access appends an `audit_log` row recording whether it was
//! served from the cache or by the query planner. Emission is best-effort
//! and must not fail or delay the read path: entries go through a bounded
//! channel to a background writer, and persistence failures are logged only.

use crate::db::traits::{AuditEntry, AuditSink};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct AuditService {
    sender: Option<mpsc::Sender<AuditEntry>>,
}

impl AuditService {
    pub fn new(sink: Arc<dyn AuditSink>, enabled: bool) -> Self {
        if !enabled {
            return Self::disabled();
        }

        let (sender, mut receiver) = mpsc::channel::<AuditEntry>(2048);

        tokio::spawn(async move {
            while let Some(entry) = receiver.recv().await {
                if let Err(e) = sink.append(&entry).await {
                    tracing::warn!("Failed to persist audit_log row: {}", e);
                }
            }
        });

        tracing::info!("Audit logging initialized (audit_log)");

        Self {
            sender: Some(sender),
        }
    }

    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Queue an entry. Never blocks; a full channel drops the entry with a
    /// warning rather than stalling the request.
    pub fn record(&self, entry: AuditEntry) {
        if let Some(sender) = &self.sender {
            if let Err(e) = sender.try_send(entry) {
                tracing::warn!("Audit channel full, dropping entry: {}", e);
            }
        }
    }
}
