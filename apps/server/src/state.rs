//! Shared application state

use crate::{
    cache::{self, ResponseCache},
    config::Config,
    db::{self, CandidateStore, PgCandidateStore},
    services::AuditService,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn CandidateStore>,
    pub cache: Arc<dyn ResponseCache>,
    pub audit: AuditService,
}

impl AppState {
    /// Wire up the production state: PostgreSQL pool (with migrations when
    /// configured), the configured cache backend, and the audit trail.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let pool = db::connect_pool(&config.database).await?;

        if config.database.run_migrations {
            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations applied");
        }

        let store = PgCandidateStore::new(pool);
        let cache = cache::build(&config.cache).await;
        let audit = AuditService::new(Arc::new(store.clone()), config.logging.audit.enabled);

        Ok(Self::from_parts(config, Arc::new(store), cache, audit))
    }

    /// Assemble state from explicit collaborators. Tests inject in-memory
    /// substitutes through here.
    pub fn from_parts(
        config: Config,
        store: Arc<dyn CandidateStore>,
        cache: Arc<dyn ResponseCache>,
        audit: AuditService,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            cache,
            audit,
        }
    }
}
