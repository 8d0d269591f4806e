//! Database layer - pool construction, repositories, and the planner

pub mod candidates;
pub mod search;
pub mod traits;

pub use candidates::PgCandidateStore;
pub use search::{ListQuery, ListingParams, SortColumn, SortOrder};
pub use traits::{AccessSource, AuditEntry, AuditSink, CandidateStore};

use crate::config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

/// Build the connection pool from configuration.
pub async fn connect_pool(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .min_connections(config.pool_min_size)
        .max_connections(config.pool_max_size)
        .acquire_timeout(Duration::from_secs(config.pool_timeout_seconds))
        .connect(&config.url)
        .await?;

    Ok(pool)
}

/// Apply pending migrations.
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
