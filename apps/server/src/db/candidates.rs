//! PostgreSQL candidate store
//!
//! The listing runs the count/fetch pair the planner describes: identical
//! predicates, no shared snapshot. Sort column and direction are
//! interpolated from the planner's allow-list enums only; every
//! client-supplied value is bound as a parameter.

use crate::{
    db::search::ListQuery,
    db::traits::{AuditEntry, AuditSink, CandidateStore},
    models::{Candidate, CandidateUpdate, NewCandidate},
    Result,
};
use async_trait::async_trait;
use sqlx::PgPool;

const CANDIDATE_COLUMNS: &str =
    "id, name, email, phone, tags, resume_url, enabled, created_at";

#[derive(Clone)]
pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    async fn list(&self, query: &ListQuery) -> Result<(Vec<Candidate>, i64)> {
        let order_col = query.sort_by.as_str();
        let order_dir = query.sort_order.as_str();

        match query.tsquery() {
            Some(tsquery) => {
                let count_sql = "SELECT COUNT(id) FROM candidates \
                     WHERE search_tsv @@ to_tsquery('simple', $1)";
                let data_sql = format!(
                    "SELECT {CANDIDATE_COLUMNS} FROM candidates \
                     WHERE search_tsv @@ to_tsquery('simple', $1) \
                     ORDER BY {order_col} {order_dir} LIMIT $2 OFFSET $3"
                );

                let total: i64 = sqlx::query_scalar(count_sql)
                    .bind(&tsquery)
                    .fetch_one(&self.pool)
                    .await?;

                let rows = sqlx::query_as::<_, Candidate>(&data_sql)
                    .bind(&tsquery)
                    .bind(query.limit)
                    .bind(query.offset())
                    .fetch_all(&self.pool)
                    .await?;

                Ok((rows, total))
            }
            None => {
                let count_sql = "SELECT COUNT(id) FROM candidates";
                let data_sql = format!(
                    "SELECT {CANDIDATE_COLUMNS} FROM candidates \
                     ORDER BY {order_col} {order_dir} LIMIT $1 OFFSET $2"
                );

                let total: i64 = sqlx::query_scalar(count_sql)
                    .fetch_one(&self.pool)
                    .await?;

                let rows = sqlx::query_as::<_, Candidate>(&data_sql)
                    .bind(query.limit)
                    .bind(query.offset())
                    .fetch_all(&self.pool)
                    .await?;

                Ok((rows, total))
            }
        }
    }

    async fn get(&self, id: i64) -> Result<Option<Candidate>> {
        let sql = format!("SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE id = $1");
        let row = sqlx::query_as::<_, Candidate>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn create(&self, candidate: &NewCandidate) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO candidates (name, email, phone, tags, resume_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&candidate.name)
        .bind(&candidate.email)
        .bind(&candidate.phone)
        .bind(&candidate.tags)
        .bind(&candidate.resume_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, id: i64, update: &CandidateUpdate) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE candidates \
             SET name = $1, email = $2, phone = $3, tags = $4, resume_url = $5, enabled = $6 \
             WHERE id = $7",
        )
        .bind(&update.name)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(&update.tags)
        .bind(&update.resume_url)
        .bind(update.enabled)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_enabled(&self, id: i64, enabled: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE candidates SET enabled = $1 WHERE id = $2")
            .bind(enabled)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AuditSink for PgCandidateStore {
    async fn append(&self, entry: &AuditEntry) -> Result<()> {
        sqlx::query(
            "INSERT INTO audit_log (interaction, source, request_id, query) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&entry.interaction)
        .bind(entry.source.as_str())
        .bind(&entry.request_id)
        .bind(&entry.query)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
