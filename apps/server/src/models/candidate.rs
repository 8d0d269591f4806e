//! Candidate entity and listing envelope types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A candidate row.
///
/// `tags` is stored as an opaque comma-joined blob; it participates in
/// full-text search but is never normalized into a set server-side.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub tags: Option<String>,
    pub resume_url: Option<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// Create payload. Name and email are required; everything else optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCandidate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub phone: Option<String>,
    pub tags: Option<String>,
    pub resume_url: Option<String>,
}

/// Full-update payload for PUT. Omitted optionals clear the column.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CandidateUpdate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub phone: Option<String>,
    pub tags: Option<String>,
    pub resume_url: Option<String>,
    pub enabled: bool,
}

/// Pagination metadata attached to every listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}

impl Pagination {
    /// `total_pages` is the ceiling of total/limit; zero rows means zero
    /// pages. The requested page is echoed even when it is out of range.
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

/// Listing envelope: a page of rows plus pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}
