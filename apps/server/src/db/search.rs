//! Listing query planner.
//!
//! Turns untrusted client parameters into a validated `ListQuery`:
//! - sort column checked against a fixed allow-list (identifiers cannot be
//!   bound as SQL parameters, so only allow-listed names ever reach SQL)
//! - sort direction normalized to ASC/DESC
//! - page/limit coerced and clamped
//! - free-text search tokenized into required prefix terms
//!
//! Unrecognized or unparseable values fall back to defaults silently; the
//! planner never rejects a listing request.

use serde::Deserialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Raw, untrusted listing parameters as they arrive on the query string.
/// Everything is a string; coercion happens in [`ListQuery::from_params`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
    pub search: Option<String>,
}

/// Columns the listing may sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Name,
    Email,
    CreatedAt,
}

impl SortColumn {
    /// Allow-list lookup. Anything unrecognized becomes the default column.
    pub fn parse(value: &str) -> Self {
        match value {
            "name" => Self::Name,
            "email" => Self::Email,
            "created_at" => Self::CreatedAt,
            _ => Self::CreatedAt,
        }
    }

    /// The SQL identifier. Only these fixed strings are ever interpolated
    /// into a query.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Case-insensitive "asc" sorts ascending; anything else descending.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A validated listing query, safe to execute against any candidate store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: i64,
    pub limit: i64,
    pub sort_by: SortColumn,
    pub sort_order: SortOrder,
    /// Sanitized search terms; each is a required prefix match.
    pub terms: Vec<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort_by: SortColumn::CreatedAt,
            sort_order: SortOrder::Desc,
            terms: Vec::new(),
        }
    }
}

impl ListQuery {
    pub fn from_params(params: &ListingParams) -> Self {
        let page = coerce(params.page.as_deref(), DEFAULT_PAGE).max(1);
        let limit = coerce(params.limit.as_deref(), DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

        let sort_by = params
            .sort_by
            .as_deref()
            .map(SortColumn::parse)
            .unwrap_or(SortColumn::CreatedAt);
        let sort_order = params
            .sort_order
            .as_deref()
            .map(SortOrder::parse)
            .unwrap_or(SortOrder::Desc);

        let terms = params
            .search
            .as_deref()
            .map(tokenize)
            .unwrap_or_default();

        Self {
            page,
            limit,
            sort_by,
            sort_order,
            terms,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Boolean-mode full-text query string: every term required, prefix
    /// matched. `None` when there is nothing to search for, in which case
    /// the whole table is eligible.
    pub fn tsquery(&self) -> Option<String> {
        if self.terms.is_empty() {
            return None;
        }
        let joined = self
            .terms
            .iter()
            .map(|t| format!("{t}:*"))
            .collect::<Vec<_>>()
            .join(" & ");
        Some(joined)
    }
}

fn coerce(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

/// Split on whitespace and strip characters that carry meaning inside a
/// tsquery. Terms emptied by stripping are dropped; an all-stripped search
/// degrades to an unfiltered listing.
fn tokenize(search: &str) -> Vec<String> {
    search
        .split_whitespace()
        .filter_map(|raw| {
            let term: String = raw
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '_' | '-'))
                .collect();
            if term.is_empty() {
                None
            } else {
                Some(term)
            }
        })
        .collect()
}
