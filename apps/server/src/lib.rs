//! Candideval ATS backend - Rust implementation
//!
//! An applicant tracking backend built around:
//! - Candidate CRUD with soft-delete (enable/disable)
//! - A filtered, paginated, full-text-searchable listing endpoint
//! - A read-through response cache with prefix invalidation
//! - Best-effort audit logging of listing accesses

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod request_context;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
