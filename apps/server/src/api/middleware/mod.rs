//! HTTP middleware

pub mod cache;
pub mod layers;
pub mod request_id;

pub use cache::response_cache_middleware;
pub use layers::{compression, cors};
pub use request_id::request_id_middleware;
