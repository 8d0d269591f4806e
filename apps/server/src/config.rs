//! Application configuration
//!
//! Configuration is layered: an optional `config.toml` file, then environment
//! variables prefixed with `ATS_` (e.g. `ATS_SERVER__PORT=8080`). Every field
//! has a default so the server starts with no configuration at all.

use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty means no CORS headers are emitted.
    pub cors_origins: Vec<String>,
    /// Maximum accepted request body size in bytes.
    pub max_request_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: Vec::new(),
            max_request_body_size: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_min_size: u32,
    pub pool_max_size: u32,
    pub pool_timeout_seconds: u64,
    /// Run pending sqlx migrations at startup.
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/ats_db".to_string(),
            pool_min_size: 0,
            pool_max_size: 10,
            pool_timeout_seconds: 30,
            run_migrations: true,
        }
    }
}

/// Which response-cache backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// External Redis instance (the production default).
    Redis,
    /// In-process map. Suitable for a single instance without Redis.
    Memory,
    /// No caching; every listing request is a miss.
    Disabled,
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheBackend::Redis => write!(f, "redis"),
            CacheBackend::Memory => write!(f, "memory"),
            CacheBackend::Disabled => write!(f, "disabled"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub url: String,
    /// Time-to-live for cached listing responses, fixed at route registration.
    pub ttl_seconds: u64,
    /// SCAN batch size used during prefix invalidation.
    pub scan_batch_size: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Redis,
            url: "redis://127.0.0.1:6379".to_string(),
            ttl_seconds: 300,
            scan_batch_size: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,
    pub file_enabled: bool,
    pub file_directory: String,
    pub file_prefix: String,
    /// One of: daily, hourly, minutely, never.
    pub file_rotation: String,
    pub audit: AuditConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_enabled: false,
            file_directory: "logs".to_string(),
            file_prefix: "ats-server".to_string(),
            file_rotation: "daily".to_string(),
            audit: AuditConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Record an audit_log row for every listing access (hit or miss).
    pub enabled: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Load configuration from `config.toml` (optional) and `ATS_`-prefixed
    /// environment variables. Environment wins over the file.
    pub fn load() -> anyhow::Result<Self> {
        // Pull in a .env file when present; ignore a missing one.
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("ATS").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Check invariants that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.database.pool_max_size == 0 {
            return Err("database.pool_max_size must be at least 1".to_string());
        }
        if self.database.pool_min_size > self.database.pool_max_size {
            return Err("database.pool_min_size exceeds pool_max_size".to_string());
        }
        if self.cache.ttl_seconds == 0 {
            return Err("cache.ttl_seconds must be at least 1".to_string());
        }
        if self.cache.scan_batch_size == 0 {
            return Err("cache.scan_batch_size must be at least 1".to_string());
        }
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(format!("unknown logging.level: {other}")),
        }
        match self.logging.file_rotation.as_str() {
            "daily" | "hourly" | "minutely" | "never" => {}
            other => return Err(format!("unknown logging.file_rotation: {other}")),
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("invalid listen address {addr}: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache.ttl_seconds, 300);
        assert_eq!(config.cache.backend, CacheBackend::Redis);
    }

    #[test]
    fn rejects_zero_ttl() {
        let mut config = Config::default();
        config.cache.ttl_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unknown_rotation() {
        let mut config = Config::default();
        config.logging.file_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }
}
