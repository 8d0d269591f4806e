//! Logging initialization for the ATS server binaries
//!
//! Provides configuration-based logging with JSON formatting, file rotation,
//! and environment variable overrides.

use std::fs;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Guard that keeps the non-blocking file writer alive.
/// Must be kept alive for the duration of the program.
pub struct LogGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Initialize logging with full configuration support
///
/// This function sets up logging based on the provided `LoggingConfig`, supporting:
/// - JSON or human-readable formats
/// - File logging with rotation (daily, hourly, minutely, never)
/// - Environment variable overrides via `RUST_LOG`
///
/// Returns a `LogGuard` that must be kept alive for the program duration so
/// buffered file output is flushed.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LogGuard> {
    let env_filter = build_env_filter(config);
    let subscriber = tracing_subscriber::registry().with(env_filter);

    let file_guard = if config.json {
        init_json_logging_with_subscriber(subscriber, config)?
    } else {
        init_human_logging_with_subscriber(subscriber, config)?
    };

    tracing::info!(
        level = %config.level,
        json = config.json,
        "Logging initialized"
    );

    Ok(LogGuard {
        _file_guard: file_guard,
    })
}

/// Build environment filter
fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Suppress verbose PostgreSQL/sqlx debug logs by default
        EnvFilter::new(format!(
            "candideval={},ats_server={},tower_http=debug,sqlx=warn",
            config.level, config.level
        ))
    })
}

/// Initialize JSON logging with a pre-configured subscriber
fn init_json_logging_with_subscriber<S>(
    subscriber: S,
    config: &LoggingConfig,
) -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>>
where
    S: SubscriberExt + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    let console_layer = fmt::layer().json().with_writer(std::io::stdout);

    if config.file_enabled {
        let (file_appender, file_guard) = create_file_appender(config)?;
        let file_layer = fmt::layer().json().with_writer(file_appender);

        subscriber.with(console_layer).with(file_layer).init();
        Ok(Some(file_guard))
    } else {
        subscriber.with(console_layer).init();
        Ok(None)
    }
}

/// Initialize human-readable logging with a pre-configured subscriber
fn init_human_logging_with_subscriber<S>(
    subscriber: S,
    config: &LoggingConfig,
) -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>>
where
    S: SubscriberExt + for<'a> tracing_subscriber::registry::LookupSpan<'a> + Send + Sync,
{
    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stdout);

    if config.file_enabled {
        let (file_appender, file_guard) = create_file_appender(config)?;
        let file_layer = fmt::layer()
            .with_target(true)
            .with_ansi(false) // No ANSI colors in files
            .with_writer(file_appender);

        subscriber.with(console_layer).with(file_layer).init();
        Ok(Some(file_guard))
    } else {
        subscriber.with(console_layer).init();
        Ok(None)
    }
}

/// Create file appender with rotation
fn create_file_appender(
    config: &LoggingConfig,
) -> anyhow::Result<(
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
)> {
    // Create log directory if it doesn't exist
    fs::create_dir_all(&config.file_directory)?;

    let file_appender = match config.file_rotation.as_str() {
        "daily" => tracing_appender::rolling::daily(&config.file_directory, &config.file_prefix),
        "hourly" => tracing_appender::rolling::hourly(&config.file_directory, &config.file_prefix),
        "minutely" => {
            tracing_appender::rolling::minutely(&config.file_directory, &config.file_prefix)
        }
        "never" => tracing_appender::rolling::never(
            &config.file_directory,
            format!("{}.log", config.file_prefix),
        ),
        _ => tracing_appender::rolling::daily(&config.file_directory, &config.file_prefix),
    };

    // Use non-blocking writer to avoid blocking on I/O
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    Ok((non_blocking, guard))
}
