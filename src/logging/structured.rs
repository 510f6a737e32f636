//! Structured logging setup using tracing
//!
//! Console output and the optional JSON rolling file both write through a
//! [`SanitizingMakeWriter`], so every rendered line is scrubbed before it
//! leaves the process.

use super::writer::SanitizingMakeWriter;
use crate::config::LoggingConfig;
use crate::domain::errors::PhiGuardError;
use crate::domain::Result;
use crate::sanitization::Sanitizer;
use std::sync::Arc;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Guard that must be kept alive for the duration of the program
/// to ensure logs are flushed properly
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

impl LoggingGuard {
    fn new(file_guard: Option<WorkerGuard>) -> Self {
        Self {
            _file_guard: file_guard,
        }
    }
}

/// Initialize the logging system
///
/// # Arguments
///
/// * `log_level_str` - Log level as a string (trace, debug, info, warn, error)
/// * `config` - Logging configuration
/// * `sanitizer` - Applied to every rendered line on every sink
///
/// # Errors
///
/// Returns an error for an unknown level, an unknown rotation, an unwritable
/// log directory, or when a global subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// use phi_guard::config::LoggingConfig;
/// use phi_guard::logging::init_logging;
/// use phi_guard::sanitization::{Sanitizer, SanitizerConfig};
/// use std::sync::Arc;
///
/// let sanitizer = Arc::new(Sanitizer::new(SanitizerConfig::default()).unwrap());
/// let _guard = init_logging("info", &LoggingConfig::default(), sanitizer)
///     .expect("Failed to initialize logging");
/// tracing::info!("never logs jane@example.org in clear");
/// ```
pub fn init_logging(
    log_level_str: &str,
    config: &LoggingConfig,
    sanitizer: Arc<Sanitizer>,
) -> Result<LoggingGuard> {
    let log_level = parse_log_level(log_level_str)?;

    // EnvFilter is not Clone; each layer gets its own.
    let env_filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("phi_guard={log_level}")))
    };

    let mut layers = Vec::new();

    if config.console_enabled {
        let console_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(SanitizingMakeWriter::new(
                std::io::stderr,
                Arc::clone(&sanitizer),
            ))
            .with_filter(env_filter());
        layers.push(console_layer.boxed());
    }

    let file_guard = if config.local_enabled {
        let rotation = parse_rotation(&config.local_rotation)?;

        std::fs::create_dir_all(&config.local_path).map_err(|e| {
            PhiGuardError::Configuration(format!(
                "Failed to create log directory {}: {e}",
                config.local_path
            ))
        })?;

        let file_appender =
            RollingFileAppender::new(rotation, &config.local_path, &config.local_file_prefix);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(SanitizingMakeWriter::new(non_blocking, Arc::clone(&sanitizer)))
            .with_filter(env_filter());

        layers.push(file_layer.boxed());
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| PhiGuardError::Configuration(format!("Failed to install logger: {e}")))?;

    tracing::info!(
        console_enabled = config.console_enabled,
        local_enabled = config.local_enabled,
        local_path = %config.local_path,
        "Logging initialized"
    );

    Ok(LoggingGuard::new(file_guard))
}

/// Parse log level from string
pub fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(PhiGuardError::Configuration(format!(
            "Invalid log level: {level_str}. Must be one of: trace, debug, info, warn, error"
        ))),
    }
}

fn parse_rotation(rotation: &str) -> Result<Rotation> {
    match rotation.to_lowercase().as_str() {
        "daily" => Ok(Rotation::DAILY),
        "hourly" => Ok(Rotation::HOURLY),
        "never" => Ok(Rotation::NEVER),
        _ => Err(PhiGuardError::Configuration(format!(
            "Invalid log rotation: {rotation}. Must be one of: daily, hourly, never"
        ))),
    }
}
