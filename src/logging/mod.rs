//! Logging and observability
//!
//! Structured logging on `tracing` with every sink wrapped in a
//! [`SanitizingMakeWriter`]:
//! - Console output on stderr
//! - Optional JSON file logging with rotation
//! - Helpers for rendering error chains and backtraces safely
//!
//! # Example
//!
//! ```no_run
//! use phi_guard::config::LoggingConfig;
//! use phi_guard::logging::init_logging;
//! use phi_guard::sanitization::{Sanitizer, SanitizerConfig};
//! use std::sync::Arc;
//!
//! let sanitizer = Arc::new(Sanitizer::new(SanitizerConfig::default()).unwrap());
//! let _guard = init_logging("info", &LoggingConfig::default(), sanitizer)
//!     .expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod chain;
pub mod structured;
pub mod writer;

pub use chain::{sanitize_anyhow, sanitize_backtrace, sanitize_error_chain};
pub use structured::{init_logging, parse_log_level, LoggingGuard};
pub use writer::{SanitizingMakeWriter, SanitizingWriter};

/// Log an error with context
///
/// The error is rendered with its `Display` implementation; the output
/// still passes through the sanitizing writer.
///
/// # Example
///
/// ```no_run
/// use phi_guard::log_error_with_context;
/// use phi_guard::domain::PhiGuardError;
///
/// let error = PhiGuardError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
