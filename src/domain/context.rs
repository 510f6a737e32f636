//! Error context extension trait
//!
//! Provides `.context()` and `.with_context()` for `Result<T, PhiGuardError>`,
//! in the spirit of `anyhow::Context`, so library code can add context while
//! keeping the domain error type.
//!
//! ```rust
//! use phi_guard::domain::Result;
//! use phi_guard::domain::context::ResultExt;
//!
//! fn read_patterns(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_context(|| format!("Failed to read pattern file: {}", path))
//! }
//! # let _ = read_patterns;
//! ```

use crate::domain::errors::PhiGuardError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error (eagerly evaluated)
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazily evaluated)
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PhiGuardError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| wrap(e.into(), context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

/// Keeps the variant for configuration and sanitization failures so callers
/// can still match on them after context has been added.
fn wrap<C: std::fmt::Display>(base: PhiGuardError, context: C) -> PhiGuardError {
    match base {
        PhiGuardError::Configuration(msg) => {
            PhiGuardError::Configuration(format!("{context}: {msg}"))
        }
        PhiGuardError::Sanitization(msg) => {
            PhiGuardError::Sanitization(format!("{context}: {msg}"))
        }
        other => PhiGuardError::Other(format!("{context}: {other}")),
    }
}
