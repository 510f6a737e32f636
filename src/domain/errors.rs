//! Domain error types
//!
//! This module defines the error hierarchy for phi-guard. Errors never carry
//! matched text or input values: only pattern names, categories, offsets and
//! lengths, so an error message can itself be logged safely.

use thiserror::Error;

/// Main phi-guard error type
///
/// Three of the variants map to recoverable conditions handled inside the
/// engine (pattern compilation, redaction template, runtime sanitization).
/// They are still part of the public type so strict callers and diagnostics
/// can observe them.
#[derive(Debug, Error)]
pub enum PhiGuardError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A pattern definition whose matcher body could not be compiled
    #[error("Failed to compile pattern '{name}': {reason}")]
    PatternCompile { name: String, reason: String },

    /// A redaction marker template that lacks the category placeholder
    #[error("Invalid redaction template '{template}': missing '{placeholder}' placeholder")]
    InvalidRedactionTemplate {
        template: String,
        placeholder: &'static str,
    },

    /// Unexpected failure while scanning or redacting one value
    #[error("Sanitization failed: {0}")]
    Sanitization(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl PhiGuardError {
    /// Creates a sanitization runtime error
    pub fn sanitization(message: impl Into<String>) -> Self {
        Self::Sanitization(message.into())
    }

    /// Whether the engine recovers from this error on its own
    ///
    /// Pattern compile and template errors are corrected at construction
    /// time; everything else is surfaced to the caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PatternCompile { .. } | Self::InvalidRedactionTemplate { .. }
        )
    }
}

impl From<std::io::Error> for PhiGuardError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PhiGuardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for PhiGuardError {
    fn from(err: toml::de::Error) -> Self {
        Self::Configuration(format!("Failed to parse TOML: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_compile_display() {
        let err = PhiGuardError::PatternCompile {
            name: "broken".to_string(),
            reason: "unclosed group".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to compile pattern 'broken': unclosed group"
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_template_error_display() {
        let err = PhiGuardError::InvalidRedactionTemplate {
            template: "[REDACTED]".to_string(),
            placeholder: "{category}",
        };
        assert!(err.to_string().contains("{category}"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_runtime_error_not_recoverable() {
        let err = PhiGuardError::sanitization("span out of bounds");
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "Sanitization failed: span out of bounds");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PhiGuardError = io_error.into();
        assert!(matches!(err, PhiGuardError::Io(_)));
    }
}
