// phi-guard - PHI detection and redaction
// Copyright (c) 2025 phi-guard Contributors
// Licensed under the MIT License

//! # phi-guard - PHI detection and sanitization
//!
//! phi-guard finds Protected Health Information (PHI) in free text, log lines
//! and nested structured values, and replaces it with redaction output before
//! the data leaves the process.
//!
//! ## Overview
//!
//! This library provides:
//! - **Detecting** PHI with a prioritized, immutable pattern catalog plus
//!   structural code-context detectors (assignments, map entries, comments)
//! - **Resolving** overlapping matches so every character is redacted at most once
//! - **Redacting** with full, partial or salted-hash output
//! - **Failing closed**: internal errors yield a marker, never the original value
//! - **Scrubbing logs** through a `tracing_subscriber` writer
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`sanitization`] - Catalog, detectors, resolver, redaction and the sanitizer
//! - [`domain`] - Error types and shared context helpers
//! - [`config`] - Configuration management
//! - [`logging`] - Sanitized structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use phi_guard::sanitization::{Sanitizer, SanitizerConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sanitizer = Sanitizer::new(SanitizerConfig::default())?;
//!
//! let clean = sanitizer.sanitize_text("reach me at jane@example.org")?;
//! assert_eq!(clean, "reach me at [EMAIL]");
//! # Ok(())
//! # }
//! ```
//!
//! ## Structured values
//!
//! ```rust
//! use phi_guard::sanitization::{Sanitizer, SanitizerConfig};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sanitizer = Sanitizer::new(SanitizerConfig::default())?;
//! let clean = sanitizer.sanitize_json(json!({"patient": {"email": "a@b.com", "age": 45}}))?;
//! assert_eq!(clean, json!({"patient": {"email": "[EMAIL]", "age": 45}}));
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! ```rust,no_run
//! use phi_guard::config::LoggingConfig;
//! use phi_guard::logging::init_logging;
//! use phi_guard::sanitization::{Sanitizer, SanitizerConfig};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sanitizer = Arc::new(Sanitizer::new(SanitizerConfig::default())?);
//! let _guard = init_logging("info", &LoggingConfig::default(), sanitizer)?;
//!
//! tracing::info!("patient ssn 123-45-6789 admitted"); // written as "[SSN]"
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
pub mod sanitization;
