//! PHI detection and sanitization
//!
//! Components, leaf to root:
//!
//! - [`detector::patterns::PatternCatalog`] - compiled, priority-ordered patterns
//! - [`detector::code_context`] - structural detectors for code/config text
//! - [`detector::MatchEngine`] - sensitivity gating and false-positive filtering
//! - [`resolver`] - deterministic overlap resolution
//! - [`redaction`] - full, partial and hash strategies
//! - [`Sanitizer`] - recursion, size limits and the fail-closed policy

pub mod config;
pub mod detector;
pub mod engine;
pub mod models;
pub mod redaction;
pub mod report;
pub mod resolver;

pub use config::{RedactionMode, SanitizerConfig, SanitizerConfigBuilder, Sensitivity};
pub use detector::patterns::{MatcherKind, PatternCatalog, PatternDefinition};
pub use detector::{MatchEngine, PhiDetector};
pub use engine::{Sanitizer, DEPTH_MARKER, ERROR_MARKER, SENSITIVE_FIELD_SOURCE, TRUNCATION_MARKER};
pub use models::{CandidateSpan, PhiCategory, ResolvedSpan, SanitizableValue, Scalar};
pub use report::DetectionReport;
