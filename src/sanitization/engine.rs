//! Main sanitization engine
//!
//! [`Sanitizer`] orchestrates detection, overlap resolution and redaction,
//! recurses over composite values and enforces the fail-closed error policy:
//! no failure path hands back the unredacted original.
//!
//! # Examples
//!
//! ```rust
//! use phi_guard::sanitization::{Sanitizer, SanitizerConfig};
//!
//! let sanitizer = Sanitizer::new(SanitizerConfig::default()).unwrap();
//! let clean = sanitizer
//!     .sanitize_text("Reach me at jane.doe@example.com")
//!     .unwrap();
//! assert_eq!(clean, "Reach me at [EMAIL]");
//! ```

use crate::domain::errors::PhiGuardError;
use crate::domain::result::Result;
use crate::sanitization::config::SanitizerConfig;
use crate::sanitization::detector::patterns::{PatternCatalog, PatternDefinition};
use crate::sanitization::detector::{MatchEngine, PhiDetector};
use crate::sanitization::detector::code_context::CODE_CONTEXT_PRIORITY;
use crate::sanitization::models::{CandidateSpan, PhiCategory, ResolvedSpan, SanitizableValue};
use crate::sanitization::redaction::{self, RedactionStrategy};
use crate::sanitization::report::DetectionReport;
use crate::sanitization::resolver;
use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

/// Substituted for any value whose sanitization failed
pub const ERROR_MARKER: &str = "[SANITIZATION ERROR]";

/// Substituted for text longer than `max_input_size_bytes`
pub const TRUNCATION_MARKER: &str = "[TRUNCATED: INPUT TOO LARGE]";

/// Substituted for containers nested deeper than `max_depth`
pub const DEPTH_MARKER: &str = "[TRUNCATED: MAX DEPTH EXCEEDED]";

/// Source name reported for values redacted because of their field name
pub const SENSITIVE_FIELD_SOURCE: &str = "sensitive_field";

/// PHI sanitizer
///
/// Immutable after construction; share it across threads with `Arc`.
pub struct Sanitizer {
    config: SanitizerConfig,
    catalog: Arc<PatternCatalog>,
    detector: Arc<dyn PhiDetector>,
    strategy: Box<dyn RedactionStrategy>,
}

impl Sanitizer {
    /// Sanitizer over the built-in patterns
    pub fn new(config: SanitizerConfig) -> Result<Self> {
        Self::with_patterns(config, Vec::new())
    }

    /// Sanitizer over the built-in patterns plus `custom`
    ///
    /// # Errors
    ///
    /// Fails only when the configuration is invalid or the embedded pattern
    /// library cannot be parsed. Individual patterns that fail to compile are
    /// dropped with a warning.
    pub fn with_patterns(config: SanitizerConfig, custom: Vec<PatternDefinition>) -> Result<Self> {
        let catalog = Arc::new(PatternCatalog::with_defaults(custom)?);
        let detector = Arc::new(MatchEngine::new(Arc::clone(&catalog)));
        Self::assemble(config, catalog, detector)
    }

    /// Sanitizer driven by a caller-supplied detector
    pub fn with_detector(config: SanitizerConfig, detector: Arc<dyn PhiDetector>) -> Result<Self> {
        let catalog = Arc::new(PatternCatalog::with_defaults(Vec::new())?);
        Self::assemble(config, catalog, detector)
    }

    fn assemble(
        mut config: SanitizerConfig,
        catalog: Arc<PatternCatalog>,
        detector: Arc<dyn PhiDetector>,
    ) -> Result<Self> {
        config.normalize();
        config.validate().map_err(PhiGuardError::Validation)?;
        let strategy = redaction::for_config(&config);

        tracing::info!(
            patterns = catalog.len(),
            dropped = catalog.dropped().len(),
            sensitivity = %config.sensitivity,
            mode = %config.redaction_mode,
            strict = config.allow_exceptions_to_propagate,
            "Sanitizer initialized"
        );

        Ok(Self {
            config,
            catalog,
            detector,
            strategy,
        })
    }

    pub fn config(&self) -> &SanitizerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Sanitize a value of any shape
    ///
    /// Returns a value of the same shape, except where a documented marker
    /// replaces a subtree.
    ///
    /// # Errors
    ///
    /// Only in strict mode (`allow_exceptions_to_propagate`); otherwise
    /// failures are replaced by [`ERROR_MARKER`].
    pub fn sanitize(&self, value: &SanitizableValue) -> Result<SanitizableValue> {
        if !self.config.enabled {
            return Ok(value.clone());
        }
        self.guard_node(value, 0, None)
    }

    /// Sanitize free text
    pub fn sanitize_text(&self, text: &str) -> Result<String> {
        if !self.config.enabled {
            return Ok(text.to_string());
        }
        self.guard_text(text, None)
    }

    /// Sanitize text known to belong to field `name`
    ///
    /// Values of configured sensitive fields are redacted wholesale without
    /// scanning.
    pub fn sanitize_field(&self, name: &str, text: &str) -> Result<String> {
        if !self.config.enabled {
            return Ok(text.to_string());
        }
        self.guard_text(text, self.forced_category(name))
    }

    /// Sanitize a JSON document
    pub fn sanitize_json(&self, value: Value) -> Result<Value> {
        let value = SanitizableValue::from(value);
        self.sanitize(&value).map(Value::from)
    }

    /// Resolved spans for `text` without redacting
    ///
    /// Oversized text yields no spans.
    pub fn analyze(&self, text: &str) -> Result<Vec<ResolvedSpan>> {
        if text.len() > self.config.max_input_size_bytes {
            return Ok(Vec::new());
        }
        match panic::catch_unwind(AssertUnwindSafe(|| self.resolve_text(text))) {
            Ok(result) => result,
            Err(_) => Err(PhiGuardError::sanitization("detector panicked")),
        }
    }

    /// Dry-run report over several inputs
    pub fn report<'a, I>(&self, inputs: I) -> Result<DetectionReport>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut report = DetectionReport::new();
        if !self.config.enabled {
            report.add_warning("Sanitizer is disabled; nothing would be redacted".to_string());
        }
        for text in inputs {
            self.report_text(text, None, &mut report)?;
        }
        self.add_catalog_warnings(&mut report);
        Ok(report)
    }

    /// Dry-run report over a structured value
    ///
    /// Walks the value the way [`Sanitizer::sanitize`] does, so sensitive
    /// field names, mapping keys, the nesting switch and the depth cap are
    /// reflected in the counts. Each text leaf counts as one input.
    pub fn report_value(&self, value: &SanitizableValue) -> Result<DetectionReport> {
        let mut report = DetectionReport::new();
        if !self.config.enabled {
            report.add_warning("Sanitizer is disabled; nothing would be redacted".to_string());
        }
        self.report_node(value, 0, None, &mut report)?;
        self.add_catalog_warnings(&mut report);
        Ok(report)
    }

    fn report_node(
        &self,
        value: &SanitizableValue,
        depth: usize,
        forced: Option<PhiCategory>,
        report: &mut DetectionReport,
    ) -> Result<()> {
        match value {
            SanitizableValue::Scalar(_) => Ok(()),
            SanitizableValue::Text(text) => self.report_text(text, forced, report),
            _ if !self.config.scan_nested_structures => Ok(()),
            _ if depth >= self.config.max_depth => {
                report.add_warning(format!(
                    "A nested value exceeds the depth limit of {} and would be truncated",
                    self.config.max_depth
                ));
                Ok(())
            }
            SanitizableValue::Mapping(entries) => {
                for (key, child) in entries {
                    if self.config.scan_mapping_keys {
                        self.report_text(key, None, report)?;
                    }
                    let child_forced = forced.or_else(|| self.forced_category(key));
                    self.report_node(child, depth + 1, child_forced, report)?;
                }
                Ok(())
            }
            SanitizableValue::Sequence(items) | SanitizableValue::SetLike(items) => items
                .iter()
                .try_for_each(|item| self.report_node(item, depth + 1, forced, report)),
        }
    }

    fn report_text(
        &self,
        text: &str,
        forced: Option<PhiCategory>,
        report: &mut DetectionReport,
    ) -> Result<()> {
        if text.len() > self.config.max_input_size_bytes {
            report.add_oversized(text.len(), self.config.max_input_size_bytes);
            return Ok(());
        }
        let started = Instant::now();
        let spans = match forced {
            Some(_) if text.is_empty() => Vec::new(),
            Some(category) => vec![ResolvedSpan::accept(CandidateSpan::new(
                category,
                text,
                0,
                text.len(),
                CODE_CONTEXT_PRIORITY,
                SENSITIVE_FIELD_SOURCE,
            ))],
            None => self.analyze(text)?,
        };
        report.add_input(&spans, started.elapsed().as_millis() as u64);
        Ok(())
    }

    fn add_catalog_warnings(&self, report: &mut DetectionReport) {
        for dropped in self.catalog.dropped() {
            report.add_warning(format!(
                "Pattern '{}' was dropped: {}",
                dropped.name, dropped.reason
            ));
        }
    }

    fn forced_category(&self, key: &str) -> Option<PhiCategory> {
        self.config
            .is_sensitive_field(key)
            .then(|| PhiCategory::sniff_key(key))
    }

    /// Sanitize one node, containing panics to that node
    fn guard_node(
        &self,
        value: &SanitizableValue,
        depth: usize,
        forced: Option<PhiCategory>,
    ) -> Result<SanitizableValue> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.sanitize_node(value, depth, forced))) {
            Ok(result) => result,
            Err(_) => {
                self.fail(PhiGuardError::sanitization("sanitizer panicked"))?;
                Ok(self.error_shaped(value, depth))
            }
        }
    }

    /// Same shape as `value` with every text leaf replaced by [`ERROR_MARKER`]
    fn error_shaped(&self, value: &SanitizableValue, depth: usize) -> SanitizableValue {
        let marker = || SanitizableValue::Text(ERROR_MARKER.to_string());
        match value {
            SanitizableValue::Scalar(_) => value.clone(),
            SanitizableValue::Text(_) => marker(),
            _ if depth >= self.config.max_depth => SanitizableValue::Text(DEPTH_MARKER.to_string()),
            SanitizableValue::Mapping(entries) => SanitizableValue::Mapping(
                entries
                    .iter()
                    .map(|(key, child)| {
                        let key = if self.config.scan_mapping_keys {
                            ERROR_MARKER.to_string()
                        } else {
                            key.clone()
                        };
                        (key, self.error_shaped(child, depth + 1))
                    })
                    .collect(),
            ),
            SanitizableValue::Sequence(items) => SanitizableValue::Sequence(
                items.iter().map(|item| self.error_shaped(item, depth + 1)).collect(),
            ),
            SanitizableValue::SetLike(items) => SanitizableValue::SetLike(
                items.iter().map(|item| self.error_shaped(item, depth + 1)).collect(),
            ),
        }
    }

    fn sanitize_node(
        &self,
        value: &SanitizableValue,
        depth: usize,
        forced: Option<PhiCategory>,
    ) -> Result<SanitizableValue> {
        match value {
            SanitizableValue::Scalar(_) => Ok(value.clone()),
            SanitizableValue::Text(text) => self.guard_text(text, forced).map(SanitizableValue::Text),
            _ if !self.config.scan_nested_structures => Ok(value.clone()),
            _ if depth >= self.config.max_depth => {
                tracing::warn!(
                    depth,
                    max_depth = self.config.max_depth,
                    "Nested value exceeds depth limit, truncating"
                );
                Ok(SanitizableValue::Text(DEPTH_MARKER.to_string()))
            }
            SanitizableValue::Mapping(entries) => {
                let mut out = Vec::with_capacity(entries.len());
                for (key, child) in entries {
                    let key_out = if self.config.scan_mapping_keys {
                        self.guard_text(key, None)?
                    } else {
                        key.clone()
                    };
                    let child_forced = forced.or_else(|| self.forced_category(key));
                    out.push((key_out, self.guard_node(child, depth + 1, child_forced)?));
                }
                Ok(SanitizableValue::Mapping(out))
            }
            SanitizableValue::Sequence(items) => self
                .sanitize_items(items, depth, forced)
                .map(SanitizableValue::Sequence),
            SanitizableValue::SetLike(items) => self
                .sanitize_items(items, depth, forced)
                .map(SanitizableValue::SetLike),
        }
    }

    fn sanitize_items(
        &self,
        items: &[SanitizableValue],
        depth: usize,
        forced: Option<PhiCategory>,
    ) -> Result<Vec<SanitizableValue>> {
        items
            .iter()
            .map(|item| self.guard_node(item, depth + 1, forced))
            .collect()
    }

    /// Redact one text value, converting failures per policy
    fn guard_text(&self, text: &str, forced: Option<PhiCategory>) -> Result<String> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.redact_text(text, forced)));
        match outcome {
            Ok(Ok(clean)) => Ok(clean),
            Ok(Err(err)) => self.fail(err),
            Err(_) => self.fail(PhiGuardError::sanitization("detector panicked")),
        }
    }

    fn fail(&self, err: PhiGuardError) -> Result<String> {
        tracing::error!(
            error = %err,
            strict = self.config.allow_exceptions_to_propagate,
            "Sanitization failed"
        );
        if self.config.allow_exceptions_to_propagate {
            Err(err)
        } else {
            Ok(ERROR_MARKER.to_string())
        }
    }

    fn redact_text(&self, text: &str, forced: Option<PhiCategory>) -> Result<String> {
        if text.len() > self.config.max_input_size_bytes {
            tracing::warn!(
                size = text.len(),
                limit = self.config.max_input_size_bytes,
                "Input exceeds size limit, replacing with truncation marker"
            );
            return Ok(TRUNCATION_MARKER.to_string());
        }

        if let Some(category) = forced {
            return Ok(self.strategy.redact(text, category, None));
        }

        let spans = self.resolve_text(text)?;
        let mut out = text.to_string();
        for span in spans.iter().rev() {
            let replacement =
                self.strategy
                    .redact(span.matched_text(), span.category(), span.redaction_label());
            out.replace_range(span.start()..span.end(), &replacement);
        }
        Ok(out)
    }

    fn resolve_text(&self, text: &str) -> Result<Vec<ResolvedSpan>> {
        let candidates = self.detector.scan(text, self.config.sensitivity);
        let splits = |i: usize| i <= text.len() && !text.is_char_boundary(i);
        if let Some(bad) = candidates.iter().find(|c| splits(c.start) || splits(c.end)) {
            return Err(PhiGuardError::sanitization(format!(
                "span {}..{} from '{}' splits a character",
                bad.start, bad.end, bad.source_name
            )));
        }
        resolver::resolve(candidates, text.len())
    }
}

impl std::fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sanitizer")
            .field("config", &self.config)
            .field("patterns", &self.catalog.len())
            .finish_non_exhaustive()
    }
}
