//! PHI detection module
//!
//! Provides the trait-based detection interface and the [`MatchEngine`] that
//! runs the pattern catalog and code-context detectors over one input.

pub mod code_context;
pub mod context;
pub mod patterns;

use crate::sanitization::config::Sensitivity;
use crate::sanitization::models::CandidateSpan;
use context::{has_domain_context, is_false_positive};
use patterns::{CompiledPattern, MatcherKind, PatternCatalog};
use std::sync::Arc;

/// Minimum length of an identifier captured by a keyword-set matcher
const MIN_KEYWORD_ID_LEN: usize = 4;

/// Rejected matches per pattern that may restart one character in; past this
/// a rejected match skips to its end like an accepted one
const MAX_REJECTED_RESTARTS: usize = 256;

/// Trait for PHI detection implementations
pub trait PhiDetector: Send + Sync {
    /// Produce raw candidate spans for `text`, in no particular order
    fn scan(&self, text: &str, sensitivity: Sensitivity) -> Vec<CandidateSpan>;
}

/// Runs a [`PatternCatalog`] over text
#[derive(Debug, Clone)]
pub struct MatchEngine {
    catalog: Arc<PatternCatalog>,
}

impl MatchEngine {
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Sensitivity gate for one data pattern
    fn is_included(pattern: &CompiledPattern, sensitivity: Sensitivity, has_context: bool) -> bool {
        let priority = pattern.priority();
        let dependent = pattern.definition.context_dependent;
        match sensitivity {
            Sensitivity::Low => priority >= 8 && !dependent,
            Sensitivity::Medium => (priority >= 6 && !dependent) || (dependent && has_context),
            Sensitivity::High => true,
        }
    }

    fn scan_pattern(
        pattern: &CompiledPattern,
        text: &str,
        has_context: bool,
        sensitivity: Sensitivity,
        out: &mut Vec<CandidateSpan>,
    ) {
        let keyword_set = pattern.definition.matcher_kind == MatcherKind::ContextKeywordSet;
        let mut pos = 0;
        let mut restarts = 0;

        while pos <= text.len() {
            let Some(caps) = pattern.regex.captures_at(text, pos) else {
                break;
            };
            let Some(whole) = caps.get(0) else { break };
            let span = if pattern.has_value_group {
                caps.name("value").unwrap_or(whole)
            } else {
                whole
            };

            // Structural rejection uses the most permissive level so the
            // sequence of visited matches is the same at every sensitivity.
            let structurally_rejected = span.is_empty()
                || (keyword_set && span.as_str().chars().count() < MIN_KEYWORD_ID_LEN)
                || is_false_positive(
                    pattern.category(),
                    span.as_str(),
                    has_context,
                    Sensitivity::High,
                );
            let rejected = structurally_rejected
                || is_false_positive(pattern.category(), span.as_str(), has_context, sensitivity);

            if !rejected {
                out.push(
                    CandidateSpan::new(
                        pattern.category(),
                        span.as_str(),
                        span.start(),
                        span.end(),
                        pattern.priority(),
                        pattern.name(),
                    )
                    .with_label(pattern.definition.redaction_label.clone()),
                );
            }

            pos = if structurally_rejected && restarts < MAX_REJECTED_RESTARTS {
                restarts += 1;
                next_boundary(text, whole.start())
            } else if whole.is_empty() {
                next_boundary(text, whole.end())
            } else {
                whole.end()
            };
        }
    }
}

/// Byte offset of the character after the one starting at `pos`
fn next_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len() + 1)
}

impl PhiDetector for MatchEngine {
    fn scan(&self, text: &str, sensitivity: Sensitivity) -> Vec<CandidateSpan> {
        let mut candidates = self.catalog.code_context_detectors().scan(text);
        let has_context = has_domain_context(text);

        for pattern in self.catalog.patterns() {
            if Self::is_included(pattern, sensitivity, has_context) {
                Self::scan_pattern(pattern, text, has_context, sensitivity, &mut candidates);
            }
        }

        tracing::trace!(
            candidates = candidates.len(),
            text_len = text.len(),
            %sensitivity,
            has_context,
            "Scan complete"
        );
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitization::models::PhiCategory;
    use patterns::PatternDefinition;

    fn engine() -> MatchEngine {
        MatchEngine::new(Arc::new(PatternCatalog::with_defaults(Vec::new()).unwrap()))
    }

    /// Distinct matched texts of one category, sorted
    fn texts(spans: &[CandidateSpan], category: PhiCategory) -> Vec<&str> {
        let mut out: Vec<&str> = spans
            .iter()
            .filter(|s| s.category == category)
            .map(|s| s.matched_text.as_str())
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    #[test]
    fn test_detect_email_and_phone() {
        let spans = engine().scan(
            "Contact John Smith at john.smith@example.com or 555-123-4567",
            Sensitivity::Medium,
        );
        assert!(texts(&spans, PhiCategory::Email).contains(&"john.smith@example.com"));
        assert_eq!(texts(&spans, PhiCategory::Phone), vec!["555-123-4567"]);
        assert!(texts(&spans, PhiCategory::Name).is_empty());
    }

    #[test]
    fn test_name_needs_clinical_context_at_medium() {
        let spans = engine().scan(
            "Contact John Smith about the patient referral",
            Sensitivity::Medium,
        );
        assert_eq!(texts(&spans, PhiCategory::Name), vec!["John Smith"]);
    }

    #[test]
    fn test_low_sensitivity_skips_mid_priority() {
        let text = "Server 10.1.2.3 logged ssn 123-45-6789";
        let low = engine().scan(text, Sensitivity::Low);
        assert!(texts(&low, PhiCategory::IpAddress).is_empty());
        assert_eq!(texts(&low, PhiCategory::Ssn), vec!["123-45-6789"]);

        let medium = engine().scan(text, Sensitivity::Medium);
        assert_eq!(texts(&medium, PhiCategory::IpAddress), vec!["10.1.2.3"]);
    }

    #[test]
    fn test_invalid_ssn_rejected_below_high() {
        let text = "ref 000-12-3456";
        assert!(texts(&engine().scan(text, Sensitivity::Medium), PhiCategory::Ssn).is_empty());
        assert_eq!(
            texts(&engine().scan(text, Sensitivity::High), PhiCategory::Ssn),
            vec!["000-12-3456"]
        );
    }

    #[test]
    fn test_luhn_filter() {
        let spans = engine().scan("card 4111111111111112", Sensitivity::High);
        assert!(texts(&spans, PhiCategory::CreditCard).is_empty());

        let spans = engine().scan("card 4111111111111111", Sensitivity::Low);
        assert_eq!(texts(&spans, PhiCategory::CreditCard), vec!["4111111111111111"]);
    }

    #[test]
    fn test_value_group_narrows_span() {
        let text = "DOB: 03/14/1975";
        let spans = engine().scan(text, Sensitivity::Low);
        let dob: Vec<&CandidateSpan> =
            spans.iter().filter(|s| s.category == PhiCategory::Dob).collect();
        assert_eq!(dob.len(), 1);
        assert_eq!(dob[0].matched_text, "03/14/1975");
        assert_eq!(dob[0].start, 5);
    }

    #[test]
    fn test_short_keyword_identifier_rejected() {
        let spans = engine().scan("MRN: 12 and MRN: 884512", Sensitivity::High);
        assert_eq!(texts(&spans, PhiCategory::Mrn), vec!["884512"]);
    }

    #[test]
    fn test_code_context_always_runs() {
        let spans = engine().scan("patient_email = 'x'", Sensitivity::Low);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].priority, code_context::CODE_CONTEXT_PRIORITY);
    }

    #[test]
    fn test_monotone_in_sensitivity() {
        let inputs = [
            "Contact John Smith at john.smith@example.com or 555-123-4567",
            "Patient Mary Jones, aged 52, diagnosed 02/11/2023, MRN 7781234",
            "Friday Morning meeting with Dr. Adams at 10.0.0.8",
            "Invalid ssn 000-00-0000 and card 4111 1111 1111 1111",
        ];
        let engine = engine();
        for text in inputs {
            let key = |s: &CandidateSpan| (s.start, s.end, s.source_name.clone());
            let low: Vec<_> = engine.scan(text, Sensitivity::Low).iter().map(key).collect();
            let medium: Vec<_> = engine.scan(text, Sensitivity::Medium).iter().map(key).collect();
            let high: Vec<_> = engine.scan(text, Sensitivity::High).iter().map(key).collect();
            assert!(low.iter().all(|s| medium.contains(s)), "{text}");
            assert!(medium.iter().all(|s| high.contains(s)), "{text}");
        }
    }

    #[test]
    fn test_custom_label_propagates() {
        let custom = vec![PatternDefinition::new(
            "employee_id",
            PhiCategory::Other,
            MatcherKind::Regex,
            r"EMP-\d{6}",
            9,
        )
        .with_redaction_label("[EMPLOYEE]")];
        let engine = MatchEngine::new(Arc::new(PatternCatalog::with_defaults(custom).unwrap()));
        let spans = engine.scan("badge EMP-123456", Sensitivity::Low);
        assert_eq!(spans[0].redaction_label.as_deref(), Some("[EMPLOYEE]"));
    }

    #[test]
    fn test_rejected_match_retried_inside() {
        // "Contact John" is rejected, "John Smith" starts inside it
        let spans = engine().scan("Contact John Smith, patient", Sensitivity::Medium);
        assert_eq!(texts(&spans, PhiCategory::Name), vec!["John Smith"]);
    }

    #[test]
    fn test_long_match_scanned_in_linear_time() {
        let text = format!("{}@example.com", "a.".repeat(50_000));
        let started = std::time::Instant::now();
        let spans = engine().scan(&text, Sensitivity::Medium);
        let elapsed = started.elapsed();

        let emails = spans
            .iter()
            .filter(|s| s.category == PhiCategory::Email)
            .count();
        assert!(emails <= 2, "{emails} email candidates");
        assert!(spans.len() < 100, "{} candidates", spans.len());
        assert!(elapsed < std::time::Duration::from_secs(10), "{elapsed:?}");
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        let spans = engine().scan("Ünïcödé 🚑 María José 555-123-4567 🚑", Sensitivity::High);
        assert_eq!(texts(&spans, PhiCategory::Phone), vec!["555-123-4567"]);
    }
}
