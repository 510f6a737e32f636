//! End-to-end sanitization scenarios

use phi_guard::sanitization::{
    CandidateSpan, MatchEngine, PatternCatalog, PhiCategory, PhiDetector, RedactionMode,
    SanitizableValue, Sanitizer, SanitizerConfig, Sensitivity, ERROR_MARKER, TRUNCATION_MARKER,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn default_sanitizer() -> Sanitizer {
    Sanitizer::new(SanitizerConfig::default()).unwrap()
}

/// Delegates to the real engine and counts invocations
struct SpyDetector {
    engine: MatchEngine,
    calls: AtomicUsize,
}

impl SpyDetector {
    fn new() -> Self {
        let catalog = Arc::new(PatternCatalog::with_defaults(Vec::new()).unwrap());
        Self {
            engine: MatchEngine::new(catalog),
            calls: AtomicUsize::new(0),
        }
    }
}

impl PhiDetector for SpyDetector {
    fn scan(&self, text: &str, sensitivity: Sensitivity) -> Vec<CandidateSpan> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.engine.scan(text, sensitivity)
    }
}

#[test]
fn test_contact_line_without_clinical_context() {
    let out = default_sanitizer()
        .sanitize_text("Contact John Smith at john.smith@example.com or 555-123-4567")
        .unwrap();

    assert_eq!(out, "Contact John Smith at [EMAIL] or [PHONE]");
}

#[test]
fn test_contact_line_with_clinical_context_redacts_name() {
    let out = default_sanitizer()
        .sanitize_text("Patient John Smith was admitted, contact john.smith@example.com")
        .unwrap();

    assert_eq!(out, "Patient [NAME] was admitted, contact [EMAIL]");
}

#[test]
fn test_assignment_overrides_plain_ssn() {
    let sanitizer = default_sanitizer();
    let text = "ssn = '123-45-6789'";

    let spans = sanitizer.analyze(text).unwrap();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].category(), PhiCategory::Ssn);
    assert_eq!(spans[0].source_name(), "code_context_assignment");
    assert_eq!((spans[0].start(), spans[0].end()), (0, text.len()));

    assert_eq!(sanitizer.sanitize_text(text).unwrap(), "[SSN]");
}

#[test]
fn test_partial_credit_card() {
    let sanitizer = Sanitizer::new(
        SanitizerConfig::builder()
            .redaction_mode(RedactionMode::Partial)
            .build()
            .unwrap(),
    )
    .unwrap();

    let spans = sanitizer.analyze("4111111111111111").unwrap();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].category(), PhiCategory::CreditCard);
    assert_eq!(
        sanitizer.sanitize_text("4111111111111111").unwrap(),
        "xxxxxxxxxxxx1111"
    );
}

#[test]
fn test_nested_value_keeps_shape() {
    let input = json!({"patient": {"email": "a@b.com", "age": 45}});
    let out = default_sanitizer().sanitize_json(input).unwrap();

    assert_eq!(out, json!({"patient": {"email": "[EMAIL]", "age": 45}}));
}

#[test]
fn test_oversized_input_is_never_scanned() {
    let spy = Arc::new(SpyDetector::new());
    let config = SanitizerConfig::builder()
        .max_input_size_bytes(64)
        .build()
        .unwrap();
    let sanitizer = Sanitizer::with_detector(config, spy.clone()).unwrap();

    let oversized = "a@b.com ".repeat(20);
    assert_eq!(sanitizer.sanitize_text(&oversized).unwrap(), TRUNCATION_MARKER);
    assert_eq!(spy.calls.load(Ordering::SeqCst), 0);

    assert_eq!(sanitizer.sanitize_text("a@b.com").unwrap(), "[EMAIL]");
    assert_eq!(spy.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_sensitive_field_names() {
    let sanitizer = default_sanitizer();
    let value = SanitizableValue::mapping([
        ("Date_Of_Birth", SanitizableValue::text("sometime in spring")),
        ("comment", SanitizableValue::text("sometime in spring")),
    ]);

    let out = sanitizer.sanitize(&value).unwrap();
    assert_eq!(out.get("Date_Of_Birth"), Some(&SanitizableValue::text("[DOB]")));
    assert_eq!(
        out.get("comment"),
        Some(&SanitizableValue::text("sometime in spring"))
    );
}

#[test]
fn test_custom_pattern_and_label() {
    use phi_guard::sanitization::{MatcherKind, PatternDefinition};

    let custom = vec![PatternDefinition::new(
        "employee_id",
        PhiCategory::Other,
        MatcherKind::Regex,
        r"EMP-\d{6}",
        6,
    )
    .with_redaction_label("[EMPLOYEE]")];
    let sanitizer = Sanitizer::with_patterns(SanitizerConfig::default(), custom).unwrap();

    assert_eq!(
        sanitizer.sanitize_text("badge EMP-004211 scanned").unwrap(),
        "badge [EMPLOYEE] scanned"
    );
}

#[test]
fn test_hash_mode_is_stable_and_salted() {
    let build = |salt: &str| {
        Sanitizer::new(
            SanitizerConfig::builder()
                .redaction_mode(RedactionMode::Hash)
                .hash_salt(salt)
                .build()
                .unwrap(),
        )
        .unwrap()
    };

    let a = build("pepper").sanitize_text("a@b.com").unwrap();
    let b = build("pepper").sanitize_text("a@b.com").unwrap();
    let c = build("other").sanitize_text("a@b.com").unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(!a.contains("a@b.com"));
}

#[test]
fn test_error_marker_never_leaks_input() {
    struct Failing;
    impl PhiDetector for Failing {
        fn scan(&self, text: &str, _: Sensitivity) -> Vec<CandidateSpan> {
            // Offset that splits a multi-byte character
            vec![CandidateSpan::new(PhiCategory::Other, text, 1, 2, 5, "split")]
        }
    }

    let sanitizer = Sanitizer::with_detector(SanitizerConfig::default(), Arc::new(Failing)).unwrap();
    assert_eq!(sanitizer.sanitize_text("é 123-45-6789").unwrap(), ERROR_MARKER);
}
