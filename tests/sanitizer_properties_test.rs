//! Properties that must hold for every input

use phi_guard::sanitization::{
    CandidateSpan, MatchEngine, PatternCatalog, PhiDetector, SanitizableValue, Sanitizer,
    SanitizerConfig, Sensitivity,
};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;

const CORPUS: &[&str] = &[
    "Contact John Smith at john.smith@example.com or 555-123-4567",
    "Patient Jane Doe, DOB: 01/02/1980, MRN 12345678, admitted to clinic",
    "ssn = '123-45-6789'",
    r#"{"patient_email": "a@b.com", "home_phone": "555-867-5309"}"#,
    "# mrn: 0042117 follow up Monday",
    "card 4111 1111 1111 1111 on file, policy # POL-99812",
    "visit https://portal.example.org/records?id=77 from 10.0.0.12",
    "Dr. Gregory House saw the 45 year old on 2023-04-01",
    "nothing to see here",
    "account no 55512345 closed",
    "license: D1234567 expired",
    "member id: MBR-55120934",
    "card 4111111111111111",
    "",
];

/// One input per category whose default marker follows a keyword
const KEYWORD_MARKERS: &[(&str, &str)] = &[
    ("account no 55512345 closed", "[ACCOUNT_NUMBER]"),
    ("acct# 9981-2234", "[ACCOUNT_NUMBER]"),
    ("license: D1234567 expired", "[LICENSE_NUMBER]"),
    ("member id: MBR-55120934", "[POLICY_NUMBER]"),
    ("policy # POL-99812", "[POLICY_NUMBER]"),
    ("card 4111111111111111", "[CREDIT_CARD]"),
    ("ssn 123-45-6789", "[SSN]"),
    ("mrn: 00421179", "[MRN]"),
];

fn engine() -> MatchEngine {
    MatchEngine::new(Arc::new(PatternCatalog::with_defaults(Vec::new()).unwrap()))
}

/// Returns the real candidates in reverse order
struct ReversedDetector(MatchEngine);

impl PhiDetector for ReversedDetector {
    fn scan(&self, text: &str, sensitivity: Sensitivity) -> Vec<CandidateSpan> {
        let mut spans = self.0.scan(text, sensitivity);
        spans.reverse();
        spans
    }
}

#[test]
fn test_idempotence() {
    let sanitizer = Sanitizer::new(SanitizerConfig::default()).unwrap();
    for text in CORPUS {
        let once = sanitizer.sanitize_text(text).unwrap();
        let twice = sanitizer.sanitize_text(&once).unwrap();
        assert_eq!(once, twice, "not idempotent for {text:?}");
    }
}

#[test]
fn test_idempotence_after_keyword_markers() {
    let sanitizer = Sanitizer::new(SanitizerConfig::default()).unwrap();
    for (text, marker) in KEYWORD_MARKERS {
        let once = sanitizer.sanitize_text(text).unwrap();
        assert!(once.contains(marker), "{text:?} gave {once:?}");
        let twice = sanitizer.sanitize_text(&once).unwrap();
        assert_eq!(once, twice, "not idempotent for {text:?}");
    }
}

#[test]
fn test_resolved_spans_are_disjoint_and_ordered() {
    let sanitizer = Sanitizer::new(
        SanitizerConfig::builder()
            .sensitivity(Sensitivity::High)
            .build()
            .unwrap(),
    )
    .unwrap();

    for text in CORPUS {
        let spans = sanitizer.analyze(text).unwrap();
        for pair in spans.windows(2) {
            assert!(
                pair[0].end() <= pair[1].start(),
                "overlapping spans in {text:?}"
            );
        }
        for span in &spans {
            assert!(span.start() < span.end() && span.end() <= text.len());
        }
    }
}

#[test]
fn test_output_independent_of_candidate_order() {
    let forward = Sanitizer::new(SanitizerConfig::default()).unwrap();
    let reversed =
        Sanitizer::with_detector(SanitizerConfig::default(), Arc::new(ReversedDetector(engine())))
            .unwrap();

    for text in CORPUS {
        assert_eq!(
            forward.sanitize_text(text).unwrap(),
            reversed.sanitize_text(text).unwrap(),
            "order dependent for {text:?}"
        );
    }
}

#[test]
fn test_sensitivity_monotonicity() {
    let engine = engine();
    let keyed = |text: &str, level| -> BTreeSet<(usize, usize, String)> {
        engine
            .scan(text, level)
            .into_iter()
            .map(|s| (s.start, s.end, s.source_name))
            .collect()
    };

    for text in CORPUS {
        let low = keyed(text, Sensitivity::Low);
        let medium = keyed(text, Sensitivity::Medium);
        let high = keyed(text, Sensitivity::High);
        assert!(low.is_subset(&medium), "low not within medium for {text:?}");
        assert!(medium.is_subset(&high), "medium not within high for {text:?}");
    }
}

#[test]
fn test_structure_preserved() {
    let sanitizer = Sanitizer::new(SanitizerConfig::default()).unwrap();
    let input = json!({
        "id": 7,
        "active": true,
        "ratio": 0.5,
        "missing": null,
        "contacts": [
            {"email": "x@y.org", "note": "call 555-123-4567"},
            {"email": "z@y.org", "note": null}
        ],
        "tags": ["a", "b"]
    });

    let out = sanitizer.sanitize_json(input.clone()).unwrap();

    fn same_shape(a: &serde_json::Value, b: &serde_json::Value) -> bool {
        use serde_json::Value::*;
        match (a, b) {
            (Object(x), Object(y)) => {
                x.len() == y.len()
                    && x.iter()
                        .all(|(k, v)| y.get(k).map(|w| same_shape(v, w)).unwrap_or(false))
            }
            (Array(x), Array(y)) => {
                x.len() == y.len() && x.iter().zip(y).all(|(v, w)| same_shape(v, w))
            }
            (String(_), String(_)) => true,
            (x, y) => x == y,
        }
    }
    assert!(same_shape(&input, &out));
    assert_eq!(out["contacts"][0]["note"], "call [PHONE]");
}

#[test]
fn test_set_like_values_keep_their_kind() {
    let sanitizer = Sanitizer::new(SanitizerConfig::default()).unwrap();
    let value = SanitizableValue::SetLike(vec!["a@b.com".into(), "plain".into()]);

    let out = sanitizer.sanitize(&value).unwrap();
    assert_eq!(
        out,
        SanitizableValue::SetLike(vec!["[EMAIL]".into(), "plain".into()])
    );
}

#[test]
fn test_sanitizer_shared_across_threads() {
    let sanitizer = Arc::new(Sanitizer::new(SanitizerConfig::default()).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let sanitizer = Arc::clone(&sanitizer);
            std::thread::spawn(move || {
                sanitizer
                    .sanitize_text(&format!("user{i}@example.com"))
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "[EMAIL]");
    }
}
