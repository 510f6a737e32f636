//! Structural detectors for PHI embedded in code and config-like text
//!
//! These run regardless of sensitivity and outrank every data pattern. Each
//! hit is categorized by sniffing the captured key fragment.

use crate::sanitization::models::{CandidateSpan, PhiCategory};
use regex::Regex;

/// Priority of every code-context hit
pub const CODE_CONTEXT_PRIORITY: i32 = 11;

/// Identifier containing a PHI-suggestive fragment
const KEY: &str = r"(?i:[A-Za-z0-9_]*?(?:ssn|social|dob|birth|mrn|patient|email|phone|address|card|policy|insurance|account|license|licence|first_?name|last_?name|full_?name|maiden)[A-Za-z0-9_]*)";

/// Shape of the structural leak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeContextKind {
    /// `key = 'literal'`, `key := "literal"`, `key = 123-45`
    Assignment,
    /// `"key": "literal"` in JSON, YAML flow maps and dict literals
    MapEntry,
    /// `# key: value` and friends
    Comment,
    /// `key: value` inside a triple-quoted string
    MultilineString,
}

impl CodeContextKind {
    pub fn source_name(&self) -> &'static str {
        match self {
            Self::Assignment => "code_context_assignment",
            Self::MapEntry => "code_context_map_entry",
            Self::Comment => "code_context_comment",
            Self::MultilineString => "code_context_multiline_string",
        }
    }

    fn source(&self) -> String {
        match self {
            Self::Assignment => format!(
                r#"\b(?P<key>{KEY})\s*:?=\s*(?:'[^'\n]{{1,256}}'|"[^"\n]{{1,256}}"|\d[\d\-]{{3,}})"#
            ),
            Self::MapEntry => format!(
                r#"["'](?P<key>{KEY})["']\s*:\s*(?:["'](?P<span>[^"'\n]{{1,256}})["']|(?P<bare>\d[\d\-]{{3,}}))"#
            ),
            Self::Comment => format!(
                r"(?m)(?:#|//|--|/\*)[ \t]*(?:[A-Za-z]+[ \t]+){{0,4}}(?P<span>(?P<key>{KEY})[ \t]*[:=][ \t]*[^\s*][^\n*]{{0,127}})"
            ),
            Self::MultilineString => format!(
                r#"(?s)(?:"""|''')(?P<span>[^"']*?(?P<key>{KEY})[ \t]*[:=][^"']*?)(?:"""|''')"#
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CodeContextDetector {
    kind: CodeContextKind,
    regex: Regex,
}

impl CodeContextDetector {
    pub fn kind(&self) -> CodeContextKind {
        self.kind
    }

    fn scan_into(&self, text: &str, out: &mut Vec<CandidateSpan>) {
        for caps in self.regex.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let span = caps
                .name("span")
                .or_else(|| caps.name("bare"))
                .unwrap_or(whole);
            if span.is_empty() {
                continue;
            }
            let category = caps
                .name("key")
                .map(|k| PhiCategory::sniff_key(k.as_str()))
                .unwrap_or(PhiCategory::Other);

            out.push(CandidateSpan::new(
                category,
                span.as_str(),
                span.start(),
                span.end(),
                CODE_CONTEXT_PRIORITY,
                self.kind.source_name(),
            ));
        }
    }
}

/// The fixed detector set; not configurable
#[derive(Debug, Clone)]
pub struct CodeContextDetectorSet {
    detectors: Vec<CodeContextDetector>,
}

impl CodeContextDetectorSet {
    pub fn standard() -> Self {
        let kinds = [
            CodeContextKind::Assignment,
            CodeContextKind::MapEntry,
            CodeContextKind::Comment,
            CodeContextKind::MultilineString,
        ];

        let detectors = kinds
            .into_iter()
            .filter_map(|kind| match Regex::new(&kind.source()) {
                Ok(regex) => Some(CodeContextDetector { kind, regex }),
                Err(e) => {
                    tracing::error!(
                        detector = kind.source_name(),
                        error = %e,
                        "Code-context detector failed to compile"
                    );
                    None
                }
            })
            .collect();

        Self { detectors }
    }

    pub fn detectors(&self) -> &[CodeContextDetector] {
        &self.detectors
    }

    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Run every detector over `text`
    pub fn scan(&self, text: &str) -> Vec<CandidateSpan> {
        let mut out = Vec::new();
        for detector in &self.detectors {
            detector.scan_into(text, &mut out);
        }
        out
    }
}
