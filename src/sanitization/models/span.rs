//! Candidate and resolved span models

use super::category::PhiCategory;
use serde::Serialize;
use std::fmt;

/// One matcher hit, before conflict resolution
///
/// Offsets are byte offsets into the scanned text and always fall on UTF-8
/// character boundaries.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CandidateSpan {
    /// Category of the matched identifier
    pub category: PhiCategory,
    /// The matched text (never logged)
    #[serde(skip)]
    pub matched_text: String,
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Priority of the pattern that produced the hit
    pub priority: i32,
    /// Length in bytes
    pub length: usize,
    /// Name of the pattern or structural detector that produced the hit
    pub source_name: String,
    /// Optional pattern-level replacement label
    pub redaction_label: Option<String>,
}

impl CandidateSpan {
    /// Create a new candidate
    pub fn new(
        category: PhiCategory,
        matched_text: impl Into<String>,
        start: usize,
        end: usize,
        priority: i32,
        source_name: impl Into<String>,
    ) -> Self {
        Self {
            category,
            matched_text: matched_text.into(),
            start,
            end,
            priority,
            length: end.saturating_sub(start),
            source_name: source_name.into(),
            redaction_label: None,
        }
    }

    /// Attach a pattern-level replacement label
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.redaction_label = label;
        self
    }

    /// Whether two spans share at least one byte
    pub fn overlaps(&self, other: &CandidateSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

// Debug output must not leak the matched text into logs or panic messages.
impl fmt::Debug for CandidateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateSpan")
            .field("category", &self.category)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("priority", &self.priority)
            .field("source_name", &self.source_name)
            .finish_non_exhaustive()
    }
}

/// A span retained by the overlap resolver
///
/// Every `ResolvedSpan` in one resolution result is disjoint from all others,
/// and the result is ordered by `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSpan(CandidateSpan);

impl ResolvedSpan {
    pub(crate) fn accept(candidate: CandidateSpan) -> Self {
        Self(candidate)
    }

    /// The underlying candidate
    pub fn span(&self) -> &CandidateSpan {
        &self.0
    }

    pub fn category(&self) -> PhiCategory {
        self.0.category
    }

    pub fn start(&self) -> usize {
        self.0.start
    }

    pub fn end(&self) -> usize {
        self.0.end
    }

    pub fn priority(&self) -> i32 {
        self.0.priority
    }

    pub fn matched_text(&self) -> &str {
        &self.0.matched_text
    }

    pub fn source_name(&self) -> &str {
        &self.0.source_name
    }

    pub fn redaction_label(&self) -> Option<&str> {
        self.0.redaction_label.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_length() {
        let span = CandidateSpan::new(PhiCategory::Ssn, "123-45-6789", 4, 15, 10, "ssn");
        assert_eq!(span.length, 11);
        assert!(span.redaction_label.is_none());
    }

    #[test]
    fn test_overlap_is_half_open() {
        let a = CandidateSpan::new(PhiCategory::Name, "ab", 0, 2, 1, "a");
        let b = CandidateSpan::new(PhiCategory::Name, "cd", 2, 4, 1, "b");
        let c = CandidateSpan::new(PhiCategory::Name, "bc", 1, 3, 1, "c");
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_debug_hides_matched_text() {
        let span = CandidateSpan::new(PhiCategory::Ssn, "123-45-6789", 0, 11, 10, "ssn");
        let rendered = format!("{span:?}");
        assert!(!rendered.contains("123-45-6789"));
        assert!(rendered.contains("Ssn"));
    }
}
