//! Partial redaction - keeps a short tail visible

use super::{FullRedaction, RedactionStrategy};
use crate::sanitization::models::PhiCategory;

const MASK: char = 'x';

/// Masks most of a match, keeping category-appropriate trailing material
///
/// Falls back to the full marker when the match is no longer than
/// `visible_chars` or lacks what the category rule needs.
#[derive(Debug, Clone)]
pub struct PartialRedaction {
    visible_chars: usize,
    fallback: FullRedaction,
}

impl PartialRedaction {
    pub fn new(visible_chars: usize, fallback: FullRedaction) -> Self {
        Self {
            visible_chars,
            fallback,
        }
    }

    fn last_digits(text: &str, n: usize) -> Option<String> {
        let digits: Vec<char> = text.chars().filter(char::is_ascii_digit).collect();
        (digits.len() >= n).then(|| digits[digits.len() - n..].iter().collect())
    }

    fn mask_tail(&self, text: &str) -> String {
        let total = text.chars().count();
        text.chars()
            .enumerate()
            .map(|(i, c)| if i + self.visible_chars < total { MASK } else { c })
            .collect()
    }

    fn partial(&self, matched: &str, category: PhiCategory) -> Option<String> {
        if matched.chars().count() <= self.visible_chars {
            return None;
        }
        match category {
            PhiCategory::Ssn => Self::last_digits(matched, 4).map(|d| format!("xxx-xx-{d}")),
            PhiCategory::Phone => Self::last_digits(matched, 4).map(|d| format!("xxx-xxx-{d}")),
            PhiCategory::Mrn => Self::last_digits(matched, 4).map(|d| format!("[ID ending in {d}]")),
            PhiCategory::Email => matched
                .rsplit_once('@')
                .filter(|(_, domain)| !domain.is_empty())
                .map(|(_, domain)| format!("xxxx@{domain}")),
            _ => Some(self.mask_tail(matched)),
        }
    }
}

impl RedactionStrategy for PartialRedaction {
    fn redact(&self, matched: &str, category: PhiCategory, label: Option<&str>) -> String {
        self.partial(matched, category)
            .unwrap_or_else(|| self.fallback.redact(matched, category, label))
    }
}
