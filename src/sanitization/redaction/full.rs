//! Full redaction - replaces a match with a category marker

use super::RedactionStrategy;
use crate::sanitization::config::CATEGORY_PLACEHOLDER;
use crate::sanitization::models::PhiCategory;

/// Replaces the whole match; reveals neither content nor length
#[derive(Debug, Clone)]
pub struct FullRedaction {
    template: String,
}

impl FullRedaction {
    /// `template` is expected to be normalized already (contains `{category}`)
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn marker(&self, category: PhiCategory) -> String {
        self.template.replace(CATEGORY_PLACEHOLDER, category.label())
    }
}

impl RedactionStrategy for FullRedaction {
    fn redact(&self, _matched: &str, category: PhiCategory, label: Option<&str>) -> String {
        match label {
            Some(label) => label.to_string(),
            None => self.marker(category),
        }
    }
}
