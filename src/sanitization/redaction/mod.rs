//! Redaction strategy module
//!
//! Provides the strategies that turn one matched span into replacement text.

pub mod full;
pub mod hash;
pub mod partial;

pub use full::FullRedaction;
pub use hash::HashRedaction;
pub use partial::PartialRedaction;

use crate::sanitization::config::{RedactionMode, SanitizerConfig};
use crate::sanitization::models::PhiCategory;

/// Trait for redaction strategy implementations
pub trait RedactionStrategy: Send + Sync {
    /// Replacement text for `matched`
    ///
    /// `label` is the pattern-level override, if the producing pattern has one.
    fn redact(&self, matched: &str, category: PhiCategory, label: Option<&str>) -> String;
}

/// Build the strategy selected by `config.redaction_mode`
pub fn for_config(config: &SanitizerConfig) -> Box<dyn RedactionStrategy> {
    let full = FullRedaction::new(config.redaction_marker.clone());
    match config.redaction_mode {
        RedactionMode::Full => Box::new(full),
        RedactionMode::Partial => Box::new(PartialRedaction::new(config.partial_visible_chars, full)),
        RedactionMode::Hash => Box::new(HashRedaction::new(
            config.hash_salt.clone(),
            config.hash_length,
        )),
    }
}
