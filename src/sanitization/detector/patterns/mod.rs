//! Pattern library for PHI detection
//!
//! Definitions come from the embedded TOML library plus any caller-supplied
//! additions. [`PatternCatalog::build`] compiles them once; the resulting
//! catalog is immutable and shared across threads behind an `Arc`.

use super::code_context::{CodeContextDetectorSet, CODE_CONTEXT_PRIORITY};
use crate::domain::context::ResultExt;
use crate::domain::errors::PhiGuardError;
use crate::domain::result::Result;
use crate::sanitization::models::PhiCategory;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Highest priority a data pattern may carry
pub const MAX_DATA_PRIORITY: i32 = CODE_CONTEXT_PRIORITY - 1;

const DEFAULT_LIBRARY: &str = include_str!("../../../../patterns/phi_patterns.toml");

/// How a definition's body is turned into a matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    #[default]
    Regex,
    ExactLiteral,
    FuzzySubstring,
    ContextKeywordSet,
}

/// Pattern definition from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternDefinition {
    pub name: String,
    pub category: PhiCategory,
    #[serde(default)]
    pub matcher_kind: MatcherKind,
    /// Matcher body, interpreted according to `matcher_kind`
    #[serde(rename = "pattern")]
    pub matcher_body: String,
    pub priority: i32,
    #[serde(default)]
    pub context_dependent: bool,
    #[serde(default)]
    pub case_sensitive: bool,
    /// Replacement used by full redaction instead of the rendered marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redaction_label: Option<String>,
}

impl PatternDefinition {
    pub fn new(
        name: impl Into<String>,
        category: PhiCategory,
        matcher_kind: MatcherKind,
        matcher_body: impl Into<String>,
        priority: i32,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            matcher_kind,
            matcher_body: matcher_body.into(),
            priority,
            context_dependent: false,
            case_sensitive: false,
            redaction_label: None,
        }
    }

    pub fn context_dependent(mut self, yes: bool) -> Self {
        self.context_dependent = yes;
        self
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    pub fn with_redaction_label(mut self, label: impl Into<String>) -> Self {
        self.redaction_label = Some(label.into());
        self
    }

    /// Parse a `[[patterns]]` library
    pub fn parse_library(content: &str) -> Result<Vec<PatternDefinition>> {
        #[derive(Deserialize)]
        struct PatternLibrary {
            #[serde(default)]
            patterns: Vec<PatternDefinition>,
        }

        let library: PatternLibrary = toml::from_str(content).map_err(|e| {
            PhiGuardError::Configuration(format!("Failed to parse pattern library TOML: {e}"))
        })?;
        Ok(library.patterns)
    }

    /// Read and parse a pattern library file
    pub fn load_library(path: impl AsRef<Path>) -> Result<Vec<PatternDefinition>> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pattern library {}", path.display()))?;
        Self::parse_library(&content)
    }

    /// The built-in definitions embedded in the binary
    pub fn defaults() -> Result<Vec<PatternDefinition>> {
        Self::parse_library(DEFAULT_LIBRARY)
    }

    fn compile(&self) -> std::result::Result<Regex, String> {
        let body = self.matcher_body.trim();
        if body.is_empty() {
            return Err("empty matcher body".to_string());
        }

        let (source, case_insensitive) = match self.matcher_kind {
            MatcherKind::Regex => (body.to_string(), !self.case_sensitive),
            MatcherKind::ExactLiteral => (regex::escape(body), !self.case_sensitive),
            MatcherKind::FuzzySubstring => (fuzzy_source(body)?, true),
            MatcherKind::ContextKeywordSet => (keyword_set_source(body)?, !self.case_sensitive),
        };

        RegexBuilder::new(&source)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| e.to_string())
    }
}

/// Words in order, tolerating separators between and inside them
fn fuzzy_source(body: &str) -> std::result::Result<String, String> {
    let words: Vec<String> = body
        .split(|c: char| c.is_whitespace() || matches!(c, '-' | '_' | '.'))
        .filter(|w| !w.is_empty())
        .map(regex::escape)
        .collect();
    if words.is_empty() {
        return Err("fuzzy body has no words".to_string());
    }

    let joined = words.join(r"[\s\-_.]*");
    let lead = if body.starts_with(|c: char| c.is_alphanumeric()) { r"\b" } else { "" };
    let trail = if body.ends_with(|c: char| c.is_alphanumeric()) { r"\b" } else { "" };
    Ok(format!("{lead}(?:{joined}){trail}"))
}

/// keyword, optional `#`/`no`/`number` suffix, optional separator, then an
/// identifier token containing at least one digit, captured as `value`
fn keyword_set_source(body: &str) -> std::result::Result<String, String> {
    let keywords: Vec<String> = body
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(|k| {
            k.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"[\s_\-]+")
        })
        .collect();
    if keywords.is_empty() {
        return Err("keyword set is empty".to_string());
    }

    Ok(format!(
        r"\b(?:{})(?:[\s_\-]*(?:#|no\.?|num(?:ber)?))?\s*[:=#]?\s*(?P<value>(?:[A-Za-z0-9]+-)*[A-Za-z0-9]*\d[A-Za-z0-9\-]*)",
        keywords.join("|")
    ))
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub definition: PatternDefinition,
    pub regex: Regex,
    /// Whether the matcher exposes a `value` group that narrows the span
    pub has_value_group: bool,
}

impl CompiledPattern {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn category(&self) -> PhiCategory {
        self.definition.category
    }

    pub fn priority(&self) -> i32 {
        self.definition.priority
    }
}

/// A definition rejected at build time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedPattern {
    pub name: String,
    pub reason: String,
}

/// Immutable, priority-ordered set of compiled matchers
#[derive(Debug)]
pub struct PatternCatalog {
    patterns: Vec<CompiledPattern>,
    code_context: CodeContextDetectorSet,
    dropped: Vec<DroppedPattern>,
}

impl PatternCatalog {
    /// Compile base and custom definitions into a catalog
    ///
    /// Custom definitions are additive; a custom entry sharing a name with a
    /// built-in one is an alternate matcher, not a replacement. Definitions
    /// that fail to compile are logged and dropped. Priorities above
    /// [`MAX_DATA_PRIORITY`] are clamped so code-context detectors always win.
    pub fn build(base: Vec<PatternDefinition>, custom: Vec<PatternDefinition>) -> Self {
        let mut patterns = Vec::with_capacity(base.len() + custom.len());
        let mut dropped = Vec::new();

        for mut definition in base.into_iter().chain(custom) {
            if definition.priority > MAX_DATA_PRIORITY {
                tracing::warn!(
                    pattern = %definition.name,
                    priority = definition.priority,
                    clamped_to = MAX_DATA_PRIORITY,
                    "Pattern priority exceeds data-pattern maximum, clamping"
                );
                definition.priority = MAX_DATA_PRIORITY;
            }

            match definition.compile() {
                Ok(regex) => {
                    let has_value_group = regex.capture_names().flatten().any(|n| n == "value");
                    patterns.push(CompiledPattern {
                        definition,
                        regex,
                        has_value_group,
                    });
                }
                Err(reason) => {
                    let err = PhiGuardError::PatternCompile {
                        name: definition.name.clone(),
                        reason: reason.clone(),
                    };
                    tracing::warn!(
                        pattern = %definition.name,
                        kind = ?definition.matcher_kind,
                        error = %err,
                        "Dropping pattern that failed to compile"
                    );
                    dropped.push(DroppedPattern {
                        name: definition.name,
                        reason,
                    });
                }
            }
        }

        // Stable: equal priorities keep definition order.
        patterns.sort_by(|a, b| b.priority().cmp(&a.priority()));

        tracing::debug!(
            compiled = patterns.len(),
            dropped = dropped.len(),
            "Pattern catalog built"
        );

        Self {
            patterns,
            code_context: CodeContextDetectorSet::standard(),
            dropped,
        }
    }

    /// Built-in definitions plus `custom`
    pub fn with_defaults(custom: Vec<PatternDefinition>) -> Result<Self> {
        Ok(Self::build(PatternDefinition::defaults()?, custom))
    }

    /// Data patterns in descending priority order
    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    pub fn code_context_detectors(&self) -> &CodeContextDetectorSet {
        &self.code_context
    }

    /// Definitions rejected during build
    pub fn dropped(&self) -> &[DroppedPattern] {
        &self.dropped
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
