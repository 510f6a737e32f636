//! Sanitizer configuration
//!
//! [`SanitizerConfig`] is immutable once handed to a
//! [`Sanitizer`](crate::sanitization::Sanitizer). Malformed redaction templates
//! are corrected by [`SanitizerConfig::normalize`] at construction time so the
//! hot path never has to re-check them.

use crate::config::secret::{secret_string, SecretString};
use crate::domain::errors::PhiGuardError;
use crate::domain::result::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Placeholder that must appear in every redaction template
pub const CATEGORY_PLACEHOLDER: &str = "{category}";

/// Template used when none is configured or the configured one is invalid
pub const DEFAULT_REDACTION_TEMPLATE: &str = "[{category}]";

/// Upper bound for `hash_length` (hex digits in a SHA-256 digest)
pub const MAX_HASH_LENGTH: usize = 64;

/// Detection aggressiveness
///
/// Candidate sets are monotone: everything found at `Low` is found at
/// `Medium`, and everything found at `Medium` is found at `High`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    /// Only high-priority, context-free patterns
    Low,
    /// Context-dependent patterns fire when clinical vocabulary is present
    #[default]
    Medium,
    /// Every pattern, with the weakest false-positive filtering
    High,
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl FromStr for Sensitivity {
    type Err = PhiGuardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(PhiGuardError::Configuration(format!(
                "Invalid sensitivity '{s}'. Must be one of: low, medium, high"
            ))),
        }
    }
}

/// How matched spans are rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RedactionMode {
    /// Replace with a category marker
    #[default]
    Full,
    /// Keep a short tail visible
    Partial,
    /// Replace with a salted SHA-256 prefix
    Hash,
}

impl fmt::Display for RedactionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Partial => write!(f, "partial"),
            Self::Hash => write!(f, "hash"),
        }
    }
}

impl FromStr for RedactionMode {
    type Err = PhiGuardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "partial" => Ok(Self::Partial),
            "hash" => Ok(Self::Hash),
            _ => Err(PhiGuardError::Configuration(format!(
                "Invalid redaction_mode '{s}'. Must be one of: full, partial, hash"
            ))),
        }
    }
}

/// Sanitizer settings, the `[sanitizer]` table of the configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SanitizerConfig {
    /// Master switch; when false values pass through untouched
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub sensitivity: Sensitivity,

    #[serde(default)]
    pub redaction_mode: RedactionMode,

    /// Marker template; must contain `{category}`
    #[serde(default = "default_redaction_marker")]
    pub redaction_marker: String,

    /// Trailing characters left visible by partial redaction
    #[serde(default = "default_partial_visible_chars")]
    pub partial_visible_chars: usize,

    /// Salt prepended to matched text before hashing
    #[serde(default = "default_hash_salt")]
    pub hash_salt: SecretString,

    /// Hex digits kept from the digest
    #[serde(default = "default_hash_length")]
    pub hash_length: usize,

    /// Text longer than this is replaced by the truncation marker unscanned
    #[serde(default = "default_max_input_size_bytes")]
    pub max_input_size_bytes: usize,

    /// Field names whose values are redacted wholesale
    #[serde(default = "default_sensitive_field_names")]
    pub sensitive_field_names: BTreeSet<String>,

    #[serde(default)]
    pub case_sensitive_field_names: bool,

    #[serde(default = "default_true")]
    pub scan_nested_structures: bool,

    /// Also sanitize mapping keys (off by default; keys are usually schema)
    #[serde(default)]
    pub scan_mapping_keys: bool,

    /// Container nesting beyond this depth is replaced by the depth marker
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Strict mode: internal failures surface as errors instead of markers
    #[serde(default)]
    pub allow_exceptions_to_propagate: bool,
}

impl SanitizerConfig {
    /// Start a builder seeded with defaults
    pub fn builder() -> SanitizerConfigBuilder {
        SanitizerConfigBuilder::default()
    }

    /// Correct recoverable problems in place
    ///
    /// A template without the `{category}` placeholder is replaced with
    /// [`DEFAULT_REDACTION_TEMPLATE`]. Returns the recovered error, if any, so
    /// callers can surface it in reports.
    pub fn normalize(&mut self) -> Option<PhiGuardError> {
        if self.redaction_marker.contains(CATEGORY_PLACEHOLDER) {
            return None;
        }

        let err = PhiGuardError::InvalidRedactionTemplate {
            template: self.redaction_marker.clone(),
            placeholder: CATEGORY_PLACEHOLDER,
        };
        tracing::warn!(
            template = %self.redaction_marker,
            fallback = DEFAULT_REDACTION_TEMPLATE,
            "Redaction marker lacks category placeholder, using default"
        );
        self.redaction_marker = DEFAULT_REDACTION_TEMPLATE.to_string();
        Some(err)
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any numeric limit is out of range
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.partial_visible_chars == 0 {
            return Err("sanitizer.partial_visible_chars must be > 0".to_string());
        }
        if self.max_input_size_bytes == 0 {
            return Err("sanitizer.max_input_size_bytes must be > 0".to_string());
        }
        if self.max_depth == 0 {
            return Err("sanitizer.max_depth must be > 0".to_string());
        }
        if self.hash_length == 0 || self.hash_length > MAX_HASH_LENGTH {
            return Err(format!(
                "sanitizer.hash_length must be between 1 and {MAX_HASH_LENGTH}, got {}",
                self.hash_length
            ));
        }
        Ok(())
    }

    /// Render the redaction marker for a category label
    pub fn render_marker(&self, label: &str) -> String {
        self.redaction_marker.replace(CATEGORY_PLACEHOLDER, label)
    }

    /// Whether a field name is configured as sensitive
    pub fn is_sensitive_field(&self, name: &str) -> bool {
        if self.case_sensitive_field_names {
            self.sensitive_field_names.contains(name)
        } else {
            self.sensitive_field_names
                .iter()
                .any(|f| f.eq_ignore_ascii_case(name))
        }
    }
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sensitivity: Sensitivity::default(),
            redaction_mode: RedactionMode::default(),
            redaction_marker: default_redaction_marker(),
            partial_visible_chars: default_partial_visible_chars(),
            hash_salt: default_hash_salt(),
            hash_length: default_hash_length(),
            max_input_size_bytes: default_max_input_size_bytes(),
            sensitive_field_names: default_sensitive_field_names(),
            case_sensitive_field_names: false,
            scan_nested_structures: true,
            scan_mapping_keys: false,
            max_depth: default_max_depth(),
            allow_exceptions_to_propagate: false,
        }
    }
}

/// Fluent construction of a validated [`SanitizerConfig`]
///
/// ```rust
/// use phi_guard::sanitization::{RedactionMode, SanitizerConfig, Sensitivity};
///
/// let config = SanitizerConfig::builder()
///     .sensitivity(Sensitivity::High)
///     .redaction_mode(RedactionMode::Partial)
///     .partial_visible_chars(4)
///     .build()
///     .unwrap();
/// assert_eq!(config.partial_visible_chars, 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SanitizerConfigBuilder {
    config: SanitizerConfig,
}

impl SanitizerConfigBuilder {
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn sensitivity(mut self, sensitivity: Sensitivity) -> Self {
        self.config.sensitivity = sensitivity;
        self
    }

    pub fn redaction_mode(mut self, mode: RedactionMode) -> Self {
        self.config.redaction_mode = mode;
        self
    }

    pub fn redaction_marker(mut self, template: impl Into<String>) -> Self {
        self.config.redaction_marker = template.into();
        self
    }

    pub fn partial_visible_chars(mut self, n: usize) -> Self {
        self.config.partial_visible_chars = n;
        self
    }

    pub fn hash_salt(mut self, salt: impl Into<String>) -> Self {
        self.config.hash_salt = secret_string(salt.into());
        self
    }

    pub fn hash_length(mut self, n: usize) -> Self {
        self.config.hash_length = n;
        self
    }

    pub fn max_input_size_bytes(mut self, n: usize) -> Self {
        self.config.max_input_size_bytes = n;
        self
    }

    /// Replace the sensitive field set
    pub fn sensitive_field_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.sensitive_field_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn case_sensitive_field_names(mut self, yes: bool) -> Self {
        self.config.case_sensitive_field_names = yes;
        self
    }

    pub fn scan_nested_structures(mut self, yes: bool) -> Self {
        self.config.scan_nested_structures = yes;
        self
    }

    pub fn scan_mapping_keys(mut self, yes: bool) -> Self {
        self.config.scan_mapping_keys = yes;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    pub fn allow_exceptions_to_propagate(mut self, yes: bool) -> Self {
        self.config.allow_exceptions_to_propagate = yes;
        self
    }

    /// Normalize and validate
    ///
    /// # Errors
    ///
    /// Returns [`PhiGuardError::Validation`] when a limit is out of range. An
    /// invalid template is not an error; it is replaced with the default.
    pub fn build(self) -> Result<SanitizerConfig> {
        let mut config = self.config;
        config.normalize();
        config.validate().map_err(PhiGuardError::Validation)?;
        Ok(config)
    }
}

fn default_true() -> bool {
    true
}

fn default_redaction_marker() -> String {
    DEFAULT_REDACTION_TEMPLATE.to_string()
}

fn default_partial_visible_chars() -> usize {
    4
}

fn default_hash_salt() -> SecretString {
    secret_string(String::new())
}

fn default_hash_length() -> usize {
    12
}

fn default_max_input_size_bytes() -> usize {
    1_048_576
}

fn default_max_depth() -> usize {
    32
}

fn default_sensitive_field_names() -> BTreeSet<String> {
    [
        "ssn",
        "social_security_number",
        "dob",
        "date_of_birth",
        "mrn",
        "medical_record_number",
        "credit_card",
        "card_number",
        "password",
        "secret",
        "token",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
