//! Configuration schema types
//!
//! This module defines the structure of the phi-guard TOML file.

use crate::domain::result;
use crate::sanitization::{PatternDefinition, Sanitizer, SanitizerConfig};
use serde::{Deserialize, Serialize};

/// Root configuration structure that maps to the TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhiGuardConfig {
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Sanitizer behaviour
    #[serde(default)]
    pub sanitizer: SanitizerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Custom patterns, merged with the built-in library
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<PatternDefinition>,

    /// Extra `[[patterns]]` library files, relative to the configuration file
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pattern_files: Vec<String>,
}

impl PhiGuardConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.sanitizer.validate()?;
        self.logging.validate()?;

        for (idx, pattern) in self.patterns.iter().enumerate() {
            if pattern.name.trim().is_empty() {
                return Err(format!("patterns[{idx}].name must not be empty"));
            }
            if pattern.priority < 0 {
                return Err(format!(
                    "patterns[{idx}] '{}': priority must be >= 0",
                    pattern.name
                ));
            }
        }
        Ok(())
    }

    /// Apply recoverable corrections (currently the redaction template)
    pub fn normalize(&mut self) {
        self.sanitizer.normalize();
    }

    /// Build a sanitizer from the `[sanitizer]` table and the custom patterns
    pub fn build_sanitizer(&self) -> result::Result<Sanitizer> {
        Sanitizer::with_patterns(self.sanitizer.clone(), self.patterns.clone())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Human-readable logs on stderr
    #[serde(default = "default_true")]
    pub console_enabled: bool,

    /// JSON logs in a rotating local file
    #[serde(default)]
    pub local_enabled: bool,

    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,

    #[serde(default = "default_local_file_prefix")]
    pub local_file_prefix: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path must be set when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_enabled: true,
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
            local_file_prefix: default_local_file_prefix(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "phi-guard".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

fn default_local_file_prefix() -> String {
    "phi-guard.log".to_string()
}
