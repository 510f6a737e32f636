//! Validate config command implementation
//!
//! This module implements the `validate-config` command, which loads the
//! configuration, builds the pattern catalog and prints a summary.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Treat dropped custom patterns as a configuration error
    #[arg(long)]
    pub strict: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Load configuration (parsing, overrides and validation)
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        // Build the catalog
        let sanitizer = match config.build_sanitizer() {
            Ok(s) => {
                println!("✅ Pattern catalog built");
                s
            }
            Err(e) => {
                println!("❌ Failed to build sanitizer");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let catalog = sanitizer.catalog();
        let settings = sanitizer.config();

        println!();
        println!("Configuration Summary:");
        println!("  Application: {}", config.application.name);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Sanitizer Enabled: {}", settings.enabled);
        println!("  Sensitivity: {}", settings.sensitivity);
        println!("  Redaction Mode: {}", settings.redaction_mode);
        println!("  Redaction Marker: {}", settings.redaction_marker);
        println!("  Max Input Size: {} bytes", settings.max_input_size_bytes);
        println!("  Max Depth: {}", settings.max_depth);
        println!("  Sensitive Fields: {}", settings.sensitive_field_names.len());
        println!("  Strict Errors: {}", settings.allow_exceptions_to_propagate);
        println!("  Active Patterns: {}", catalog.len());
        println!("  Custom Patterns: {}", config.patterns.len());
        println!(
            "  Code Context Detectors: {}",
            catalog.code_context_detectors().len()
        );
        println!("  Dropped Patterns: {}", catalog.dropped().len());
        for dropped in catalog.dropped() {
            println!("    ⚠️  {}: {}", dropped.name, dropped.reason);
        }
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                config.logging.local_path.as_str()
            } else {
                "disabled"
            }
        );
        println!();

        if self.strict && !catalog.dropped().is_empty() {
            println!("❌ Strict validation failed: some patterns did not compile");
            return Ok(2);
        }

        println!("✅ Configuration is valid");
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let args = ValidateArgs { strict: false };
        let code = args.execute("nonexistent-phi-guard.toml").await.unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_valid_config() {
        let file = write_config("[sanitizer]\nsensitivity = \"high\"\n");
        let args = ValidateArgs { strict: false };
        let code = args.execute(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_dropped_pattern_strict_mode() {
        let file = write_config(
            r#"
[[patterns]]
name = "broken"
category = "OTHER"
pattern = "(unclosed"
priority = 5
"#,
        );
        let path = file.path().to_str().unwrap();

        assert_eq!(ValidateArgs { strict: false }.execute(path).await.unwrap(), 0);
        assert_eq!(ValidateArgs { strict: true }.execute(path).await.unwrap(), 2);
    }
}
