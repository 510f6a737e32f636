//! CLI command implementations
//!
//! This module contains all CLI command implementations and the input and
//! output plumbing they share.

pub mod init;
pub mod sanitize;
pub mod scan;
pub mod validate;

use crate::config::{load_config, PhiGuardConfig};
use crate::domain::result::Result;
use crate::sanitization::{RedactionMode, Sanitizer, Sensitivity};
use anyhow::Context;
use clap::Args;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Load the configuration file, or the defaults when it does not exist
pub fn resolve_config(config_path: &str) -> Result<PhiGuardConfig> {
    if Path::new(config_path).exists() {
        return load_config(config_path);
    }

    tracing::debug!(config_path = %config_path, "Configuration file not found, using defaults");
    let mut config = PhiGuardConfig::default();
    config.normalize();
    Ok(config)
}

/// Command-line overrides of the `[sanitizer]` table
#[derive(Args, Debug, Default, Clone)]
pub struct EngineOverrides {
    /// Detection sensitivity (low, medium, high)
    #[arg(long)]
    pub sensitivity: Option<Sensitivity>,

    /// Redaction mode (full, partial, hash)
    #[arg(long)]
    pub mode: Option<RedactionMode>,
}

impl EngineOverrides {
    /// Load the configuration, apply the overrides and build a sanitizer
    ///
    /// Errors are rendered for display; every one of them is a configuration
    /// problem.
    pub fn build_sanitizer(&self, config_path: &str) -> std::result::Result<Sanitizer, String> {
        let mut config = resolve_config(config_path).map_err(|e| e.to_string())?;
        if let Some(sensitivity) = self.sensitivity {
            config.sanitizer.sensitivity = sensitivity;
        }
        if let Some(mode) = self.mode {
            config.sanitizer.redaction_mode = mode;
        }
        config.build_sanitizer().map_err(|e| e.to_string())
    }
}

/// Read the whole input from a file, or stdin when no path (or `-`) is given
pub(crate) async fn read_input(path: Option<&str>) -> anyhow::Result<String> {
    match path {
        Some(p) if p != "-" => tokio::fs::read_to_string(p)
            .await
            .with_context(|| format!("Failed to read input file: {p}")),
        _ => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

/// Write to a file, or stdout when no path (or `-`) is given
pub(crate) async fn write_output(path: Option<&str>, contents: &str) -> anyhow::Result<()> {
    match path {
        Some(p) if p != "-" => tokio::fs::write(p, contents)
            .await
            .with_context(|| format!("Failed to write output file: {p}")),
        _ => {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(contents.as_bytes())
                .await
                .context("Failed to write stdout")?;
            stdout.flush().await.context("Failed to flush stdout")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_resolve_config_missing_file_uses_defaults() {
        let config = resolve_config("does-not-exist-phi-guard.toml").unwrap();
        assert_eq!(config.application.name, "phi-guard");
    }

    #[test]
    fn test_resolve_config_reports_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[sanitizer]\nmax_depth = 0\n").unwrap();
        assert!(resolve_config(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_overrides_applied() {
        let overrides = EngineOverrides {
            sensitivity: Some(Sensitivity::High),
            mode: Some(RedactionMode::Partial),
        };
        let sanitizer = overrides
            .build_sanitizer("does-not-exist-phi-guard.toml")
            .unwrap();
        assert_eq!(sanitizer.config().sensitivity, Sensitivity::High);
        assert_eq!(sanitizer.config().redaction_mode, RedactionMode::Partial);
    }

    #[tokio::test]
    async fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let path = path.to_str().unwrap();

        write_output(Some(path), "hello\n").await.unwrap();
        assert_eq!(read_input(Some(path)).await.unwrap(), "hello\n");
    }

    #[tokio::test]
    async fn test_read_missing_file_fails() {
        assert!(read_input(Some("/nonexistent/phi-guard/input.txt")).await.is_err());
    }
}
