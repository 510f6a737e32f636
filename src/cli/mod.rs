//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for phi-guard using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// phi-guard - PHI detection and redaction
#[derive(Parser, Debug)]
#[command(name = "phi-guard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "phi-guard.toml", env = "PHI_GUARD_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PHI_GUARD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Redact PHI from text or a JSON document
    Sanitize(commands::sanitize::SanitizeArgs),

    /// Report detected PHI without redacting
    Scan(commands::scan::ScanArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

impl Commands {
    /// Whether the command needs a loaded configuration to run
    pub fn needs_config(&self) -> bool {
        !matches!(self, Commands::Init(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_sanitize() {
        let cli = Cli::parse_from(["phi-guard", "sanitize"]);
        assert_eq!(cli.config, "phi-guard.toml");
        assert!(matches!(cli.command, Commands::Sanitize(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["phi-guard", "--config", "custom.toml", "scan"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::Scan(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["phi-guard", "--log-level", "debug", "sanitize"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_sanitize_json_from_file() {
        let cli = Cli::parse_from(["phi-guard", "sanitize", "--json", "--input", "doc.json"]);
        match cli.command {
            Commands::Sanitize(args) => {
                assert!(args.json);
                assert_eq!(args.input.as_deref(), Some("doc.json"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["phi-guard", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
        assert!(cli.command.needs_config());
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["phi-guard", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
        assert!(!cli.command.needs_config());
    }
}
