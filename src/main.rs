// phi-guard - PHI detection and redaction
// Copyright (c) 2025 phi-guard Contributors
// Licensed under the MIT License

use clap::Parser;
use phi_guard::cli::commands::resolve_config;
use phi_guard::cli::{Cli, Commands};
use phi_guard::config::PhiGuardConfig;
use phi_guard::log_error_with_context;
use phi_guard::logging::init_logging;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Commands report their own configuration errors; logging falls back to
    // the defaults so it is never left unsanitized.
    let config = if cli.command.needs_config() {
        resolve_config(&cli.config).unwrap_or_default()
    } else {
        PhiGuardConfig::default()
    };

    let sanitizer = match config.build_sanitizer() {
        Ok(s) => Arc::new(s),
        Err(e) => {
            eprintln!("Failed to initialize sanitizer: {e}");
            process::exit(5);
        }
    };

    let log_level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.application.log_level.clone());
    let guard = match init_logging(&log_level, &config.logging, sanitizer) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "phi-guard - PHI detection and redaction"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            log_error_with_context!(e, "Command execution failed");
            eprintln!("Error: {e:#}");
            5 // Fatal error exit code
        }
    };

    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Sanitize(args) => args.execute(&cli.config).await,
        Commands::Scan(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
