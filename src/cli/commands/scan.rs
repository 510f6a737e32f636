//! Scan command implementation
//!
//! This module implements the `scan` command: a dry run that reports what
//! would be redacted without printing any matched values.

use super::{read_input, write_output, EngineOverrides};
use crate::sanitization::{DetectionReport, SanitizableValue, Sanitizer};
use anyhow::Context;
use clap::{Args, ValueEnum};
use serde_json::Value;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Input file (stdin when omitted)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Treat the input as a JSON document; sensitive field names and the
    /// depth limit apply as they do for `sanitize --json`
    #[arg(long)]
    pub json: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    #[command(flatten)]
    pub overrides: EngineOverrides,
}

impl ScanArgs {
    /// Execute the scan command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(json = self.json, "Scanning input for PHI");

        let sanitizer = match self.overrides.build_sanitizer(config_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("❌ Failed to load configuration");
                eprintln!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let input = read_input(self.input.as_deref()).await?;

        let report = match self.build_report(&sanitizer, &input) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Scan failed");
                eprintln!("❌ Scan failed");
                eprintln!("   Error: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        let rendered = match self.format {
            ReportFormat::Text => report.format_console(),
            ReportFormat::Json => {
                let mut json = report.format_json()?;
                json.push('\n');
                json
            }
        };
        write_output(self.output.as_deref(), &rendered).await?;

        tracing::info!(
            inputs = report.total_inputs,
            detected = report.total_detected,
            "Scan complete"
        );
        Ok(0)
    }

    fn build_report(&self, sanitizer: &Sanitizer, input: &str) -> anyhow::Result<DetectionReport> {
        let report = if self.json {
            let document: Value =
                serde_json::from_str(input).context("Input is not a valid JSON document")?;
            sanitizer.report_value(&SanitizableValue::from(document))?
        } else {
            sanitizer.report(input.lines())?
        };
        Ok(report)
    }
}
