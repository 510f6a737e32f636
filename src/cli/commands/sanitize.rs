//! Sanitize command implementation
//!
//! This module implements the `sanitize` command, which redacts PHI from
//! line-oriented text or from a JSON document.

use super::{read_input, write_output, EngineOverrides};
use crate::sanitization::Sanitizer;
use anyhow::Context;
use clap::Args;
use serde_json::Value;

/// Arguments for the sanitize command
#[derive(Args, Debug)]
pub struct SanitizeArgs {
    /// Input file (stdin when omitted)
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Treat the input as a single JSON document
    #[arg(long)]
    pub json: bool,

    /// Treat every line as the value of this field
    #[arg(long, conflicts_with = "json")]
    pub field: Option<String>,

    #[command(flatten)]
    pub overrides: EngineOverrides,
}

impl SanitizeArgs {
    /// Execute the sanitize command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let sanitizer = match self.overrides.build_sanitizer(config_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("❌ Failed to load configuration");
                eprintln!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let input = read_input(self.input.as_deref()).await?;

        let output = match self.render(&sanitizer, &input) {
            Ok(o) => o,
            Err(e) => {
                tracing::error!(error = %e, "Sanitization failed");
                eprintln!("❌ Sanitization failed");
                eprintln!("   Error: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        write_output(self.output.as_deref(), &output).await?;

        tracing::info!(
            input_bytes = input.len(),
            output_bytes = output.len(),
            json = self.json,
            "Sanitization complete"
        );
        Ok(0)
    }

    /// Sanitize the whole input according to the selected mode
    fn render(&self, sanitizer: &Sanitizer, input: &str) -> anyhow::Result<String> {
        if self.json {
            let document: Value =
                serde_json::from_str(input).context("Input is not a valid JSON document")?;
            let clean = sanitizer.sanitize_json(document)?;
            let mut rendered = serde_json::to_string_pretty(&clean)?;
            rendered.push('\n');
            return Ok(rendered);
        }

        let mut rendered = String::with_capacity(input.len());
        for line in input.split_inclusive('\n') {
            let (body, ending) = split_line_ending(line);
            let clean = match &self.field {
                Some(name) => sanitizer.sanitize_field(name, body)?,
                None => sanitizer.sanitize_text(body)?,
            };
            rendered.push_str(&clean);
            rendered.push_str(ending);
        }
        Ok(rendered)
    }
}

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitization::SanitizerConfig;
    use serde_json::json;

    fn args(json: bool, field: Option<&str>) -> SanitizeArgs {
        SanitizeArgs {
            input: None,
            output: None,
            json,
            field: field.map(str::to_string),
            overrides: EngineOverrides::default(),
        }
    }

    fn sanitizer() -> Sanitizer {
        Sanitizer::new(SanitizerConfig::default()).unwrap()
    }

    #[test]
    fn test_split_line_ending() {
        assert_eq!(split_line_ending("a\r\n"), ("a", "\r\n"));
        assert_eq!(split_line_ending("a\n"), ("a", "\n"));
        assert_eq!(split_line_ending("a"), ("a", ""));
    }

    #[test]
    fn test_render_text_preserves_lines() {
        let input = "mail bob@example.org\nnothing here\r\nssn 123-45-6789";
        let out = args(false, None).render(&sanitizer(), input).unwrap();
        assert_eq!(out, "mail [EMAIL]\nnothing here\r\nssn [SSN]");
    }

    #[test]
    fn test_render_field_mode() {
        let out = args(false, Some("password"))
            .render(&sanitizer(), "hunter2\n")
            .unwrap();
        assert!(!out.contains("hunter2"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_render_json_document() {
        let input = json!({"patient": {"email": "a@b.com", "age": 45}}).to_string();
        let out = args(true, None).render(&sanitizer(), &input).unwrap();
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["patient"]["email"], "[EMAIL]");
        assert_eq!(parsed["patient"]["age"], 45);
    }

    #[test]
    fn test_render_rejects_invalid_json() {
        assert!(args(true, None).render(&sanitizer(), "{not json").is_err());
    }

    #[tokio::test]
    async fn test_execute_file_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.log");
        let output = dir.path().join("out.log");
        std::fs::write(&input, "call 555-123-4567 now\n").unwrap();

        let args = SanitizeArgs {
            input: Some(input.to_string_lossy().into_owned()),
            output: Some(output.to_string_lossy().into_owned()),
            json: false,
            field: None,
            overrides: EngineOverrides::default(),
        };
        let code = args
            .execute(dir.path().join("absent.toml").to_str().unwrap())
            .await
            .unwrap();

        assert_eq!(code, 0);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "call [PHONE] now\n");
    }

    #[tokio::test]
    async fn test_execute_invalid_config_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("phi-guard.toml");
        std::fs::write(&config, "[sanitizer]\npartial_visible_chars = 0\n").unwrap();

        let code = args(false, None)
            .execute(config.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
