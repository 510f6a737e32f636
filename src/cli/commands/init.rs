//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "phi-guard.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing phi-guard configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. For hash redaction, set PHI_GUARD_SANITIZER_HASH_SALT in .env");
                println!("  3. Validate configuration: phi-guard validate-config");
                println!("  4. Dry run on sample logs: phi-guard scan --input app.log");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# phi-guard Configuration File
# PHI detection and redaction

[application]
name = "phi-guard"
log_level = "info"

[sanitizer]
enabled = true
sensitivity = "medium"
redaction_mode = "full"
redaction_marker = "[{category}]"
max_input_size_bytes = 1048576

[logging]
console_enabled = true
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# phi-guard Configuration File
# PHI detection and redaction
#
# This file contains all configuration options with examples and explanations.
# Values may reference environment variables with ${VAR_NAME}, and any
# setting can be overridden with PHI_GUARD_<SECTION>_<KEY>.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Application name (used in logging)
name = "phi-guard"

# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Sanitizer Settings
# ============================================================================
[sanitizer]
# Master switch; when false values pass through untouched
enabled = true

# Detection sensitivity: low | medium | high
# - low: only strong, context-free patterns
# - medium: context-dependent patterns need clinical vocabulary nearby
# - high: every pattern, weakest false-positive filtering
sensitivity = "medium"

# Redaction mode: full | partial | hash
redaction_mode = "full"

# Marker for full redaction; must contain {category}
redaction_marker = "[{category}]"

# Trailing characters kept by partial redaction
partial_visible_chars = 4

# Salt for hash redaction (keep it out of this file)
# hash_salt = "${PHI_GUARD_HASH_SALT}"

# Hex characters kept from the SHA-256 digest (1-64)
hash_length = 12

# Inputs above this size are replaced by a truncation marker
max_input_size_bytes = 1048576

# Mapping keys whose values are always redacted
sensitive_field_names = [
    "ssn",
    "date_of_birth",
    "mrn",
    "password",
    "token",
]
case_sensitive_field_names = false

# Walk nested mappings and sequences
scan_nested_structures = true

# Also scan mapping keys for PHI
scan_mapping_keys = false

# Containers nested deeper than this are truncated
max_depth = 32

# Return errors instead of the error marker
allow_exceptions_to_propagate = false

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Human-readable logs on stderr
console_enabled = true

# JSON logs in a rotating local file
local_enabled = false
local_path = "./logs"

# Log rotation (daily, hourly, never)
local_rotation = "daily"
local_file_prefix = "phi-guard.log"

# ============================================================================
# Custom Patterns
# ============================================================================
# Custom patterns are added to the built-in library; a name that already
# exists adds an alternate matcher rather than replacing the built-in one.
#
# matcher_kind: regex | exact_literal | fuzzy_substring | context_keyword_set
# priority: 0-10, higher wins when matches overlap

[[patterns]]
name = "employee_id"
category = "OTHER"
matcher_kind = "regex"
pattern = 'EMP-\d{6}'
priority = 6

[[patterns]]
name = "member_number"
category = "POLICY_NUMBER"
matcher_kind = "context_keyword_set"
pattern = "member number, enrollee"
priority = 7
redaction_label = "[MEMBER]"
"#
        .to_string()
    }
}
