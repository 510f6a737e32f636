//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::PhiGuardConfig;
use crate::domain::errors::PhiGuardError;
use crate::domain::result::Result;
use crate::sanitization::PatternDefinition;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`PhiGuardConfig`]
/// 4. Applies environment variable overrides (`PHI_GUARD_*` prefix)
/// 5. Normalizes and validates the configuration
///
/// # Errors
///
/// Returns [`PhiGuardError::Configuration`] if the file cannot be read, a
/// referenced variable is unset, parsing fails, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use phi_guard::config::load_config;
///
/// let config = load_config("phi-guard.toml").expect("Failed to load config");
/// println!("sensitivity: {}", config.sanitizer.sensitivity);
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PhiGuardConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PhiGuardError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PhiGuardError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    parse_config_in(&contents, path.parent())
}

/// Same as [`load_config`], from an in-memory document
///
/// Relative `pattern_files` entries resolve against the working directory.
pub fn parse_config(contents: &str) -> Result<PhiGuardConfig> {
    parse_config_in(contents, None)
}

fn parse_config_in(contents: &str, base_dir: Option<&Path>) -> Result<PhiGuardConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: PhiGuardConfig = toml::from_str(&contents)
        .map_err(|e| PhiGuardError::Configuration(format!("Failed to parse TOML: {e}")))?;

    load_pattern_files(&mut config, base_dir)?;
    apply_env_overrides(&mut config)?;
    config.normalize();

    config.validate().map_err(|e| {
        PhiGuardError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Appends the definitions of every `pattern_files` entry to `patterns`
fn load_pattern_files(config: &mut PhiGuardConfig, base_dir: Option<&Path>) -> Result<()> {
    for file in &config.pattern_files {
        let path = match base_dir {
            Some(dir) if Path::new(file).is_relative() => dir.join(file),
            _ => PathBuf::from(file),
        };
        let definitions = PatternDefinition::load_library(&path)
            .map_err(|e| PhiGuardError::Configuration(e.to_string()))?;
        tracing::debug!(
            file = %path.display(),
            count = definitions.len(),
            "Loaded pattern file"
        );
        config.patterns.extend(definitions);
    }
    Ok(())
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are copied through untouched. All missing variables are
/// reported together.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PhiGuardError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(PhiGuardError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_override<T: std::str::FromStr>(var: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        PhiGuardError::Configuration(format!("Invalid value for {var}: '{value}'"))
    })
}

/// Applies environment variable overrides using the `PHI_GUARD_*` prefix
///
/// Variables follow the pattern `PHI_GUARD_<SECTION>_<KEY>`, for example
/// `PHI_GUARD_SANITIZER_SENSITIVITY` or `PHI_GUARD_LOGGING_LOCAL_PATH`.
fn apply_env_overrides(config: &mut PhiGuardConfig) -> Result<()> {
    let var = |name: &str| std::env::var(name).ok();

    // Application overrides
    if let Some(val) = var("PHI_GUARD_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Sanitizer overrides
    let s = &mut config.sanitizer;
    if let Some(val) = var("PHI_GUARD_SANITIZER_ENABLED") {
        s.enabled = parse_override("PHI_GUARD_SANITIZER_ENABLED", &val)?;
    }
    if let Some(val) = var("PHI_GUARD_SANITIZER_SENSITIVITY") {
        s.sensitivity = val.parse()?;
    }
    if let Some(val) = var("PHI_GUARD_SANITIZER_REDACTION_MODE") {
        s.redaction_mode = val.parse()?;
    }
    if let Some(val) = var("PHI_GUARD_SANITIZER_REDACTION_MARKER") {
        s.redaction_marker = val;
    }
    if let Some(val) = var("PHI_GUARD_SANITIZER_HASH_SALT") {
        s.hash_salt = super::secret::secret_string(val);
    }
    if let Some(val) = var("PHI_GUARD_SANITIZER_MAX_INPUT_SIZE_BYTES") {
        s.max_input_size_bytes = parse_override("PHI_GUARD_SANITIZER_MAX_INPUT_SIZE_BYTES", &val)?;
    }
    if let Some(val) = var("PHI_GUARD_SANITIZER_ALLOW_EXCEPTIONS_TO_PROPAGATE") {
        s.allow_exceptions_to_propagate =
            parse_override("PHI_GUARD_SANITIZER_ALLOW_EXCEPTIONS_TO_PROPAGATE", &val)?;
    }

    // Logging overrides
    if let Some(val) = var("PHI_GUARD_LOGGING_CONSOLE_ENABLED") {
        config.logging.console_enabled = parse_override("PHI_GUARD_LOGGING_CONSOLE_ENABLED", &val)?;
    }
    if let Some(val) = var("PHI_GUARD_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("PHI_GUARD_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = var("PHI_GUARD_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
