//! Configuration management for phi-guard
//!
//! TOML-based configuration with:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PHI_GUARD_<SECTION>_<KEY>` environment overrides
//! - Default values for every optional setting
//! - Validation and template normalization on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! name = "phi-guard"
//! log_level = "info"
//!
//! [sanitizer]
//! sensitivity = "medium"
//! redaction_mode = "full"
//! redaction_marker = "[{category}]"
//! hash_salt = "${PHI_GUARD_HASH_SALT}"
//!
//! [logging]
//! local_enabled = true
//! local_path = "./logs"
//!
//! [[patterns]]
//! name = "employee_id"
//! category = "OTHER"
//! pattern = 'EMP-\d{6}'
//! priority = 6
//! ```
//!
//! ```rust,no_run
//! use phi_guard::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("phi-guard.toml")?;
//! println!("Mode: {}", config.sanitizer.redaction_mode);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{ApplicationConfig, LoggingConfig, PhiGuardConfig};
pub use secret::{secret_string, SecretString, SecretValue};
