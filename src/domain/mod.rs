//! Domain error handling for phi-guard.
//!
//! - **Error type** ([`PhiGuardError`])
//! - **Result type alias** ([`Result`])
//! - **Context extension** ([`context::ResultExt`])
//!
//! ```rust
//! use phi_guard::domain::{PhiGuardError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(PhiGuardError::Validation("partial_visible_chars must be > 0".into()))
//! }
//! # assert!(example().is_err());
//! ```

pub mod context;
pub mod errors;
pub mod result;

pub use errors::PhiGuardError;
pub use result::Result;
