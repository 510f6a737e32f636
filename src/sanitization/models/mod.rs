//! Data models shared by detection, resolution and redaction

pub mod category;
pub mod span;
pub mod value;

pub use category::PhiCategory;
pub use span::{CandidateSpan, ResolvedSpan};
pub use value::{SanitizableValue, Scalar};
