//! Sanitized rendering of error chains and backtraces

use crate::sanitization::{Sanitizer, ERROR_MARKER};
use std::backtrace::Backtrace;
use std::error::Error;

fn clean(sanitizer: &Sanitizer, text: &str) -> String {
    sanitizer
        .sanitize_text(text)
        .unwrap_or_else(|_| ERROR_MARKER.to_string())
}

/// Render `err` and its sources as `outer: cause: root`, sanitized
pub fn sanitize_error_chain(sanitizer: &Sanitizer, err: &(dyn Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    clean(sanitizer, &rendered)
}

/// `anyhow` variant, using its alternate `{:#}` chain rendering
pub fn sanitize_anyhow(sanitizer: &Sanitizer, err: &anyhow::Error) -> String {
    clean(sanitizer, &format!("{err:#}"))
}

/// Sanitize a captured backtrace frame by frame
pub fn sanitize_backtrace(sanitizer: &Sanitizer, backtrace: &Backtrace) -> String {
    backtrace
        .to_string()
        .lines()
        .map(|line| clean(sanitizer, line))
        .collect::<Vec<_>>()
        .join("\n")
}
