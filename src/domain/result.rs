//! Result type alias for phi-guard

use super::errors::PhiGuardError;

/// Result type alias for phi-guard operations
///
/// # Examples
///
/// ```
/// use phi_guard::domain::result::Result;
/// use phi_guard::domain::errors::PhiGuardError;
///
/// fn failing_function() -> Result<()> {
///     Err(PhiGuardError::Validation("Invalid input".to_string()))
/// }
///
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, PhiGuardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(PhiGuardError::Validation("test error".to_string()));
        assert!(result.is_err());
    }
}
