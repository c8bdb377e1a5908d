//! Validator port for write-path schema validation.
//!
//! Every create/update is validated before being sent to the remote
//! store; validation failures short-circuit locally and never reach it.

use crate::sync::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Port for record schema validation.
///
/// # Implementation Notes
///
/// Implementations should:
/// - Collect all validation errors before returning (not fail-fast)
/// - Use `ValidationError::multiple` to combine errors
/// - Be stateless and thread-safe
pub trait RecordValidator<T>: Send + Sync {
    /// Validates a record against all rules.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any rule fails; multiple failures are
    /// combined using `ValidationError::Multiple`.
    fn validate(&self, record: &T) -> ValidationResult<()>;
}
