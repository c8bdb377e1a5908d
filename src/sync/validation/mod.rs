//! Write-path schema validation for task records.
//!
//! Each rule is a pure function validating one aspect of the record;
//! the validator composes them and aggregates failures so the caller gets
//! comprehensive feedback rather than the first error.

use crate::sync::error::ValidationError;
use crate::sync::ports::{RecordValidator, ValidationResult};
use crate::task::domain::Task;

/// Configurable limits for task record validation.
#[derive(Debug, Clone)]
pub struct ValidationLimits {
    /// Maximum title length in characters.
    pub max_title_len: usize,
}

impl ValidationLimits {
    /// Lenient limits for bulk-import contexts.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            max_title_len: 4096,
        }
    }
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self { max_title_len: 512 }
    }
}

/// Validates that the record carries a non-empty identifier.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] when the identifier is empty.
pub fn validate_identity(task: &Task) -> ValidationResult<()> {
    if task.id.as_str().trim().is_empty() {
        return Err(ValidationError::MissingField { path: "id" });
    }
    Ok(())
}

/// Validates that both key components are present.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] naming the empty component.
pub fn validate_key(task: &Task) -> ValidationResult<()> {
    if task.key.pk().trim().is_empty() {
        return Err(ValidationError::MissingField { path: "key.pk" });
    }
    if task.key.sk().trim().is_empty() {
        return Err(ValidationError::MissingField { path: "key.sk" });
    }
    Ok(())
}

/// Validates title presence and length.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] for an empty title or
/// [`ValidationError::InvalidField`] when it exceeds the limit.
pub fn validate_title(task: &Task, limits: &ValidationLimits) -> ValidationResult<()> {
    let trimmed = task.title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField { path: "title" });
    }
    let length = trimmed.chars().count();
    if length > limits.max_title_len {
        return Err(ValidationError::invalid_field(
            "title",
            format!("{length} characters exceeds limit of {}", limits.max_title_len),
        ));
    }
    Ok(())
}

/// Validates the temporal window invariant.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidField`] when the expiry precedes the
/// start.
pub fn validate_window(task: &Task) -> ValidationResult<()> {
    task.validate_window()
        .map_err(|error| ValidationError::invalid_field("expire_time_ms", error.to_string()))
}

/// Validates the recall grant sign.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidField`] for a negative grace window.
pub fn validate_recall(task: &Task) -> ValidationResult<()> {
    if let Some(minutes) = task.can_recall_minutes
        && minutes < 0
    {
        return Err(ValidationError::invalid_field(
            "can_recall_minutes",
            format!("{minutes} minutes is negative"),
        ));
    }
    Ok(())
}

/// Default implementation of the task record validator.
///
/// Applies all rules, collecting errors to provide comprehensive feedback
/// rather than failing on the first.
#[derive(Debug, Clone, Default)]
pub struct TaskRecordValidator {
    limits: ValidationLimits,
}

impl TaskRecordValidator {
    /// Creates a validator with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator with custom limits.
    #[must_use]
    pub const fn with_limits(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    /// Returns the current limits.
    #[must_use]
    pub const fn limits(&self) -> &ValidationLimits {
        &self.limits
    }
}

impl RecordValidator<Task> for TaskRecordValidator {
    fn validate(&self, record: &Task) -> ValidationResult<()> {
        let mut errors = Vec::new();
        let checks = [
            validate_identity(record),
            validate_key(record),
            validate_title(record, &self.limits),
            validate_window(record),
            validate_recall(record),
        ];
        for outcome in checks {
            if let Err(error) = outcome {
                errors.push(error);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::multiple(errors))
        }
    }
}
