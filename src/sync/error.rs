//! Error types for the synchronization boundary.
//!
//! Uses `thiserror` for typed variants that callers can inspect.
//! Validation failures are field-path annotated and aggregate; engine
//! failures separate idempotency conditions (conditional-write rejection,
//! missing record) from genuine transport faults.

use crate::task::domain::RecordKey;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by write-path schema validation.
///
/// Always recoverable by the caller correcting input; never sent to the
/// remote store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("required field '{path}' is missing or empty")]
    MissingField {
        /// Path of the offending field.
        path: &'static str,
    },

    /// A field value violates the schema.
    #[error("field '{path}' is invalid: {reason}")]
    InvalidField {
        /// Path of the offending field.
        path: &'static str,
        /// Description of the violation.
        reason: String,
    },

    /// Multiple validation errors occurred.
    #[error("multiple validation errors: {}", format_errors(.0))]
    Multiple(Vec<Self>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Creates an invalid-field error.
    #[must_use]
    pub fn invalid_field(path: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            path,
            reason: reason.into(),
        }
    }

    /// Combines multiple validation errors into a single error.
    ///
    /// A single error is returned directly rather than wrapped; an empty
    /// vector collapses to an internal invalid-field error.
    #[must_use]
    pub fn multiple(errors: Vec<Self>) -> Self {
        match errors.len() {
            0 => {
                debug_assert!(false, "multiple() called with empty errors vector");
                Self::invalid_field("", "internal error: no validation errors")
            }
            1 => errors.into_iter().next().unwrap_or_else(|| {
                Self::invalid_field("", "internal error: no validation errors")
            }),
            _ => Self::Multiple(errors),
        }
    }

    /// Returns the individual errors if this is a `Multiple` variant.
    #[must_use]
    pub fn errors(&self) -> Option<&[Self]> {
        match self {
            Self::Multiple(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Errors returned by remote sync engine implementations.
#[derive(Debug, Clone, Error)]
pub enum SyncEngineError {
    /// A conditional write was rejected because a record with the key
    /// already exists.
    #[error("conditional write rejected for {key}")]
    ConditionalCheckFailed {
        /// Key of the colliding record.
        key: RecordKey,
    },

    /// No live record carries the key.
    #[error("record not found: {key}")]
    NotFound {
        /// Key of the missing record.
        key: RecordKey,
    },

    /// Transport-level failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl SyncEngineError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

/// Errors surfaced by orchestrator CRUD operations.
///
/// Conflict and idempotency conditions are resolved internally and do not
/// appear here; subscription-level failures degrade through the data
/// channel instead of this type.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Write-path schema validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The engine reported a non-recoverable failure.
    #[error(transparent)]
    Engine(#[from] SyncEngineError),

    /// A conditional-write collision could not be resolved to the
    /// pre-existing record.
    #[error("conflicting record for {key} could not be retrieved")]
    Conflict {
        /// Key of the colliding record.
        key: RecordKey,
    },
}
