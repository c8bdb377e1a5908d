//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The expiry instant precedes the start instant.
    #[error("expiry {expire_ms} precedes start {start_ms}")]
    ExpiryBeforeStart {
        /// Start instant in epoch milliseconds.
        start_ms: i64,
        /// Expiry instant in epoch milliseconds.
        expire_ms: i64,
    },

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The recall grace window is negative.
    #[error("recall window of {0} minutes is negative")]
    NegativeRecallWindow(i64),
}

/// Error returned while parsing task kinds from storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task kind: {0}")]
pub struct ParseTaskKindError(pub String);

/// Error returned while parsing task statuses from storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
