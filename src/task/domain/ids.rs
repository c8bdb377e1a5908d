//! Identifier types for task records.
//!
//! Generated identifiers embed a creation-timestamp prefix so the task's
//! age can be recovered without a separate persisted field. Remote-store
//! keys are either supplied by the source system or derived
//! deterministically from stable content fields.

use super::TaskKind;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// Opaque, globally unique task identifier.
///
/// Generated identifiers take the form `{epoch_millis}-{uuid}`; the prefix
/// records the creation instant. Externally supplied identifiers are
/// accepted verbatim and may carry no recoverable timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a new identifier stamped with the clock's current instant.
    #[must_use]
    pub fn generate(clock: &impl Clock) -> Self {
        let millis = clock.utc().timestamp_millis();
        Self(format!("{millis}-{}", Uuid::new_v4()))
    }

    /// Wraps an externally supplied identifier without interpretation.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recovers the creation instant from the embedded timestamp prefix.
    ///
    /// Returns `None` when the prefix is absent or unparseable. Callers must
    /// treat `None` as "age unknown" and skip age-based filtering.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let prefix = self.0.split('-').next()?;
        let millis: i64 = prefix.parse().ok()?;
        DateTime::from_timestamp_millis(millis)
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Composite partition/sort key addressing a record in the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pk: String,
    sk: String,
}

impl RecordKey {
    /// Creates a key from source-supplied partition and sort components.
    #[must_use]
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }

    /// Derives a deterministic key from stable content fields.
    ///
    /// The derivation hashes title, kind, and group date, never a volatile
    /// per-instance identifier, so repeated imports of the same logical
    /// task converge on the same key.
    #[must_use]
    pub fn derive(title: &str, kind: TaskKind, date: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(title.trim().as_bytes());
        hasher.update([0u8]);
        hasher.update(kind.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(date.trim().as_bytes());
        let digest = hasher.finalize();
        let fingerprint: String = digest.iter().take(16).map(|byte| format!("{byte:02x}")).collect();
        Self {
            pk: format!("TASK#{fingerprint}"),
            sk: format!("{}#{}", date.trim(), kind.as_str()),
        }
    }

    /// Returns the partition component.
    #[must_use]
    pub fn pk(&self) -> &str {
        &self.pk
    }

    /// Returns the sort component.
    #[must_use]
    pub fn sk(&self) -> &str {
        &self.sk
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.pk, self.sk)
    }
}
