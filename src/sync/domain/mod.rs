//! Domain types for the synchronization boundary.

use crate::task::domain::{RecordKey, Task};
use serde::{Deserialize, Serialize};

/// Operation carried by a low-level change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpType {
    /// A record appeared.
    Create,
    /// A record changed.
    Update,
    /// A record was tombstoned.
    Delete,
}

/// One delivery of the locally-held item list.
///
/// `fully_reconciled` reports whether the list is known to match the remote
/// store's current state; consumers keep rendering stale-but-available
/// items while it is `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T> {
    /// The item list, excluding tombstoned records.
    pub items: Vec<T>,
    /// Whether the list matches the remote store's current state.
    pub fully_reconciled: bool,
}

impl<T> Snapshot<T> {
    /// Creates a snapshot delivery.
    #[must_use]
    pub const fn new(items: Vec<T>, fully_reconciled: bool) -> Self {
        Self {
            items,
            fully_reconciled,
        }
    }

    /// The degraded delivery used when a read or stream fails.
    #[must_use]
    pub const fn empty_unreconciled() -> Self {
        Self {
            items: Vec::new(),
            fully_reconciled: false,
        }
    }
}

/// Low-level change event observed from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent<T> {
    /// The operation that produced the event.
    pub op: OpType,
    /// The affected record.
    pub element: T,
}

/// Contract records must satisfy to be held in a sync subscription.
///
/// The versioning and tombstone accessors exist for the store side of the
/// boundary; application code treats them as read-only.
pub trait SyncRecord: Clone + Send + Sync + 'static {
    /// Remote-store key addressing the record.
    fn record_key(&self) -> &RecordKey;

    /// Entity kind label used in diagnostics.
    fn kind_label() -> &'static str;

    /// Store-assigned version counter; `0` marks a record never saved.
    fn version(&self) -> i64;

    /// Returns a copy carrying the given store-assigned version.
    #[must_use]
    fn with_version(self, version: i64) -> Self;

    /// Soft-delete tombstone flag.
    fn is_deleted(&self) -> bool;

    /// Returns a copy with the tombstone flag set accordingly.
    #[must_use]
    fn with_deleted(self, deleted: bool) -> Self;
}

impl SyncRecord for Task {
    fn record_key(&self) -> &RecordKey {
        &self.key
    }

    fn kind_label() -> &'static str {
        "task"
    }

    fn version(&self) -> i64 {
        self.sync.version
    }

    fn with_version(mut self, version: i64) -> Self {
        self.sync.version = version;
        self
    }

    fn is_deleted(&self) -> bool {
        self.sync.deleted
    }

    fn with_deleted(mut self, deleted: bool) -> Self {
        self.sync.deleted = deleted;
        self
    }
}

/// Subscription-scoped de-duplication of observability noise.
///
/// Tracks the last delivered `(item count, reconciliation state)` signature
/// so repeated identical emissions are suppressed from logging. Advisory
/// only: deliveries themselves always go through.
#[derive(Debug, Default)]
pub struct Diagnostics {
    last_signature: Option<(usize, bool)>,
}

impl Diagnostics {
    /// Creates a fresh tracker with no recorded signature.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_signature: None,
        }
    }

    /// Records a delivery and reports whether it is worth logging.
    ///
    /// Returns `false` when the signature matches the previous delivery.
    pub fn observe(&mut self, item_count: usize, fully_reconciled: bool) -> bool {
        let signature = (item_count, fully_reconciled);
        if self.last_signature == Some(signature) {
            return false;
        }
        self.last_signature = Some(signature);
        true
    }
}
