//! Remote sync engine port.
//!
//! The engine is an opaque, eventually-consistent, multi-writer store.
//! This crate does not implement replication, conflict resolution, or
//! storage internals; it consumes the boundary below.

use crate::sync::domain::{ChangeEvent, Snapshot, SyncRecord};
use crate::sync::error::SyncEngineError;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Result type for engine operations.
pub type SyncEngineResult<T> = Result<T, SyncEngineError>;

/// Remote store contract for one entity collection.
#[async_trait]
pub trait SyncEngine<T: SyncRecord>: Send + Sync {
    /// Point-in-time read of all live (non-tombstoned) records.
    async fn query(&self) -> SyncEngineResult<Vec<T>>;

    /// Opens a live query subscription.
    ///
    /// Every emission carries the current live item list and the store's
    /// reconciliation state; tombstoned records are already excluded.
    async fn observe_query(&self) -> SyncEngineResult<mpsc::Receiver<Snapshot<T>>>;

    /// Opens the low-level change event stream, including delete events.
    async fn observe(&self) -> SyncEngineResult<mpsc::Receiver<ChangeEvent<T>>>;

    /// Persists a record and returns the stored representation.
    ///
    /// # Errors
    ///
    /// Returns [`SyncEngineError::ConditionalCheckFailed`] when a
    /// never-saved record collides with an existing live record under the
    /// same key.
    async fn save(&self, record: &T) -> SyncEngineResult<T>;

    /// Tombstones a record.
    ///
    /// # Errors
    ///
    /// Returns [`SyncEngineError::NotFound`] when no live record carries
    /// the key.
    async fn delete(&self, record: &T) -> SyncEngineResult<()>;
}
