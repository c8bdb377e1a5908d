//! In-memory sync engine for tests and single-process use.
//!
//! Models the remote store's observable behaviour: versioned saves,
//! conditional-create rejection, tombstone deletes, and fan-out of
//! snapshots and change events to every open observer. Emissions from this
//! adapter always report full reconciliation since there is no remote lag.

use crate::sync::domain::{ChangeEvent, OpType, Snapshot, SyncRecord};
use crate::sync::error::SyncEngineError;
use crate::sync::ports::{SyncEngine, SyncEngineResult};
use crate::task::domain::RecordKey;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

/// Capacity of each observer channel.
const OBSERVER_CHANNEL_CAPACITY: usize = 32;

/// Thread-safe in-memory sync engine.
#[derive(Debug, Clone, Default)]
pub struct InMemorySyncEngine<T> {
    state: Arc<RwLock<EngineState<T>>>,
}

#[derive(Debug)]
struct EngineState<T> {
    records: HashMap<RecordKey, T>,
    snapshot_observers: Vec<mpsc::Sender<Snapshot<T>>>,
    change_observers: Vec<mpsc::Sender<ChangeEvent<T>>>,
}

impl<T> Default for EngineState<T> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            snapshot_observers: Vec::new(),
            change_observers: Vec::new(),
        }
    }
}

impl<T: SyncRecord> InMemorySyncEngine<T> {
    /// Creates an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(EngineState::default())),
        }
    }

    /// Creates an engine pre-populated with stored records.
    ///
    /// Seeded records receive version `1`, as if previously saved.
    #[must_use]
    pub fn seeded(records: impl IntoIterator<Item = T>) -> Self {
        let engine = Self::new();
        if let Ok(mut state) = engine.state.write() {
            for record in records {
                let stored = record.with_deleted(false).with_version(1);
                state.records.insert(stored.record_key().clone(), stored);
            }
        }
        engine
    }

    fn lock_error(reason: &str) -> SyncEngineError {
        SyncEngineError::transport(std::io::Error::other(reason.to_owned()))
    }

    fn live_items(records: &HashMap<RecordKey, T>) -> Vec<T> {
        records
            .values()
            .filter(|record| !record.is_deleted())
            .cloned()
            .collect()
    }

    /// Applies a mutation under the write lock, then fans the resulting
    /// snapshot and change event out to observers outside of it.
    async fn mutate<F>(&self, apply: F) -> SyncEngineResult<T>
    where
        F: FnOnce(&mut HashMap<RecordKey, T>) -> SyncEngineResult<(T, OpType)>,
    {
        let (stored, op, snapshot, snapshot_txs, change_txs) = {
            let mut state = self
                .state
                .write()
                .map_err(|err| Self::lock_error(&err.to_string()))?;
            let (stored, op) = apply(&mut state.records)?;
            state.snapshot_observers.retain(|tx| !tx.is_closed());
            state.change_observers.retain(|tx| !tx.is_closed());
            (
                stored,
                op,
                Snapshot::new(Self::live_items(&state.records), true),
                state.snapshot_observers.clone(),
                state.change_observers.clone(),
            )
        };
        for tx in snapshot_txs {
            // A closed observer is cleaned up on the next mutation.
            let _delivery = tx.send(snapshot.clone()).await;
        }
        let event = ChangeEvent {
            op,
            element: stored.clone(),
        };
        for tx in change_txs {
            let _delivery = tx.send(event.clone()).await;
        }
        Ok(stored)
    }
}

#[async_trait]
impl<T: SyncRecord> SyncEngine<T> for InMemorySyncEngine<T> {
    async fn query(&self) -> SyncEngineResult<Vec<T>> {
        let state = self
            .state
            .read()
            .map_err(|err| Self::lock_error(&err.to_string()))?;
        Ok(Self::live_items(&state.records))
    }

    async fn observe_query(&self) -> SyncEngineResult<mpsc::Receiver<Snapshot<T>>> {
        let (tx, rx) = mpsc::channel(OBSERVER_CHANNEL_CAPACITY);
        let initial = {
            let mut state = self
                .state
                .write()
                .map_err(|err| Self::lock_error(&err.to_string()))?;
            let snapshot = Snapshot::new(Self::live_items(&state.records), true);
            state.snapshot_observers.push(tx.clone());
            snapshot
        };
        // The store emits the current state immediately on subscribe.
        if tx.send(initial).await.is_err() {
            return Err(Self::lock_error("observer channel closed on subscribe"));
        }
        Ok(rx)
    }

    async fn observe(&self) -> SyncEngineResult<mpsc::Receiver<ChangeEvent<T>>> {
        let (tx, rx) = mpsc::channel(OBSERVER_CHANNEL_CAPACITY);
        let mut state = self
            .state
            .write()
            .map_err(|err| Self::lock_error(&err.to_string()))?;
        state.change_observers.push(tx);
        Ok(rx)
    }

    async fn save(&self, record: &T) -> SyncEngineResult<T> {
        let incoming = record.clone();
        self.mutate(move |records| {
            let key = incoming.record_key().clone();
            let existing = records.get(&key);
            let collision = existing.is_some_and(|current| !current.is_deleted());
            if incoming.version() == 0 && collision {
                return Err(SyncEngineError::ConditionalCheckFailed { key });
            }
            let next_version = existing.map_or(0, SyncRecord::version).saturating_add(1);
            let op = if existing.is_some() {
                OpType::Update
            } else {
                OpType::Create
            };
            let stored = incoming.with_deleted(false).with_version(next_version);
            records.insert(key, stored.clone());
            Ok((stored, op))
        })
        .await
    }

    async fn delete(&self, record: &T) -> SyncEngineResult<()> {
        let key = record.record_key().clone();
        self.mutate(move |records| {
            let existing = records
                .get(&key)
                .filter(|current| !current.is_deleted())
                .cloned()
                .ok_or_else(|| SyncEngineError::NotFound { key: key.clone() })?;
            let next_version = existing.version().saturating_add(1);
            let stored = existing.with_deleted(true).with_version(next_version);
            records.insert(key.clone(), stored.clone());
            Ok((stored, OpType::Delete))
        })
        .await
        .map(|_| ())
    }
}
