//! Subscription orchestration and validated CRUD over the sync engine.
//!
//! One subscription owns one forwarding task that merges the immediate
//! point-in-time read with the live snapshot stream and watches the
//! low-level delete events, delivering everything in strict order over a
//! single channel. Failures degrade to empty, not-reconciled deliveries
//! instead of terminating the feed.

use crate::sync::domain::{Diagnostics, OpType, Snapshot, SyncRecord};
use crate::sync::error::{SyncEngineError, SyncError};
use crate::sync::ports::{RecordValidator, SyncEngine};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, warn};

/// Tunables for subscription behaviour.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Debounce window for delete-triggered full refreshes.
    pub delete_refresh_window: Duration,
    /// Capacity of the delivery channel handed to the consumer.
    pub channel_capacity: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            delete_refresh_window: Duration::from_millis(500),
            channel_capacity: 16,
        }
    }
}

/// Maintains a locally-held copy of one entity collection and exposes it
/// as a snapshot feed plus validated CRUD operations.
pub struct SyncOrchestrator<T, E, V>
where
    T: SyncRecord,
    E: SyncEngine<T> + 'static,
    V: RecordValidator<T>,
{
    engine: Arc<E>,
    validator: Arc<V>,
    config: OrchestratorConfig,
    _record: std::marker::PhantomData<fn() -> T>,
}

impl<T, E, V> Clone for SyncOrchestrator<T, E, V>
where
    T: SyncRecord,
    E: SyncEngine<T> + 'static,
    V: RecordValidator<T>,
{
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            validator: Arc::clone(&self.validator),
            config: self.config.clone(),
            _record: std::marker::PhantomData,
        }
    }
}

impl<T, E, V> SyncOrchestrator<T, E, V>
where
    T: SyncRecord,
    E: SyncEngine<T> + 'static,
    V: RecordValidator<T>,
{
    /// Creates an orchestrator over the given engine and validator.
    #[must_use]
    pub fn new(engine: Arc<E>, validator: Arc<V>, config: OrchestratorConfig) -> Self {
        Self {
            engine,
            validator,
            config,
            _record: std::marker::PhantomData,
        }
    }

    /// Opens a subscription to the entity collection.
    ///
    /// The forwarding task issues one immediate point-in-time read and
    /// delivers it ahead of the first live emission, so the consumer is
    /// never left without an initial delivery. Both paths share the one
    /// returned channel.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<T> {
        let (delivery_tx, delivery_rx) = mpsc::channel(self.config.channel_capacity);
        let (close_tx, close_rx) = watch::channel(false);
        let worker = SubscriptionWorker {
            engine: Arc::clone(&self.engine),
            output: delivery_tx,
            diagnostics: Diagnostics::new(),
            refresh_window: self.config.delete_refresh_window,
            last_reconciled: false,
        };
        drop(tokio::spawn(worker.run(close_rx)));
        Subscription {
            receiver: delivery_rx,
            close_flag: close_tx,
        }
    }

    /// Creates a record, tolerating concurrent creation of the same
    /// logical record from another device.
    ///
    /// A conditional-write rejection is treated as success: the
    /// pre-existing record under the same key is queried for and returned.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Validation`] before any write reaches the
    /// store, [`SyncError::Engine`] for transport failures, and
    /// [`SyncError::Conflict`] when a rejected write has no retrievable
    /// counterpart.
    pub async fn create(&self, record: &T) -> Result<T, SyncError> {
        self.validator.validate(record)?;
        match self.engine.save(record).await {
            Ok(saved) => Ok(saved),
            Err(SyncEngineError::ConditionalCheckFailed { .. }) => {
                debug!(
                    kind = T::kind_label(),
                    key = %record.record_key(),
                    "create collided with existing record, resolving to it"
                );
                let items = self.engine.query().await.map_err(SyncError::Engine)?;
                let key = record.record_key().clone();
                items
                    .into_iter()
                    .find(|existing| *existing.record_key() == key)
                    .ok_or(SyncError::Conflict { key })
            }
            Err(error) => Err(SyncError::Engine(error)),
        }
    }

    /// Applies a typed full-record update.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Validation`] before any write reaches the
    /// store, or [`SyncError::Engine`] when the store rejects it.
    pub async fn update(&self, record: &T) -> Result<T, SyncError> {
        self.validator.validate(record)?;
        Ok(self.engine.save(record).await?)
    }

    /// Tombstones a record; deleting an already-deleted record is a no-op
    /// success.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Engine`] for transport failures.
    pub async fn delete(&self, record: &T) -> Result<(), SyncError> {
        if record.is_deleted() {
            return Ok(());
        }
        match self.engine.delete(record).await {
            Ok(()) | Err(SyncEngineError::NotFound { .. }) => Ok(()),
            Err(error) => Err(SyncError::Engine(error)),
        }
    }
}

/// Consumer handle for one subscription.
///
/// Deliveries arrive strictly ordered; [`Subscription::close`] stops the
/// live stream, the delete watcher, and any pending refresh, and is
/// idempotent. Dropping the handle closes it as well.
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: mpsc::Receiver<Snapshot<T>>,
    close_flag: watch::Sender<bool>,
}

impl<T> Subscription<T> {
    /// Receives the next snapshot delivery.
    ///
    /// Returns `None` once the subscription is closed and drained.
    pub async fn recv(&mut self) -> Option<Snapshot<T>> {
        self.receiver.recv().await
    }

    /// Cancels the subscription. Safe to call repeatedly and before any
    /// delivery was received.
    pub fn close(&self) {
        self.close_flag.send_replace(true);
    }
}

/// The forwarding task backing one subscription.
struct SubscriptionWorker<T, E> {
    engine: Arc<E>,
    output: mpsc::Sender<Snapshot<T>>,
    diagnostics: Diagnostics,
    refresh_window: Duration,
    last_reconciled: bool,
}

impl<T, E> SubscriptionWorker<T, E>
where
    T: SyncRecord,
    E: SyncEngine<T>,
{
    async fn run(mut self, mut closed: watch::Receiver<bool>) {
        if !self.deliver_initial().await {
            return;
        }
        let mut live = self.open_live().await;
        if live.is_none() && !self.deliver(Snapshot::empty_unreconciled()).await {
            return;
        }
        let mut deletes = self.open_deletes().await;
        let mut refresh_at: Option<Instant> = None;

        loop {
            tokio::select! {
                changed = closed.changed() => {
                    if changed.is_err() || *closed.borrow() {
                        break;
                    }
                }
                delivery = next_message(live.as_mut()) => {
                    if !self.on_live_delivery(&mut live, delivery).await {
                        break;
                    }
                }
                event = next_message(deletes.as_mut()) => {
                    match event {
                        Some(change) if change.op == OpType::Delete => {
                            if refresh_at.is_none() {
                                refresh_at = Some(Instant::now() + self.refresh_window);
                            }
                        }
                        Some(_) => {}
                        None => deletes = None,
                    }
                }
                () = wait_until(refresh_at) => {
                    refresh_at = None;
                    if !self.refresh().await {
                        break;
                    }
                }
            }
        }
    }

    /// Immediate point-in-time read; a failure delivers an empty,
    /// not-reconciled snapshot and the subscription continues.
    async fn deliver_initial(&mut self) -> bool {
        let snapshot = match self.engine.query().await {
            Ok(items) => Snapshot::new(items, false),
            Err(error) => {
                warn!(
                    kind = T::kind_label(),
                    %error,
                    "initial read failed, delivering empty snapshot"
                );
                Snapshot::empty_unreconciled()
            }
        };
        self.deliver(snapshot).await
    }

    async fn open_live(&self) -> Option<mpsc::Receiver<Snapshot<T>>> {
        match self.engine.observe_query().await {
            Ok(stream) => Some(stream),
            Err(error) => {
                warn!(
                    kind = T::kind_label(),
                    %error,
                    "live query unavailable, feed degrades to empty"
                );
                None
            }
        }
    }

    async fn open_deletes(&self) -> Option<mpsc::Receiver<crate::sync::domain::ChangeEvent<T>>> {
        match self.engine.observe().await {
            Ok(stream) => Some(stream),
            Err(error) => {
                warn!(
                    kind = T::kind_label(),
                    %error,
                    "delete watcher unavailable, refresh guard disabled"
                );
                None
            }
        }
    }

    /// Forwards a live emission, degrading a terminated stream to an
    /// empty, not-reconciled delivery.
    async fn on_live_delivery(
        &mut self,
        live: &mut Option<mpsc::Receiver<Snapshot<T>>>,
        delivery: Option<Snapshot<T>>,
    ) -> bool {
        match delivery {
            Some(snapshot) => {
                self.last_reconciled = snapshot.fully_reconciled;
                self.deliver(snapshot).await
            }
            None => {
                warn!(
                    kind = T::kind_label(),
                    "live query stream ended, feed degrades to empty"
                );
                *live = None;
                self.last_reconciled = false;
                self.deliver(Snapshot::empty_unreconciled()).await
            }
        }
    }

    /// Delete-triggered full refresh: a resilience guard against the
    /// primary subscription under-reporting removals across processes.
    async fn refresh(&mut self) -> bool {
        match self.engine.query().await {
            Ok(items) => {
                let snapshot = Snapshot::new(items, self.last_reconciled);
                self.deliver(snapshot).await
            }
            Err(error) => {
                warn!(
                    kind = T::kind_label(),
                    %error,
                    "delete-triggered refresh failed, keeping current view"
                );
                true
            }
        }
    }

    async fn deliver(&mut self, snapshot: Snapshot<T>) -> bool {
        if self
            .diagnostics
            .observe(snapshot.items.len(), snapshot.fully_reconciled)
        {
            debug!(
                kind = T::kind_label(),
                items = snapshot.items.len(),
                reconciled = snapshot.fully_reconciled,
                "delivering snapshot"
            );
        }
        self.output.send(snapshot).await.is_ok()
    }
}

/// Receives from an optional stream, parking forever when it is absent.
async fn next_message<M>(receiver: Option<&mut mpsc::Receiver<M>>) -> Option<M> {
    match receiver {
        Some(stream) => stream.recv().await,
        None => std::future::pending().await,
    }
}

/// Sleeps until an optional deadline, parking forever when none is set.
async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}
