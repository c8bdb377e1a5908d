//! Grouped feed state composed from a sync subscription.

use crate::sync::domain::Snapshot;
use crate::sync::services::Subscription;
use crate::task::domain::{DayGroup, Task, group_by_day_and_time};
use chrono::{DateTime, Local};
use mockable::Clock;
use std::sync::Arc;

/// The value a screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFeedState {
    /// Day/time buckets of the visible task set.
    pub groups: Vec<DayGroup>,
    /// `true` until the first delivery arrives.
    pub loading: bool,
    /// Present once the feed has stopped delivering.
    pub error: Option<String>,
    /// Whether the last delivery was fully reconciled with the remote
    /// store.
    pub synced: bool,
}

impl TaskFeedState {
    const fn initial() -> Self {
        Self {
            groups: Vec::new(),
            loading: true,
            error: None,
            synced: false,
        }
    }
}

impl Default for TaskFeedState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Composes a task subscription with the group engine.
///
/// Each snapshot delivery is projected into day/time buckets with "now"
/// captured once from the injected clock, so grouping stays stable within
/// one render pass. The projection is memoized on `(task set, now)`;
/// re-delivery of an identical snapshot within the same instant reuses the
/// previous buckets.
pub struct TaskFeed<C> {
    subscription: Subscription<Task>,
    clock: Arc<C>,
    state: TaskFeedState,
    memo: Option<GroupingMemo>,
}

struct GroupingMemo {
    items: Vec<Task>,
    now: DateTime<Local>,
    groups: Vec<DayGroup>,
}

impl<C: Clock> TaskFeed<C> {
    /// Creates a feed over an open subscription, starting in the loading
    /// state.
    #[must_use]
    pub const fn new(subscription: Subscription<Task>, clock: Arc<C>) -> Self {
        Self {
            subscription,
            clock,
            state: TaskFeedState::initial(),
            memo: None,
        }
    }

    /// Current render value.
    #[must_use]
    pub const fn state(&self) -> &TaskFeedState {
        &self.state
    }

    /// Waits for the next snapshot delivery and folds it into the state.
    ///
    /// Returns the updated state, or `None` once the subscription has
    /// closed; the closed condition is also recorded on the state so a
    /// screen polling [`TaskFeed::state`] observes it.
    pub async fn next(&mut self) -> Option<&TaskFeedState> {
        match self.subscription.recv().await {
            Some(snapshot) => {
                self.apply(&snapshot);
                Some(&self.state)
            }
            None => {
                self.state.loading = false;
                self.state.synced = false;
                self.state.error = Some("task feed closed".to_owned());
                None
            }
        }
    }

    /// Stops the underlying subscription. Idempotent.
    pub fn close(&self) {
        self.subscription.close();
    }

    fn apply(&mut self, snapshot: &Snapshot<Task>) {
        let now = self.clock.local();
        let groups = self.project(&snapshot.items, now);
        self.state = TaskFeedState {
            groups,
            loading: false,
            error: None,
            synced: snapshot.fully_reconciled,
        };
    }

    fn project(&mut self, items: &[Task], now: DateTime<Local>) -> Vec<DayGroup> {
        if let Some(memo) = &self.memo
            && memo.items == items
            && memo.now == now
        {
            return memo.groups.clone();
        }
        let groups = group_by_day_and_time(items, &now);
        self.memo = Some(GroupingMemo {
            items: items.to_vec(),
            now,
            groups: groups.clone(),
        });
        groups
    }
}
