//! Pure time and recall predicates.
//!
//! Age is recovered from the identity's embedded timestamp prefix; the
//! recall window extends a task's nominal expiry by a per-task grace
//! period. Every function here is total over `(task, now)`.

use super::{Task, TaskKind};
use chrono::{DateTime, Utc};

/// Age threshold after which a timed task leaves the active list.
pub const DEFAULT_AGE_THRESHOLD_HOURS: i64 = 24;

/// Milliseconds per recall-window minute.
const MILLIS_PER_MINUTE: i64 = 60_000;

/// Returns the task's age in whole hours, or `None` when the identity
/// carries no parseable creation timestamp.
///
/// Callers must treat `None` as "do not age-filter".
#[must_use]
pub fn age_in_hours(task: &Task, now: DateTime<Utc>) -> Option<i64> {
    let created = task.id.created_at()?;
    Some(now.signed_duration_since(created).num_hours())
}

/// Returns `true` when a timed task has outlived the given threshold.
///
/// Applies only to [`TaskKind::Timed`] tasks without `no_end_time`; all
/// other kinds, open-ended tasks, and tasks whose age cannot be determined
/// return `false`.
#[must_use]
pub fn is_older_than_threshold(task: &Task, now: DateTime<Utc>, threshold_hours: i64) -> bool {
    if task.kind != TaskKind::Timed || task.no_end_time {
        return false;
    }
    age_in_hours(task, now).is_some_and(|age| age > threshold_hours)
}

/// Returns the instant recall eligibility is measured from:
/// `expire_time_ms`, falling back to `due_by_updated_ms`.
#[must_use]
pub const fn recall_base_expiry(task: &Task) -> Option<i64> {
    match task.expire_time_ms {
        Some(expire_ms) => Some(expire_ms),
        None => task.due_by_updated_ms,
    }
}

/// Returns the instant the recall grace window closes, or `None` when no
/// expiration instant exists.
///
/// A task without a recall grant closes at its base expiry.
#[must_use]
pub fn expiration_with_recall(task: &Task) -> Option<i64> {
    let base = recall_base_expiry(task)?;
    let minutes = task.can_recall_minutes.unwrap_or(0);
    Some(base.saturating_add(minutes.saturating_mul(MILLIS_PER_MINUTE)))
}

/// Returns `true` while the task sits inside its post-expiry grace window.
///
/// Requires a recall grant and a base expiration instant, with `now`
/// strictly between the base expiry and [`expiration_with_recall`].
/// Scheduled tasks are always eligible once past expiry; timed tasks only
/// when they were actually started; other kinds never.
#[must_use]
pub fn is_in_recall_period(task: &Task, now: DateTime<Utc>) -> bool {
    if task.can_recall_minutes.is_none() {
        return false;
    }
    let Some(base) = recall_base_expiry(task) else {
        return false;
    };
    let now_ms = now.timestamp_millis();
    if now_ms <= base {
        return false;
    }
    let past_window = expiration_with_recall(task).is_none_or(|end| now_ms >= end);
    if past_window {
        return false;
    }
    match task.kind {
        TaskKind::Scheduled => true,
        TaskKind::Timed => task.start_time_ms.is_some_and(|start_ms| start_ms != 0),
        TaskKind::Episodic => false,
    }
}
