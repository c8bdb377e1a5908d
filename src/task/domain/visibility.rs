//! Active-list visibility filter.
//!
//! Encodes which statuses and temporal conditions make a task invisible on
//! the active view. The predicate is pure and total: it returns a boolean
//! for every `(task, now)` pair, including tasks missing every optional
//! temporal field, and never panics.

use super::recall::{DEFAULT_AGE_THRESHOLD_HOURS, is_older_than_threshold};
use super::{Task, TaskKind};
use chrono::{DateTime, Utc};

/// Decides whether a task must be excluded from the active view.
///
/// Exclusion rules, in order:
///
/// 1. Terminal status (completed or expired).
/// 2. Open-ended tasks: excluded only when never started or not yet
///    started; otherwise permanently visible regardless of elapsed time.
/// 3. Not yet started without the show-before-start override.
/// 4. Past the expiry instant.
/// 5. Timed tasks older than [`DEFAULT_AGE_THRESHOLD_HOURS`].
#[must_use]
pub fn should_filter_task(task: &Task, now: DateTime<Utc>) -> bool {
    if task.status.is_terminal() {
        return true;
    }
    let now_ms = now.timestamp_millis();
    if task.no_end_time {
        return task.never_started() || not_yet_started(task, now_ms);
    }
    if not_yet_started(task, now_ms) {
        return true;
    }
    if past_expiry(task, now_ms) {
        return true;
    }
    is_older_than_threshold(task, now, DEFAULT_AGE_THRESHOLD_HOURS)
}

/// Episodic tasks are gated by explicit controls instead of a time window:
/// visible when not hidden, explicitly shown, not in a terminal status, and
/// not marked ended by the episodic control info.
#[must_use]
pub fn is_episodic_visible(task: &Task) -> bool {
    task.kind == TaskKind::Episodic
        && !task.is_hidden
        && task.show_task
        && !task.status.is_terminal()
        && task.control.is_none_or(|control| !control.ended)
}

fn not_yet_started(task: &Task, now_ms: i64) -> bool {
    !task.show_before_start && task.start_time_ms.is_some_and(|start_ms| start_ms > now_ms)
}

fn past_expiry(task: &Task, now_ms: i64) -> bool {
    task.expire_time_ms.is_some_and(|expire_ms| expire_ms < now_ms)
}
