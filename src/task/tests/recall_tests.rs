//! Unit tests for time and recall predicates.

use super::fixtures::{HOUR_MS, NOW_MS, now_fixed, plain_task, task_created_at};
use crate::task::domain::{
    DEFAULT_AGE_THRESHOLD_HOURS, TaskKind, age_in_hours, expiration_with_recall,
    is_in_recall_period, is_older_than_threshold, recall_base_expiry,
};
use eyre::ensure;
use rstest::rstest;

#[test]
fn age_is_measured_from_the_identity_prefix() {
    let task = task_created_at(NOW_MS - 30 * HOUR_MS, "Morning survey", TaskKind::Timed);
    assert_eq!(age_in_hours(&task, now_fixed()), Some(30));
}

#[test]
fn age_is_unknown_for_opaque_identifiers() {
    let task = plain_task("Morning survey", TaskKind::Timed);
    assert_eq!(age_in_hours(&task, now_fixed()), None);
}

#[test]
fn age_threshold_applies_to_stale_timed_tasks() {
    let task = task_created_at(NOW_MS - 30 * HOUR_MS, "Morning survey", TaskKind::Timed);
    assert!(is_older_than_threshold(
        &task,
        now_fixed(),
        DEFAULT_AGE_THRESHOLD_HOURS
    ));
}

#[rstest]
#[case(TaskKind::Scheduled, false)]
#[case(TaskKind::Episodic, false)]
fn age_threshold_ignores_other_kinds(#[case] kind: TaskKind, #[case] expected: bool) {
    let task = task_created_at(NOW_MS - 30 * HOUR_MS, "Morning survey", kind);
    assert_eq!(
        is_older_than_threshold(&task, now_fixed(), DEFAULT_AGE_THRESHOLD_HOURS),
        expected
    );
}

#[test]
fn age_threshold_exempts_open_ended_tasks() {
    let task =
        task_created_at(NOW_MS - 30 * HOUR_MS, "Morning survey", TaskKind::Timed).with_no_end_time(true);
    assert!(!is_older_than_threshold(
        &task,
        now_fixed(),
        DEFAULT_AGE_THRESHOLD_HOURS
    ));
}

#[test]
fn age_threshold_skips_unknowable_ages() {
    let task = plain_task("Morning survey", TaskKind::Timed);
    assert!(!is_older_than_threshold(
        &task,
        now_fixed(),
        DEFAULT_AGE_THRESHOLD_HOURS
    ));
}

#[test]
fn base_expiry_prefers_the_expiry_instant() {
    let mut task = plain_task("Morning survey", TaskKind::Scheduled)
        .with_window(None, Some(NOW_MS - HOUR_MS));
    task.due_by_updated_ms = Some(NOW_MS - 2 * HOUR_MS);
    assert_eq!(recall_base_expiry(&task), Some(NOW_MS - HOUR_MS));
}

#[test]
fn base_expiry_falls_back_to_due_by_updated() {
    let mut task = plain_task("Morning survey", TaskKind::Scheduled);
    task.due_by_updated_ms = Some(NOW_MS - 2 * HOUR_MS);
    assert_eq!(recall_base_expiry(&task), Some(NOW_MS - 2 * HOUR_MS));
}

#[test]
fn recall_expiry_extends_the_base_by_granted_minutes() {
    let task = plain_task("Morning survey", TaskKind::Scheduled)
        .with_window(None, Some(NOW_MS))
        .with_recall_minutes(90);
    assert_eq!(
        expiration_with_recall(&task),
        Some(NOW_MS + 90 * 60_000)
    );
}

#[test]
fn recall_expiry_is_absent_without_a_base_instant() {
    let task = plain_task("Morning survey", TaskKind::Scheduled).with_recall_minutes(90);
    assert_eq!(expiration_with_recall(&task), None);
}

#[test]
fn scheduled_task_is_recallable_inside_the_window() {
    let task = plain_task("Morning survey", TaskKind::Scheduled)
        .with_window(None, Some(NOW_MS - HOUR_MS))
        .with_recall_minutes(120);
    assert!(is_in_recall_period(&task, now_fixed()));
}

#[test]
fn recall_requires_a_grant() {
    let task = plain_task("Morning survey", TaskKind::Scheduled)
        .with_window(None, Some(NOW_MS - HOUR_MS));
    assert!(!is_in_recall_period(&task, now_fixed()));
}

#[test]
fn recall_ends_once_the_grace_window_closes() {
    let task = plain_task("Morning survey", TaskKind::Scheduled)
        .with_window(None, Some(NOW_MS - 2 * HOUR_MS))
        .with_recall_minutes(60);
    assert!(!is_in_recall_period(&task, now_fixed()));
}

#[test]
fn recall_waits_for_the_base_expiry() {
    let task = plain_task("Morning survey", TaskKind::Scheduled)
        .with_window(None, Some(NOW_MS + HOUR_MS))
        .with_recall_minutes(60);
    assert!(!is_in_recall_period(&task, now_fixed()));
}

#[test]
fn timed_task_is_recallable_only_once_started() {
    let started = plain_task("Morning survey", TaskKind::Timed)
        .with_window(Some(NOW_MS - 3 * HOUR_MS), Some(NOW_MS - HOUR_MS))
        .with_recall_minutes(120);
    let never_started = plain_task("Morning survey", TaskKind::Timed)
        .with_window(Some(0), Some(NOW_MS - HOUR_MS))
        .with_recall_minutes(120);
    let no_start = plain_task("Morning survey", TaskKind::Timed)
        .with_window(None, Some(NOW_MS - HOUR_MS))
        .with_recall_minutes(120);

    assert!(is_in_recall_period(&started, now_fixed()));
    assert!(!is_in_recall_period(&never_started, now_fixed()));
    assert!(!is_in_recall_period(&no_start, now_fixed()));
}

#[test]
fn episodic_tasks_are_never_recallable() {
    let task = plain_task("Morning survey", TaskKind::Episodic)
        .with_window(Some(NOW_MS - 3 * HOUR_MS), Some(NOW_MS - HOUR_MS))
        .with_recall_minutes(120);
    assert!(!is_in_recall_period(&task, now_fixed()));
}

/// Whenever the predicate holds, `now` sits strictly between the base
/// expiry and the extended recall expiry.
#[rstest]
#[case(TaskKind::Scheduled, Some(NOW_MS - 3 * HOUR_MS))]
#[case(TaskKind::Scheduled, None)]
#[case(TaskKind::Timed, Some(NOW_MS - 3 * HOUR_MS))]
#[case(TaskKind::Timed, Some(0))]
#[case(TaskKind::Episodic, Some(NOW_MS - 3 * HOUR_MS))]
fn recall_period_is_monotone(
    #[case] kind: TaskKind,
    #[case] start_ms: Option<i64>,
    #[values(NOW_MS - 2 * HOUR_MS, NOW_MS - 30 * 60_000, NOW_MS, NOW_MS + HOUR_MS)] expire_ms: i64,
    #[values(15, 60, 180)] recall_minutes: i64,
) -> eyre::Result<()> {
    let task = plain_task("Morning survey", kind)
        .with_window(start_ms, Some(expire_ms))
        .with_recall_minutes(recall_minutes);

    if is_in_recall_period(&task, now_fixed()) {
        let base = recall_base_expiry(&task)
            .ok_or_else(|| eyre::eyre!("recall implies a base expiry"))?;
        let end = expiration_with_recall(&task)
            .ok_or_else(|| eyre::eyre!("recall implies an extended expiry"))?;
        ensure!(base < NOW_MS);
        ensure!(NOW_MS < end);
    }
    Ok(())
}
