//! Unit tests for task identity, classification, and status parsing.

use super::fixtures::{NOW_MS, plain_task};
use crate::task::domain::{
    ParseTaskKindError, ParseTaskStatusError, RecordKey, TaskDomainError, TaskId, TaskKind,
    TaskStatus,
};
use eyre::ensure;
use rstest::rstest;

#[rstest]
#[case("SCHEDULED", TaskKind::Scheduled)]
#[case("scheduled", TaskKind::Scheduled)]
#[case(" Timed ", TaskKind::Timed)]
#[case("episodic", TaskKind::Episodic)]
fn kind_parses_case_insensitively(#[case] input: &str, #[case] expected: TaskKind) {
    assert_eq!(TaskKind::try_from(input), Ok(expected));
}

#[test]
fn kind_rejects_unknown_values() {
    assert_eq!(
        TaskKind::try_from("adhoc"),
        Err(ParseTaskKindError("adhoc".to_owned()))
    );
}

#[rstest]
#[case("adhoc")]
#[case("")]
fn kind_normalize_defaults_unknowns_to_scheduled(#[case] input: &str) {
    assert_eq!(TaskKind::normalize(input), TaskKind::Scheduled);
}

#[rstest]
#[case("OPEN", TaskStatus::Open)]
#[case("inprogress", TaskStatus::InProgress)]
#[case(" Recalled ", TaskStatus::Recalled)]
#[case("completed", TaskStatus::Completed)]
fn status_parses_case_insensitively(#[case] input: &str, #[case] expected: TaskStatus) {
    assert_eq!(TaskStatus::try_from(input), Ok(expected));
}

#[test]
fn status_rejects_unknown_values() {
    assert_eq!(
        TaskStatus::try_from("archived"),
        Err(ParseTaskStatusError("archived".to_owned()))
    );
}

#[test]
fn status_normalize_defaults_unknowns_to_open() {
    assert_eq!(TaskStatus::normalize("archived"), TaskStatus::Open);
}

#[rstest]
#[case(TaskStatus::Completed, true)]
#[case(TaskStatus::Expired, true)]
#[case(TaskStatus::Open, false)]
#[case(TaskStatus::Recalled, false)]
fn status_terminal_covers_completed_and_expired(
    #[case] status: TaskStatus,
    #[case] expected: bool,
) {
    assert_eq!(status.is_terminal(), expected);
}

#[test]
fn record_key_derivation_is_deterministic() {
    let first = RecordKey::derive("Morning survey", TaskKind::Scheduled, "2026-03-02");
    let second = RecordKey::derive("Morning survey", TaskKind::Scheduled, "2026-03-02");
    assert_eq!(first, second);
}

#[test]
fn record_key_derivation_ignores_surrounding_whitespace() {
    let first = RecordKey::derive(" Morning survey ", TaskKind::Scheduled, "2026-03-02 ");
    let second = RecordKey::derive("Morning survey", TaskKind::Scheduled, "2026-03-02");
    assert_eq!(first, second);
}

#[rstest]
#[case("Evening survey", TaskKind::Scheduled, "2026-03-02")]
#[case("Morning survey", TaskKind::Timed, "2026-03-02")]
#[case("Morning survey", TaskKind::Scheduled, "2026-03-03")]
fn record_key_derivation_varies_with_content(
    #[case] title: &str,
    #[case] kind: TaskKind,
    #[case] date: &str,
) {
    let reference = RecordKey::derive("Morning survey", TaskKind::Scheduled, "2026-03-02");
    assert_ne!(RecordKey::derive(title, kind, date), reference);
}

#[test]
fn record_key_components_carry_date_and_kind() {
    let key = RecordKey::derive("Morning survey", TaskKind::Timed, "2026-03-02");
    assert!(key.pk().starts_with("TASK#"));
    assert_eq!(key.sk(), "2026-03-02#TIMED");
}

#[test]
fn task_id_recovers_embedded_creation_instant() -> eyre::Result<()> {
    let id = TaskId::from_raw(format!("{NOW_MS}-abc"));
    let created = id
        .created_at()
        .ok_or_else(|| eyre::eyre!("expected a parseable prefix"))?;
    ensure!(created.timestamp_millis() == NOW_MS);
    Ok(())
}

#[rstest]
#[case("opaque-external-id")]
#[case("")]
#[case("-123")]
fn task_id_without_timestamp_prefix_yields_none(#[case] raw: &str) {
    assert!(TaskId::from_raw(raw).created_at().is_none());
}

#[test]
fn window_validation_rejects_expiry_before_start() {
    let task = plain_task("Morning survey", TaskKind::Scheduled).with_window(Some(200), Some(100));
    assert_eq!(
        task.validate_window(),
        Err(TaskDomainError::ExpiryBeforeStart {
            start_ms: 200,
            expire_ms: 100,
        })
    );
}

#[rstest]
#[case(Some(100), Some(200))]
#[case(Some(100), None)]
#[case(None, Some(200))]
#[case(None, None)]
fn window_validation_accepts_ordered_or_partial_windows(
    #[case] start_ms: Option<i64>,
    #[case] expire_ms: Option<i64>,
) {
    let task = plain_task("Morning survey", TaskKind::Scheduled).with_window(start_ms, expire_ms);
    assert_eq!(task.validate_window(), Ok(()));
}

#[test]
fn never_started_matches_only_explicit_zero() {
    let zero = plain_task("Morning survey", TaskKind::Episodic).with_window(Some(0), None);
    let absent = plain_task("Morning survey", TaskKind::Episodic);
    assert!(zero.never_started());
    assert!(!absent.never_started());
}
