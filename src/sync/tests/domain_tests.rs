//! Unit tests for synchronization domain types.

use super::fixtures::draft_task;
use crate::sync::domain::{Diagnostics, Snapshot, SyncRecord};
use crate::task::domain::Task;

#[test]
fn diagnostics_suppresses_repeated_signatures() {
    let mut diagnostics = Diagnostics::new();
    assert!(diagnostics.observe(3, false));
    assert!(!diagnostics.observe(3, false));
    assert!(!diagnostics.observe(3, false));
}

#[test]
fn diagnostics_reports_any_signature_change() {
    let mut diagnostics = Diagnostics::new();
    assert!(diagnostics.observe(3, false));
    assert!(diagnostics.observe(3, true));
    assert!(diagnostics.observe(2, true));
    assert!(diagnostics.observe(3, true));
}

#[test]
fn empty_unreconciled_snapshot_carries_no_items() {
    let snapshot: Snapshot<Task> = Snapshot::empty_unreconciled();
    assert!(snapshot.items.is_empty());
    assert!(!snapshot.fully_reconciled);
}

#[test]
fn task_exposes_sync_metadata_through_the_record_contract() {
    let task = draft_task("Morning survey");
    assert_eq!(task.version(), 0);
    assert!(!task.is_deleted());
    assert_eq!(Task::kind_label(), "task");

    let stored = task.clone().with_version(4).with_deleted(true);
    assert_eq!(stored.version(), 4);
    assert!(stored.is_deleted());
    assert_eq!(stored.record_key(), task.record_key());
}
