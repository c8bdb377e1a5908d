//! Unit tests for the in-memory sync engine adapter.

use super::fixtures::draft_task;
use crate::sync::adapters::memory::InMemorySyncEngine;
use crate::sync::domain::{OpType, SyncRecord};
use crate::sync::error::SyncEngineError;
use crate::sync::ports::SyncEngine;
use crate::task::domain::Task;
use eyre::{bail, ensure};

#[tokio::test]
async fn save_assigns_increasing_versions() -> eyre::Result<()> {
    let engine: InMemorySyncEngine<Task> = InMemorySyncEngine::new();
    let stored = engine.save(&draft_task("Morning survey")).await?;
    ensure!(stored.version() == 1);

    let updated = engine.save(&stored).await?;
    ensure!(updated.version() == 2);
    Ok(())
}

#[tokio::test]
async fn conditional_create_rejects_an_existing_key() -> eyre::Result<()> {
    let engine: InMemorySyncEngine<Task> = InMemorySyncEngine::new();
    let first = draft_task("Morning survey");
    engine.save(&first).await?;

    let duplicate = draft_task("Morning survey");
    match engine.save(&duplicate).await {
        Err(SyncEngineError::ConditionalCheckFailed { key }) => {
            ensure!(key == *first.record_key());
            Ok(())
        }
        other => bail!("expected a conditional rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn saved_records_are_queryable() -> eyre::Result<()> {
    let engine: InMemorySyncEngine<Task> = InMemorySyncEngine::new();
    engine.save(&draft_task("Morning survey")).await?;
    engine.save(&draft_task("Evening survey")).await?;

    let items = engine.query().await?;
    ensure!(items.len() == 2);
    Ok(())
}

#[tokio::test]
async fn delete_tombstones_and_hides_the_record() -> eyre::Result<()> {
    let engine: InMemorySyncEngine<Task> = InMemorySyncEngine::new();
    let stored = engine.save(&draft_task("Morning survey")).await?;

    engine.delete(&stored).await?;
    let items = engine.query().await?;
    ensure!(items.is_empty());
    Ok(())
}

#[tokio::test]
async fn deleting_a_tombstoned_record_reports_not_found() -> eyre::Result<()> {
    let engine: InMemorySyncEngine<Task> = InMemorySyncEngine::new();
    let stored = engine.save(&draft_task("Morning survey")).await?;
    engine.delete(&stored).await?;

    match engine.delete(&stored).await {
        Err(SyncEngineError::NotFound { key }) => {
            ensure!(key == *stored.record_key());
            Ok(())
        }
        other => bail!("expected not-found, got {other:?}"),
    }
}

#[tokio::test]
async fn observe_query_emits_the_current_state_immediately() -> eyre::Result<()> {
    let engine = InMemorySyncEngine::seeded([draft_task("Morning survey")]);
    let mut stream = engine.observe_query().await?;

    let initial = stream
        .recv()
        .await
        .ok_or_else(|| eyre::eyre!("expected an immediate emission"))?;
    ensure!(initial.items.len() == 1);
    ensure!(initial.fully_reconciled);
    Ok(())
}

#[tokio::test]
async fn observers_see_saves_and_deletes() -> eyre::Result<()> {
    let engine: InMemorySyncEngine<Task> = InMemorySyncEngine::new();
    let mut snapshots = engine.observe_query().await?;
    let mut changes = engine.observe().await?;

    // Drain the immediate emission.
    let _initial = snapshots.recv().await;

    let stored = engine.save(&draft_task("Morning survey")).await?;
    let after_save = snapshots
        .recv()
        .await
        .ok_or_else(|| eyre::eyre!("expected a snapshot after save"))?;
    ensure!(after_save.items.len() == 1);
    let create_event = changes
        .recv()
        .await
        .ok_or_else(|| eyre::eyre!("expected a change event after save"))?;
    ensure!(create_event.op == OpType::Create);

    engine.delete(&stored).await?;
    let after_delete = snapshots
        .recv()
        .await
        .ok_or_else(|| eyre::eyre!("expected a snapshot after delete"))?;
    ensure!(after_delete.items.is_empty());
    let delete_event = changes
        .recv()
        .await
        .ok_or_else(|| eyre::eyre!("expected a change event after delete"))?;
    ensure!(delete_event.op == OpType::Delete);
    ensure!(delete_event.element.is_deleted());
    Ok(())
}

#[tokio::test]
async fn seeded_records_behave_as_previously_saved() -> eyre::Result<()> {
    let engine = InMemorySyncEngine::seeded([draft_task("Morning survey")]);
    let items = engine.query().await?;
    let stored = items
        .first()
        .ok_or_else(|| eyre::eyre!("expected the seeded record"))?;
    ensure!(stored.version() == 1);
    Ok(())
}
