//! Conversion of foreign task payloads into internal task records.

use crate::import::domain::{ForeignAction, ForeignInstant, ForeignList, ForeignTask, ForeignTaskGroup};
use crate::task::domain::{EpisodicControl, RecordKey, Task, TaskId, TaskKind, TaskStatus};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;

/// Converts date-grouped foreign payloads into internal task records.
///
/// Conversion is total: malformed optional fields degrade to `None` or
/// documented defaults, and every input task yields a complete,
/// internally-consistent record. Record identity is derived from stable
/// content fields when the source supplies no key, so repeated imports of
/// the same logical task converge on the same key regardless of the
/// volatile instance identifier attached to each export.
pub struct TaskImporter<C> {
    clock: Arc<C>,
}

impl Default for TaskImporter<DefaultClock> {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl<C: Clock> TaskImporter<C> {
    /// Creates an importer stamping generated identifiers with the clock.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self { clock }
    }

    /// Converts every task in every group, preserving group order.
    #[must_use]
    pub fn convert_groups(&self, groups: &[ForeignTaskGroup]) -> Vec<Task> {
        groups
            .iter()
            .flat_map(|group| {
                group
                    .tasks
                    .iter()
                    .map(|foreign| self.convert_task(foreign, &group.date))
            })
            .collect()
    }

    /// Converts one foreign payload under its group date.
    #[must_use]
    pub fn convert_task(&self, foreign: &ForeignTask, date: &str) -> Task {
        let title = foreign
            .title
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_owned();
        let kind = foreign
            .task_type
            .as_deref()
            .map_or(TaskKind::Scheduled, TaskKind::normalize);
        let status = foreign
            .status
            .as_deref()
            .map_or(TaskStatus::Open, TaskStatus::normalize);
        let key = source_key(foreign).unwrap_or_else(|| RecordKey::derive(&title, kind, date));
        let first_action = foreign.actions.as_ref().and_then(ForeignList::first_action);

        let mut task =
            Task::new(TaskId::generate(self.clock.as_ref()), key, title, kind).with_status(status);
        task.start_time_ms = instant_ms(foreign.start_time.as_ref());
        task.expire_time_ms = instant_ms(foreign.expire_time.as_ref());
        task.end_time_ms = instant_ms(foreign.end_time.as_ref());
        task.no_end_time = foreign.no_end_time.unwrap_or(false);
        task.can_recall_minutes = foreign.can_recall;
        task.due_by_label = foreign.due_by.clone();
        task.due_by_updated_ms = instant_ms(foreign.due_by_updated.as_ref());
        task.show_before_start = foreign.show_before_start.unwrap_or(false);
        task.is_hidden = foreign.is_hidden.unwrap_or(false);
        task.show_task = foreign.show_task.unwrap_or(true);
        task.control = foreign.control.map(|control| EpisodicControl {
            started: control.started,
            ended: control.ended,
        });
        task.entity_id = first_action
            .as_ref()
            .and_then(ForeignAction::resolve_entity_id);
        task.hash_key = first_action
            .as_ref()
            .and_then(ForeignAction::resolve_hash_key);
        task.actions = foreign.actions.as_ref().and_then(ForeignList::to_serialized);
        task.anchors = foreign.anchors.as_ref().and_then(ForeignList::to_serialized);
        task
    }
}

/// Source key, used verbatim when both components are present.
fn source_key(foreign: &ForeignTask) -> Option<RecordKey> {
    let pk = foreign
        .pk
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())?;
    let sk = foreign
        .sk
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())?;
    Some(RecordKey::new(pk, sk))
}

fn instant_ms(instant: Option<&ForeignInstant>) -> Option<i64> {
    instant.and_then(ForeignInstant::to_epoch_ms)
}
