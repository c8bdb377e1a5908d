//! The Task record and its classification and status enums.

use super::{ParseTaskKindError, ParseTaskStatusError, RecordKey, TaskDomainError, TaskId};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Task classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskKind {
    /// Fixed appointment with a start/expire window.
    Scheduled,
    /// Window-bound task subject to the age threshold once started.
    Timed,
    /// No fixed schedule; gated by explicit show/hide control.
    Episodic,
}

impl TaskKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "SCHEDULED",
            Self::Timed => "TIMED",
            Self::Episodic => "EPISODIC",
        }
    }

    /// Parses a kind leniently, defaulting unknown values to
    /// [`TaskKind::Scheduled`].
    ///
    /// Each unrecognised value emits a structured warning so upstream
    /// data-quality problems stay observable.
    #[must_use]
    pub fn normalize(value: &str) -> Self {
        Self::try_from(value).unwrap_or_else(|_| {
            warn!(kind = value, "unrecognised task kind, defaulting to SCHEDULED");
            Self::Scheduled
        })
    }
}

impl TryFrom<&str> for TaskKind {
    type Error = ParseTaskKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "SCHEDULED" => Ok(Self::Scheduled),
            "TIMED" => Ok(Self::Timed),
            "EPISODIC" => Ok(Self::Episodic),
            _ => Err(ParseTaskKindError(value.to_owned())),
        }
    }
}

/// Task lifecycle status.
///
/// Transitions are driven externally by user actions and sync events; this
/// layer records the status and encodes its visibility consequences in the
/// filter rather than enforcing a transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Created, not yet surfaced to the user.
    Open,
    /// Surfaced on the active list.
    Visible,
    /// The user has begun the task.
    Started,
    /// Partially answered.
    InProgress,
    /// Finished by the user.
    Completed,
    /// Past its window without completion.
    Expired,
    /// Re-opened inside the post-expiry grace window.
    Recalled,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Visible => "VISIBLE",
            Self::Started => "STARTED",
            Self::InProgress => "INPROGRESS",
            Self::Completed => "COMPLETED",
            Self::Expired => "EXPIRED",
            Self::Recalled => "RECALLED",
        }
    }

    /// Returns `true` for statuses excluded from the active list outright.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Expired)
    }

    /// Parses a status leniently, defaulting missing or unknown values to
    /// [`TaskStatus::Open`].
    #[must_use]
    pub fn normalize(value: &str) -> Self {
        Self::try_from(value).unwrap_or_else(|_| {
            warn!(status = value, "unrecognised task status, defaulting to OPEN");
            Self::Open
        })
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "OPEN" => Ok(Self::Open),
            "VISIBLE" => Ok(Self::Visible),
            "STARTED" => Ok(Self::Started),
            "INPROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            "EXPIRED" => Ok(Self::Expired),
            "RECALLED" => Ok(Self::Recalled),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Started/ended markers for an episodic occurrence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodicControl {
    /// The occurrence has been started.
    pub started: bool,
    /// The occurrence has been ended and must no longer be shown.
    pub ended: bool,
}

/// Sync bookkeeping owned by the remote store.
///
/// Read-only to this crate; the store assigns versions, tombstones, and
/// change timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMetadata {
    /// Monotonic version counter.
    pub version: i64,
    /// Soft-delete tombstone flag.
    pub deleted: bool,
    /// Instant of the last remote change, epoch milliseconds.
    pub last_changed_ms: Option<i64>,
}

/// The central task entity.
///
/// A task is created by the import adapter or by direct creation through
/// the sync orchestrator, and mutated exclusively through typed full-record
/// updates. `start_time_ms == Some(0)` denotes "never actually started" for
/// episodic occurrences and open-ended tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque globally unique identifier.
    pub id: TaskId,
    /// Remote-store composite key.
    pub key: RecordKey,
    /// Display title; also the sort tiebreaker.
    pub title: String,
    /// Classification.
    pub kind: TaskKind,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Start instant, epoch milliseconds.
    pub start_time_ms: Option<i64>,
    /// Expiry instant, epoch milliseconds.
    pub expire_time_ms: Option<i64>,
    /// End instant, epoch milliseconds.
    pub end_time_ms: Option<i64>,
    /// Exempts the task from expiry- and age-based exclusion.
    pub no_end_time: bool,
    /// Post-expiry grace window in minutes.
    pub can_recall_minutes: Option<i64>,
    /// Free-text time-of-day label used only for grouping.
    pub due_by_label: Option<String>,
    /// Fallback expiry instant when `expire_time_ms` is absent.
    pub due_by_updated_ms: Option<i64>,
    /// Shows the task on the active list before its start instant.
    pub show_before_start: bool,
    /// Episodic: hidden from the active list.
    pub is_hidden: bool,
    /// Episodic: explicit show flag.
    pub show_task: bool,
    /// Episodic control info.
    pub control: Option<EpisodicControl>,
    /// Reference to the associated questionnaire or activity.
    pub entity_id: Option<String>,
    /// Lookup key extracted from the first action entry.
    pub hash_key: Option<String>,
    /// Serialized action entries, opaque beyond import extraction.
    pub actions: Option<String>,
    /// Serialized anchor entries, opaque beyond import extraction.
    pub anchors: Option<String>,
    /// Remote-store bookkeeping, read-only here.
    pub sync: SyncMetadata,
}

impl Task {
    /// Creates an open task with every optional field empty.
    #[must_use]
    pub fn new(id: TaskId, key: RecordKey, title: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            id,
            key,
            title: title.into(),
            kind,
            status: TaskStatus::Open,
            start_time_ms: None,
            expire_time_ms: None,
            end_time_ms: None,
            no_end_time: false,
            can_recall_minutes: None,
            due_by_label: None,
            due_by_updated_ms: None,
            show_before_start: false,
            is_hidden: false,
            show_task: true,
            control: None,
            entity_id: None,
            hash_key: None,
            actions: None,
            anchors: None,
            sync: SyncMetadata::default(),
        }
    }

    /// Sets the lifecycle status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the start and expiry instants.
    #[must_use]
    pub const fn with_window(mut self, start_ms: Option<i64>, expire_ms: Option<i64>) -> Self {
        self.start_time_ms = start_ms;
        self.expire_time_ms = expire_ms;
        self
    }

    /// Marks the task as open-ended.
    #[must_use]
    pub const fn with_no_end_time(mut self, no_end_time: bool) -> Self {
        self.no_end_time = no_end_time;
        self
    }

    /// Grants a post-expiry recall window in minutes.
    #[must_use]
    pub const fn with_recall_minutes(mut self, minutes: i64) -> Self {
        self.can_recall_minutes = Some(minutes);
        self
    }

    /// Sets the due-by display label.
    #[must_use]
    pub fn with_due_by_label(mut self, label: impl Into<String>) -> Self {
        self.due_by_label = Some(label.into());
        self
    }

    /// Shows the task before its start instant.
    #[must_use]
    pub const fn with_show_before_start(mut self, show: bool) -> Self {
        self.show_before_start = show;
        self
    }

    /// Sets the episodic visibility gates.
    #[must_use]
    pub const fn with_episodic_gates(mut self, is_hidden: bool, show_task: bool) -> Self {
        self.is_hidden = is_hidden;
        self.show_task = show_task;
        self
    }

    /// Attaches episodic control info.
    #[must_use]
    pub const fn with_control(mut self, control: EpisodicControl) -> Self {
        self.control = Some(control);
        self
    }

    /// References the associated questionnaire or activity.
    #[must_use]
    pub fn with_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Checks the temporal window invariant.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ExpiryBeforeStart`] when both instants are
    /// present and the expiry precedes the start.
    pub fn validate_window(&self) -> Result<(), TaskDomainError> {
        if let (Some(start_ms), Some(expire_ms)) = (self.start_time_ms, self.expire_time_ms)
            && expire_ms < start_ms
        {
            return Err(TaskDomainError::ExpiryBeforeStart {
                start_ms,
                expire_ms,
            });
        }
        Ok(())
    }

    /// Returns `true` when the task was never actually started.
    #[must_use]
    pub const fn never_started(&self) -> bool {
        matches!(self.start_time_ms, Some(0))
    }
}
