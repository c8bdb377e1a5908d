//! Domain model for task lifecycle, visibility, and grouping.
//!
//! The task domain models identity, classification, status, the temporal
//! predicates that decide visibility on the active list, and the projection
//! of a task set into day/time display buckets, while keeping all
//! infrastructure concerns outside of the domain boundary.

mod error;
mod grouping;
mod ids;
mod recall;
mod task;
mod visibility;

pub use error::{ParseTaskKindError, ParseTaskStatusError, TaskDomainError};
pub use grouping::{
    DayGroup, TimeGroup, get_time_in_minutes, group_by_day_and_time, sort_task_array,
};
pub use ids::{RecordKey, TaskId};
pub use recall::{
    DEFAULT_AGE_THRESHOLD_HOURS, age_in_hours, expiration_with_recall, is_in_recall_period,
    is_older_than_threshold, recall_base_expiry,
};
pub use task::{EpisodicControl, SyncMetadata, Task, TaskKind, TaskStatus};
pub use visibility::{is_episodic_visible, should_filter_task};
