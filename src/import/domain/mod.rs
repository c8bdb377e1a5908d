//! Foreign payload model for externally-sourced task collections.
//!
//! The upstream scheduling API supplies date-grouped, loosely-typed task
//! payloads. Every shape variation the source is known to produce is
//! modelled here as an explicit untagged union with one parse step per
//! variant, so the conversion service never has to sniff value shapes.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use serde_json::Value;

/// One date-keyed group of foreign task payloads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForeignTaskGroup {
    /// Group date in `YYYY-MM-DD` form; part of derived record identity.
    pub date: String,
    /// The group's task payloads.
    pub tasks: Vec<ForeignTask>,
}

/// One loosely-typed foreign task payload.
///
/// Every field is optional. The conversion service degrades missing or
/// malformed fields to documented defaults and never fails on them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForeignTask {
    /// Volatile per-instance identifier. Never identity-relevant: repeated
    /// exports of the same logical task carry different values here.
    pub task_instance_id: Option<String>,
    /// Source-supplied partition key.
    pub pk: Option<String>,
    /// Source-supplied sort key.
    pub sk: Option<String>,
    /// Display title.
    pub title: Option<String>,
    /// Classification, matched case-insensitively.
    pub task_type: Option<String>,
    /// Lifecycle status, matched case-insensitively.
    pub status: Option<String>,
    /// Start instant.
    pub start_time: Option<ForeignInstant>,
    /// Expiry instant; an explicit `0` is meaningful and preserved.
    pub expire_time: Option<ForeignInstant>,
    /// End instant.
    pub end_time: Option<ForeignInstant>,
    /// Open-ended marker.
    pub no_end_time: Option<bool>,
    /// Recall grace window in minutes.
    pub can_recall: Option<i64>,
    /// Free-text due-by label, used only for grouping.
    pub due_by: Option<String>,
    /// Fallback expiry instant.
    pub due_by_updated: Option<ForeignInstant>,
    /// Shows the task on the active list before its start instant.
    pub show_before_start: Option<bool>,
    /// Episodic hidden flag.
    pub is_hidden: Option<bool>,
    /// Episodic explicit show flag.
    pub show_task: Option<bool>,
    /// Episodic control markers.
    pub control: Option<ForeignControl>,
    /// Action entries, as an array or pre-serialized.
    pub actions: Option<ForeignList>,
    /// Anchor entries, as an array or pre-serialized.
    pub anchors: Option<ForeignList>,
}

/// Episodic started/ended markers as supplied by the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ForeignControl {
    /// The occurrence has been started.
    pub started: bool,
    /// The occurrence has been ended.
    pub ended: bool,
}

/// An instant supplied either as epoch milliseconds or as date text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ForeignInstant {
    /// Epoch milliseconds.
    Millis(i64),
    /// RFC 3339, naive datetime, or bare-date text.
    Text(String),
}

impl ForeignInstant {
    /// Converts the instant to epoch milliseconds.
    ///
    /// Unparseable text returns `None`; callers degrade the field rather
    /// than failing the conversion.
    #[must_use]
    pub fn to_epoch_ms(&self) -> Option<i64> {
        match self {
            Self::Millis(millis) => Some(*millis),
            Self::Text(text) => parse_text_instant(text),
        }
    }
}

fn parse_text_instant(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(instant.timestamp_millis());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc().timestamp_millis());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN).and_utc().timestamp_millis());
    }
    None
}

/// Action or anchor entries, arriving either pre-serialized or structured.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ForeignList {
    /// Entries already serialized to a JSON string.
    Serialized(String),
    /// Entries as a structured JSON array.
    Entries(Vec<Value>),
}

impl ForeignList {
    /// Normalizes the entries to the single serialized-string
    /// representation the internal record carries.
    #[must_use]
    pub fn to_serialized(&self) -> Option<String> {
        match self {
            Self::Serialized(text) => Some(text.clone()),
            Self::Entries(entries) => serde_json::to_string(entries).ok(),
        }
    }

    /// Parses the first entry as an action record.
    ///
    /// A serialized variant is parsed back into an array first. Entries
    /// that are not action-shaped objects yield `None`.
    #[must_use]
    pub fn first_action(&self) -> Option<ForeignAction> {
        let entry = match self {
            Self::Serialized(text) => {
                let entries: Vec<Value> = serde_json::from_str(text).ok()?;
                entries.into_iter().next()?
            }
            Self::Entries(entries) => entries.first()?.clone(),
        };
        serde_json::from_value(entry).ok()
    }
}

/// One action entry, optionally referencing the associated questionnaire
/// or activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForeignAction {
    /// Explicit leaf reference to the associated entity.
    pub entity_ref: Option<String>,
    /// Entity identifier, possibly a composite `a/b/c` chain.
    pub entity_id: Option<String>,
    /// Lookup key for the entity.
    pub hash_key: Option<String>,
}

impl ForeignAction {
    /// Resolves the entity reference.
    ///
    /// The explicit reference field wins over the identifier string; a
    /// composite chain identifier is reduced to its leaf segment.
    #[must_use]
    pub fn resolve_entity_id(&self) -> Option<String> {
        self.entity_ref
            .as_deref()
            .map(str::trim)
            .filter(|reference| !reference.is_empty())
            .map(ToOwned::to_owned)
            .or_else(|| self.entity_id.as_deref().and_then(leaf_segment))
    }

    /// Returns the trimmed lookup key, dropping empty values.
    #[must_use]
    pub fn resolve_hash_key(&self) -> Option<String> {
        self.hash_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(ToOwned::to_owned)
    }
}

fn leaf_segment(composite: &str) -> Option<String> {
    let leaf = composite.rsplit('/').next()?.trim();
    (!leaf.is_empty()).then(|| leaf.to_owned())
}
