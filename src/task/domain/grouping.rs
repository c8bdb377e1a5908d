//! Sort/group engine: orders tasks and buckets them by calendar day and
//! due-by label.
//!
//! The engine is a pure projection: output is fully recomputed from the
//! task set and a caller-captured instant, so a render pass that freezes
//! `now` gets deterministic, stable output. Day buckets use the local
//! calendar day of the caller's timezone, not UTC.

use super::visibility::{is_episodic_visible, should_filter_task};
use super::{Task, TaskKind};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Tasks sharing one due-by label within a day bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeGroup {
    /// The due-by label, verbatim.
    pub time: String,
    /// Tasks carrying that label, in chronological order.
    pub tasks: Vec<Task>,
}

/// One calendar-day bucket of the grouped view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayGroup {
    /// Display label: "Today", "Tomorrow", "Yesterday", or a formatted date.
    pub day_label: String,
    /// The bucket's calendar day in the caller's timezone.
    pub day_date: NaiveDate,
    /// Tasks without a due-by label, plus episodic tasks on the Today
    /// bucket.
    pub tasks_without_time: Vec<Task>,
    /// Label sub-groups ordered by their derived minute value.
    pub time_groups: Vec<TimeGroup>,
}

/// Sorts tasks by start instant ascending, ties broken by title ascending
/// (case-sensitive), then by identifier for a total order.
///
/// Tasks without a start instant sort last.
pub fn sort_task_array(tasks: &mut [Task]) {
    tasks.sort_by(|left, right| {
        let left_start = left.start_time_ms.unwrap_or(i64::MAX);
        let right_start = right.start_time_ms.unwrap_or(i64::MAX);
        left_start
            .cmp(&right_start)
            .then_with(|| left.title.cmp(&right.title))
            .then_with(|| left.id.as_str().cmp(right.id.as_str()))
    });
}

/// Converts a due-by label to minutes from midnight for comparable
/// ordering.
///
/// Accepts `8:00 AM`, `14:30`, and `7 pm` style labels. Unparseable labels
/// return [`i64::MAX`] so they sort last; the label is never treated as
/// chronological truth.
#[must_use]
pub fn get_time_in_minutes(label: &str) -> i64 {
    parse_label_minutes(label).unwrap_or(i64::MAX)
}

/// Buckets the visible task set by local calendar day and due-by label.
///
/// Episodic tasks are filtered by their own gates, sorted by title, and
/// attached only to the Today bucket; a Today bucket is synthesized when
/// episodic tasks survive but no chronological task lands on today. All
/// other tasks pass through [`should_filter_task`], are sorted by
/// [`sort_task_array`], and bucket on `expire_time_ms`, else
/// `start_time_ms`, else today.
#[must_use]
pub fn group_by_day_and_time<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> Vec<DayGroup> {
    let now_utc = now.with_timezone(&Utc);
    let today = now.date_naive();

    let mut episodic: Vec<Task> = tasks
        .iter()
        .filter(|task| is_episodic_visible(task))
        .cloned()
        .collect();
    episodic.sort_by(|left, right| left.title.cmp(&right.title));

    let mut chronological: Vec<Task> = tasks
        .iter()
        .filter(|task| task.kind != TaskKind::Episodic && !should_filter_task(task, now_utc))
        .cloned()
        .collect();
    sort_task_array(&mut chronological);

    let mut buckets: BTreeMap<NaiveDate, Vec<Task>> = BTreeMap::new();
    for task in chronological {
        let date = bucket_date(&task, now, today);
        buckets.entry(date).or_default().push(task);
    }
    if !episodic.is_empty() {
        buckets.entry(today).or_default();
    }

    buckets
        .into_iter()
        .map(|(date, day_tasks)| {
            let mut group = build_day_group(date, today, day_tasks);
            if date == today {
                group.tasks_without_time.extend(episodic.iter().cloned());
            }
            group
        })
        .collect()
}

/// Calendar day a task belongs to, in the caller's timezone.
fn bucket_date<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>, today: NaiveDate) -> NaiveDate {
    task.expire_time_ms
        .or(task.start_time_ms)
        .and_then(DateTime::from_timestamp_millis)
        .map_or(today, |instant| {
            instant.with_timezone(&now.timezone()).date_naive()
        })
}

fn build_day_group(date: NaiveDate, today: NaiveDate, day_tasks: Vec<Task>) -> DayGroup {
    let mut tasks_without_time: Vec<Task> = Vec::new();
    let mut time_groups: Vec<TimeGroup> = Vec::new();
    for task in day_tasks {
        match task.due_by_label.clone() {
            None => tasks_without_time.push(task),
            Some(label) => push_time_group(&mut time_groups, label, task),
        }
    }
    time_groups.sort_by(|left, right| {
        get_time_in_minutes(&left.time)
            .cmp(&get_time_in_minutes(&right.time))
            .then_with(|| left.time.cmp(&right.time))
    });
    DayGroup {
        day_label: day_label(date, today),
        day_date: date,
        tasks_without_time,
        time_groups,
    }
}

fn push_time_group(groups: &mut Vec<TimeGroup>, label: String, task: Task) {
    if let Some(existing) = groups.iter_mut().find(|group| group.time == label) {
        existing.tasks.push(task);
        return;
    }
    groups.push(TimeGroup {
        time: label,
        tasks: vec![task],
    });
}

fn day_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        return "Today".to_owned();
    }
    if today.succ_opt() == Some(date) {
        return "Tomorrow".to_owned();
    }
    if today.pred_opt() == Some(date) {
        return "Yesterday".to_owned();
    }
    date.format("%A, %d %B").to_string()
}

#[derive(Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

fn split_meridiem(text: &str) -> (&str, Option<Meridiem>) {
    if let Some(rest) = text.strip_suffix("am") {
        return (rest, Some(Meridiem::Am));
    }
    if let Some(rest) = text.strip_suffix("pm") {
        return (rest, Some(Meridiem::Pm));
    }
    (text, None)
}

fn parse_label_minutes(label: &str) -> Option<i64> {
    let lowered = label.trim().to_ascii_lowercase();
    if lowered.is_empty() {
        return None;
    }
    let (clock_part, meridiem) = split_meridiem(&lowered);
    let mut fields = clock_part.trim().splitn(2, ':');
    let hour: i64 = fields.next()?.trim().parse().ok()?;
    let minute: i64 = match fields.next() {
        Some(text) => text.trim().parse().ok()?,
        None => 0,
    };
    if !(0..60).contains(&minute) {
        return None;
    }
    let hour_of_day = resolve_hour(hour, meridiem)?;
    Some(hour_of_day * 60 + minute)
}

fn resolve_hour(hour: i64, meridiem: Option<Meridiem>) -> Option<i64> {
    let Some(half) = meridiem else {
        return (0..24).contains(&hour).then_some(hour);
    };
    if !(1..=12).contains(&hour) {
        return None;
    }
    let resolved = match half {
        Meridiem::Am if hour == 12 => 0,
        Meridiem::Am => hour,
        Meridiem::Pm if hour == 12 => 12,
        Meridiem::Pm => hour + 12,
    };
    Some(resolved)
}
