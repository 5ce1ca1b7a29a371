//! Workout log views: tolerant decoding, ordering and filtering.
//!
//! Storage order is insertion order (newest entries prepended); every read
//! boundary applies an explicit stable sort by timestamp descending so the
//! view order does not depend on how entries were inserted.

use crate::WorkoutEntry;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde_json::Value as JsonValue;

/// Decode a raw log slot value item by item.
///
/// Malformed or invalid items are skipped with a warning instead of failing
/// the whole slot, so one bad record never hides the rest of the history.
pub fn decode_entries(value: &JsonValue) -> Vec<WorkoutEntry> {
    let items = match value.as_array() {
        Some(items) => items,
        None => {
            if !value.is_null() {
                tracing::warn!("Workout log slot is not a sequence, treating as empty");
            }
            return Vec::new();
        }
    };

    let mut entries = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match serde_json::from_value::<WorkoutEntry>(item.clone()) {
            Ok(entry) if entry.is_valid() => entries.push(entry),
            Ok(entry) => {
                tracing::warn!("Skipping invalid log entry at index {} (id {:?})", idx, entry.id);
            }
            Err(e) => {
                tracing::warn!("Failed to decode log entry at index {}: {}", idx, e);
            }
        }
    }
    entries
}

/// Valid entries sorted by timestamp, newest first.
///
/// The sort is stable: entries sharing a timestamp keep their insertion
/// order relative to each other.
pub fn sorted_desc(entries: &[WorkoutEntry]) -> Vec<&WorkoutEntry> {
    let mut dated: Vec<(&WorkoutEntry, DateTime<Utc>)> = entries
        .iter()
        .filter(|e| e.is_valid())
        .filter_map(|e| e.parsed_date().map(|d| (e, d)))
        .collect();
    dated.sort_by(|a, b| b.1.cmp(&a.1));
    dated.into_iter().map(|(e, _)| e).collect()
}

/// Body-part / week equality filters, composable (AND); `None` means "all".
/// Returns the newest-first view.
pub fn filter_entries<'a>(
    entries: &'a [WorkoutEntry],
    part: Option<&str>,
    week: Option<u32>,
) -> Vec<&'a WorkoutEntry> {
    sorted_desc(entries)
        .into_iter()
        .filter(|e| part.map_or(true, |p| e.part == p))
        .filter(|e| week.map_or(true, |w| e.week == w))
        .collect()
}

/// Entries whose timestamp falls within `[day 00:00:00.000, day 23:59:59.999]`
/// in the local timezone, newest first.
///
/// The boundaries are built from explicit year/month/day components in local
/// time; parsing the day as UTC midnight would shift the window by the UTC
/// offset.
pub fn filter_by_local_day(entries: &[WorkoutEntry], day: NaiveDate) -> Vec<&WorkoutEntry> {
    let (start, end) = match local_day_bounds(day) {
        Some(bounds) => bounds,
        None => return Vec::new(),
    };

    sorted_desc(entries)
        .into_iter()
        .filter(|e| match e.parsed_date() {
            Some(dt) => dt >= start && dt <= end,
            None => false,
        })
        .collect()
}

/// Sorted distinct week numbers present in the valid log
pub fn available_weeks(entries: &[WorkoutEntry]) -> Vec<u32> {
    let mut weeks: Vec<u32> = entries
        .iter()
        .filter(|e| e.is_valid())
        .map(|e| e.week)
        .collect();
    weeks.sort_unstable();
    weeks.dedup();
    weeks
}

/// Highest week number in the valid log, if any
pub fn latest_week(entries: &[WorkoutEntry]) -> Option<u32> {
    available_weeks(entries).last().copied()
}

fn local_day_bounds(day: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = day.and_hms_opt(0, 0, 0)?.and_local_timezone(Local).earliest()?;
    let end = day
        .and_hms_milli_opt(23, 59, 59, 999)?
        .and_local_timezone(Local)
        .latest()?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}
