//! Weekly schedule resolution and routine expansion.
//!
//! A routine expands into loggable entry drafts by defaulting each
//! exercise's weight and reps to the most recent matching history entry
//! ("smart lookup"). The lookup scans the full log, never a filtered view.

use crate::{EntryDraft, WeeklySchedule, WorkoutEntry, WorkoutRoutine};
use chrono::{Datelike, Local, NaiveDate, TimeZone, Utc};

/// Comment attached to entries produced by routine expansion
pub const AUTO_LOG_COMMENT: &str = "Auto-logged from the weekly schedule";

/// Weekday index of a date, 0=Sunday .. 6=Saturday
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Routine scheduled for the weekday of `date`, if any.
///
/// The schedule is sparse; a missing weekday or a dangling routine id both
/// resolve to none.
pub fn resolve_scheduled_routine<'a>(
    date: NaiveDate,
    schedule: &WeeklySchedule,
    routines: &'a [WorkoutRoutine],
) -> Option<&'a WorkoutRoutine> {
    let routine_id = schedule.get(&weekday_index(date))?;
    routines.iter().find(|r| &r.id == routine_id)
}

/// Expand a routine into entry drafts for `target_date`.
///
/// Emits one draft per routine exercise, in routine order, stamped at noon
/// local time on the target day (noon keeps the stamp inside the intended
/// calendar day when rendered in other offsets).
pub fn expand_routine(
    routine: &WorkoutRoutine,
    log: &[WorkoutEntry],
    week: u32,
    target_date: NaiveDate,
) -> Vec<EntryDraft> {
    let date = noon_local_rfc3339(target_date);

    routine
        .exercises
        .iter()
        .map(|ex| {
            let last = last_entry_for(log, &ex.exercise_name);
            EntryDraft {
                part: ex.part_id.clone(),
                exercise: ex.exercise_name.clone(),
                weight: last.map_or(0.0, |e| e.weight),
                reps: last.map_or(0, |e| e.reps),
                week,
                comment: Some(AUTO_LOG_COMMENT.into()),
                date: Some(date.clone()),
            }
        })
        .collect()
}

/// Most recent log entry with the given exercise name
fn last_entry_for<'a>(log: &'a [WorkoutEntry], exercise_name: &str) -> Option<&'a WorkoutEntry> {
    log.iter()
        .filter(|e| e.exercise == exercise_name)
        .filter_map(|e| e.parsed_date().map(|d| (e, d)))
        .max_by_key(|(_, d)| *d)
        .map(|(e, _)| e)
}

fn noon_local_rfc3339(date: NaiveDate) -> String {
    let naive = match date.and_hms_opt(12, 0, 0) {
        Some(naive) => naive,
        None => return Utc::now().to_rfc3339(),
    };
    match naive.and_local_timezone(Local).earliest() {
        Some(dt) => dt.to_rfc3339(),
        // Noon fell into a local-time gap; fall back to treating it as UTC
        None => Utc.from_utc_datetime(&naive).to_rfc3339(),
    }
}
