//! CSV export of the workout log.
//!
//! One row per valid entry, newest first, with a header row and every value
//! quoted. The output is UTF-8 with a byte-order mark so spreadsheet
//! applications pick the encoding up correctly.

use crate::{log_engine, BodyPart, Result, WorkoutEntry};
use chrono::Local;
use std::io::Write;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    week: u32,
    part: &'a str,
    exercise: &'a str,
    weight: f64,
    reps: u32,
    date: String,
    comment: &'a str,
}

/// Write the valid log as CSV to an arbitrary writer
pub fn write_csv<W: Write>(
    mut writer: W,
    entries: &[WorkoutEntry],
    body_parts: &[BodyPart],
) -> Result<()> {
    writer.write_all(UTF8_BOM)?;

    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);

    for entry in log_engine::sorted_desc(entries) {
        // Resolve the display name; a deleted body part falls back to its id
        let part_name = body_parts
            .iter()
            .find(|p| p.id == entry.part)
            .map(|p| p.name.as_str())
            .unwrap_or(entry.part.as_str());

        let date = entry
            .parsed_date()
            .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();

        csv_writer.serialize(CsvRow {
            week: entry.week,
            part: part_name,
            exercise: &entry.exercise,
            weight: entry.weight,
            reps: entry.reps,
            date,
            comment: entry.comment.as_deref().unwrap_or(""),
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the valid log as CSV to a file
pub fn export_csv(path: &Path, entries: &[WorkoutEntry], body_parts: &[BodyPart]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    write_csv(file, entries, body_parts)?;
    tracing::info!("Exported workout log CSV to {:?}", path);
    Ok(())
}
