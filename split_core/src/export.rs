//! CSV export of a generated schedule.
//!
//! One row per event, suitable for review in a spreadsheet or for import
//! by a sink that prefers tabular input. Descriptions are omitted; the
//! JSON output carries those.

use crate::engine::MonthSchedule;
use crate::{EventKind, Result, ScheduledEvent};
use std::io::Write;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    start: String,
    kind: &'static str,
    template_id: String,
    title: String,
    duration_minutes: u32,
}

impl From<&ScheduledEvent> for CsvRow {
    fn from(event: &ScheduledEvent) -> Self {
        CsvRow {
            date: event.date.to_string(),
            start: event.start.format("%H:%M").to_string(),
            kind: match event.kind {
                EventKind::FullWorkout => "full_workout",
                EventKind::CardioOnly => "cardio_only",
            },
            template_id: event.template_id.clone().unwrap_or_default(),
            title: event.title.clone(),
            duration_minutes: event.duration_minutes,
        }
    }
}

/// Write the schedule as CSV to any writer
pub fn write_schedule_csv<W: Write>(schedule: &MonthSchedule, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(true).from_writer(writer);

    for event in &schedule.events {
        csv_writer.serialize(CsvRow::from(event))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the schedule as CSV to a file
pub fn write_schedule_csv_file(schedule: &MonthSchedule, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(path)?;
    write_schedule_csv(schedule, &file)?;
    file.sync_all()?;

    tracing::info!("Wrote {} events as CSV to {:?}", schedule.events.len(), path);
    Ok(())
}
