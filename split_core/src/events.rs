//! Loader for the existing-events snapshot.
//!
//! The calendar source is external: something else fetches the month's
//! events and hands them over as a JSON array of `{title, start, end}`
//! with RFC3339 timestamps. The offset in each timestamp is taken as the
//! target zone's local offset, so the wall-clock time is what matters.

use crate::{ExistingEvent, Result};
use chrono::DateTime;
use serde::Deserialize;
use std::path::Path;

/// Raw row as found in the events file
#[derive(Debug, Deserialize)]
struct EventRow {
    title: String,
    start: String,
    end: String,
}

/// Load existing events from a JSON snapshot file.
///
/// Returns an empty list if the file doesn't exist (no classes that
/// month). A file that isn't valid JSON is an error; individual rows with
/// unparseable timestamps are skipped with a warning.
pub fn load_existing_events(path: &Path) -> Result<Vec<ExistingEvent>> {
    if !path.exists() {
        tracing::info!("No events file at {:?}; assuming no existing events", path);
        return Ok(Vec::new());
    }

    let contents = std::fs::read_to_string(path)?;
    let rows: Vec<EventRow> = serde_json::from_str(&contents)?;

    let mut events = Vec::new();
    for (i, row) in rows.into_iter().enumerate() {
        let start = DateTime::parse_from_rfc3339(&row.start);
        let end = DateTime::parse_from_rfc3339(&row.end);

        match (start, end) {
            (Ok(start), Ok(end)) => events.push(ExistingEvent {
                title: row.title,
                start: start.naive_local(),
                end: end.naive_local(),
            }),
            (start, end) => {
                tracing::warn!(
                    "Skipping event row {} ('{}'): bad timestamp ({:?} / {:?})",
                    i,
                    row.title,
                    start.err(),
                    end.err()
                );
            }
        }
    }

    tracing::info!("Loaded {} existing events from {:?}", events.len(), path);
    Ok(events)
}
