//! Append-only run log.
//!
//! Each non-dry generation run is recorded as one JSON line with file
//! locking for safe concurrent access. The log is the audit trail of what
//! was generated and when; it carries counts, not events.

use crate::engine::MonthSchedule;
use crate::Result;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One generation run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub month: String,
    pub full_workouts: usize,
    pub cardio_sessions: usize,
    pub total: usize,
    pub classes_detected: usize,
}

impl RunRecord {
    /// Build a record for a just-generated schedule
    pub fn from_schedule(schedule: &MonthSchedule) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            month: schedule.month.to_string(),
            full_workouts: schedule.summary.full_workouts,
            cardio_sessions: schedule.summary.cardio_sessions,
            total: schedule.summary.total,
            classes_detected: schedule.summary.classes_detected,
        }
    }
}

/// JSONL-backed run log with file locking
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    /// Create a run log handle for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one record as a JSON line
    pub fn append(&self, record: &RunRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Acquire exclusive lock
        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended run {} to run log", record.run_id);
        Ok(())
    }

    /// Read all records from the log
    pub fn read(&self) -> Result<Vec<RunRecord>> {
        read_runs(&self.path)
    }
}

/// Read all run records from a log file
pub fn read_runs(path: &Path) -> Result<Vec<RunRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Acquire shared lock for reading
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<RunRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse run record at line {}: {}", line_num + 1, e);
                // Continue reading, don't fail completely
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} records from run log", records.len());
    Ok(records)
}
