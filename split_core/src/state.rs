//! Progression snapshot persistence with file locking.
//!
//! The snapshot is read-only to the engine: the user edits the stored file
//! out-of-band as workouts get completed. The only thing written here is
//! the suggested-update record, to a separate file, atomically.

use crate::{Error, ProgressionSnapshot, Result, SuggestedUpdate};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

impl ProgressionSnapshot {
    /// Load the snapshot from a file with shared locking.
    ///
    /// Returns default state if the file doesn't exist. If the file is
    /// corrupted, logs a warning and returns default state; per-exercise
    /// gaps degrade later at prescription time, never here.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No progression snapshot found, using defaults");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open snapshot {:?}: {}. Using defaults.", path, e);
                return Ok(Self::default());
            }
        };

        // Acquire shared lock for reading
        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock snapshot {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read snapshot {:?}: {}. Using defaults.", path, e);
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<ProgressionSnapshot>(&contents) {
            Ok(snapshot) => {
                tracing::debug!("Loaded progression snapshot from {:?}", path);
                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!("Failed to parse snapshot {:?}: {}. Using defaults.", path, e);
                Ok(Self::default())
            }
        }
    }
}

impl SuggestedUpdate {
    /// Write the suggested update to its own file, atomically.
    ///
    /// Writes to a locked temp file in the same directory, syncs, then
    /// renames over the target. The authoritative snapshot is untouched.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "suggested path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Wrote suggested update to {:?}", path);
        Ok(())
    }
}
