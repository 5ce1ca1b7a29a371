//! Persistent slot store.
//!
//! Each top-level state slot lives in its own JSON file under the data
//! directory, named after a versioned key (`workout_log_v2.json`, ...).
//! Reads fall back to a typed default; writes are atomic and best-effort.

use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Versioned slot keys. A shape change bumps the suffix and abandons the
/// old key rather than migrating it.
pub mod keys {
    pub const WORKOUT_LOG: &str = "workout_log_v2";
    pub const BODY_PARTS: &str = "body_parts_v2";
    pub const EXERCISES: &str = "exercises_v2";
    pub const ROUTINES: &str = "routines_v2";
    pub const WEEKLY_SCHEDULE: &str = "weekly_schedule_v2";
    pub const NUTRITION_GOALS: &str = "nutrition_goals_v2";
    pub const FOOD_DATABASE: &str = "food_database_v2";
    pub const DAILY_DIET_LOGS: &str = "daily_diet_logs_v2";
}

/// Key-value store backed by one JSON file per slot
#[derive(Debug)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open a store rooted at the given directory, creating it if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Read a slot, falling back to `default`.
    ///
    /// A missing slot is initialized with the default so subsequent reads
    /// are stable. A corrupt slot is logged and the default returned; the
    /// stored value is discarded in favor of availability.
    pub fn get<T>(&self, key: &str, default: T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        let path = self.slot_path(key);
        if !path.exists() {
            tracing::debug!("Slot {} missing, initializing with default", key);
            self.set(key, &default);
            return default;
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!("Unable to read slot {} at {:?}: {}. Using default.", key, path, e);
                return default;
            }
        };

        match serde_json::from_str::<T>(&contents) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to parse slot {} at {:?}: {}. Using default.", key, path, e);
                default
            }
        }
    }

    /// Write a slot synchronously. Storage faults are logged and swallowed;
    /// the caller keeps operating on in-memory state for the session.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.write_atomic(key, value) {
            tracing::error!("Failed to persist slot {}: {}", key, e);
        }
    }

    /// Atomically write a slot by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    fn write_atomic<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let temp = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(value)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        temp.persist(self.slot_path(key))
            .map_err(|e| crate::Error::Io(e.error))?;

        tracing::debug!("Persisted slot {}", key);
        Ok(())
    }
}
