//! JSON file persistence for the schedule record set.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::schedule::ScheduleMap;

/// The durable stream-to-record mapping, stored in a single JSON file.
///
/// The file is replaced wholesale on every store, so a concurrent reader sees
/// either the previous or the new record set, never a mix.
#[derive(Debug, Clone)]
pub struct ScheduleCache {
    backing_file: PathBuf,
}

impl ScheduleCache {
    pub fn new(backing_file: impl Into<PathBuf>) -> Self {
        Self {
            backing_file: backing_file.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.backing_file
    }

    /// Read the persisted record set.
    ///
    /// A missing or unreadable file is an empty schedule, not an error: the
    /// next evaluator run rebuilds the state from scratch anyway.
    pub fn load(&self) -> ScheduleMap {
        let Ok(contents) = fs::read_to_string(&self.backing_file) else {
            return ScheduleMap::new();
        };
        match serde_json::from_str(&contents) {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    file = %self.backing_file.display(),
                    error = %err,
                    "unparsable schedule cache, starting empty"
                );
                ScheduleMap::new()
            }
        }
    }

    /// Replace the persisted record set.
    ///
    /// Writes a sibling temp file first and renames it over the target, which
    /// is what makes the replace atomic for readers.
    pub fn store(&self, records: &ScheduleMap) -> Result<()> {
        if let Some(parent) = self.backing_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating cache directory {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(records)?;
        let mut temp_file = self.backing_file.clone().into_os_string();
        temp_file.push(".tmp");
        let temp_file = PathBuf::from(temp_file);
        fs::write(&temp_file, json)
            .with_context(|| format!("writing schedule cache {}", temp_file.display()))?;
        fs::rename(&temp_file, &self.backing_file)
            .with_context(|| format!("replacing schedule cache {}", self.backing_file.display()))?;
        Ok(())
    }
}
