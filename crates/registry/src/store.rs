//! Snapshot storage for task records

use std::path::{Path, PathBuf};
use todo_core::{Error, Result, TaskRecord};
use todo_utils::{read_if_exists, write_atomic};
use tracing::{debug, warn};

/// Load and save a full snapshot of task records.
///
/// `save` must be atomic from the caller's point of view: after a failed
/// save the previously committed snapshot is still readable.
pub trait Store: Send + Sync {
    fn load(&self) -> Result<Vec<TaskRecord>>;

    fn save(&self, records: &[TaskRecord]) -> Result<()>;
}

/// Pretty-printed JSON array on disk, replaced via temp file + rename
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_path(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::configuration("empty store path"));
        }
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Result<Vec<TaskRecord>> {
        self.ensure_path()?;
        let Some(bytes) = read_if_exists(&self.path)? else {
            debug!(path = %self.path.display(), "no task snapshot yet");
            return Ok(Vec::new());
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let entries: Vec<serde_json::Value> = serde_json::from_slice(&bytes).map_err(|e| {
            Error::json(format!("failed to parse {}", self.path.display()), e)
        })?;

        let total = entries.len();
        let records: Vec<TaskRecord> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!(index, error = %e, "skipping malformed task record");
                    None
                }
            })
            .collect();

        if records.len() < total {
            warn!(
                path = %self.path.display(),
                skipped = total - records.len(),
                "some task records could not be decoded"
            );
        }
        Ok(records)
    }

    fn save(&self, records: &[TaskRecord]) -> Result<()> {
        self.ensure_path()?;
        let raw = serde_json::to_vec_pretty(records)?;
        write_atomic(&self.path, &raw)
    }
}
