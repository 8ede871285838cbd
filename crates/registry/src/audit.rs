//! Best-effort audit sinks

use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use todo_core::{AuditEvent, Error, Result};
use tracing::info;

/// Receives one event per successful registry mutation.
///
/// Failures are logged by the registry and never reach the caller of the
/// mutating operation.
pub trait AuditSink: Send + Sync {
    fn log_event(&self, event: &AuditEvent) -> Result<()>;
}

/// Emits audit events as structured tracing records on `todo::audit`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn log_event(&self, event: &AuditEvent) -> Result<()> {
        info!(
            target: "todo::audit",
            op = %event.op,
            task_id = ?event.task_id.map(|id| id.get()),
            key = %event.key(),
            "task audit event"
        );
        Ok(())
    }
}

/// Appends each event as one JSON object per line
#[derive(Debug)]
pub struct JsonLinesAuditSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonLinesAuditSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonLinesAuditSink {
    fn log_event(&self, event: &AuditEvent) -> Result<()> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::file_system(parent, "create audit directory", e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::file_system(&self.path, "open audit log", e))?;
        file.write_all(&line)
            .map_err(|e| Error::file_system(&self.path, "append audit event", e))
    }
}
