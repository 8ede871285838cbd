//! Persisted task representation

use super::{Priority, Status, Task, TaskId};
use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One task as it appears in a snapshot file.
///
/// `status` and `priority` keep their raw encodings so that a record with
/// an unknown value still deserializes and can be rejected on its own
/// instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    pub priority: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            id: self.id(),
            title: self.title().to_string(),
            description: Some(self.description().to_string()).filter(|d| !d.is_empty()),
            status: self.status().as_str().to_string(),
            priority: self.priority().level(),
            due_at: self.due_at(),
            created_at: self.created_at(),
            updated_at: self.updated_at(),
            completed_at: self.completed_at(),
        }
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = Error;

    fn try_from(record: TaskRecord) -> Result<Self> {
        let status: Status = record.status.parse()?;
        let priority = Priority::try_from(record.priority)?;
        Task::from_parts(
            record.id,
            &record.title,
            record.description.as_deref().unwrap_or_default(),
            status,
            priority,
            record.due_at,
            record.created_at,
            record.updated_at,
            record.completed_at,
        )
    }
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        task.to_record()
    }
}
