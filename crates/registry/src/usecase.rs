//! The CRUD/query contract front ends program against

use chrono::{DateTime, Utc};
use todo_core::{Priority, Result, Status, Task, TaskId};

/// Operations exposed to CLI, HTTP and RPC adapters.
///
/// Every mutating call persists a full snapshot before it returns `Ok`.
/// Returned tasks are copies; changing them does not touch the registry.
pub trait TaskUseCase: Send + Sync {
    fn add(
        &self,
        title: &str,
        description: &str,
        priority: Priority,
        due_at: Option<DateTime<Utc>>,
    ) -> Result<TaskId>;

    /// All tasks, oldest first, optionally restricted to one status
    fn list(&self, filter: Option<Status>) -> Vec<Task>;

    fn get(&self, id: TaskId) -> Result<Task>;

    fn update_title(&self, id: TaskId, title: &str) -> Result<()>;

    fn update_description(&self, id: TaskId, description: &str) -> Result<()>;

    fn set_status(&self, id: TaskId, status: Status) -> Result<()>;

    fn set_priority(&self, id: TaskId, priority: Priority) -> Result<()>;

    fn set_due(&self, id: TaskId, due_at: DateTime<Utc>) -> Result<()>;

    fn clear_due(&self, id: TaskId) -> Result<()>;

    fn delete(&self, id: TaskId) -> Result<()>;

    /// Reassign ids 1..=N in creation order
    fn renumber_ids(&self) -> Result<()>;
}
