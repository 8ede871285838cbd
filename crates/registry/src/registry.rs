//! The in-memory task registry

use crate::audit::AuditSink;
use crate::store::Store;
use crate::usecase::TaskUseCase;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use todo_core::{
    AuditEvent, AuditOp, Error, Priority, Result, Status, Task, TaskId, TaskRecord,
};
use tracing::{debug, info, warn};

struct RegistryState {
    tasks: HashMap<TaskId, Task>,
    next_id: TaskId,
}

/// Authoritative owner of user tasks.
///
/// A single lock serializes every operation, including the store write, so
/// snapshots reach the store in the same order the mutations happened.
/// Mutations other than [`TaskUseCase::renumber_ids`] are applied in memory
/// before the snapshot is written; if the write fails the caller gets
/// [`Error::Persist`] and memory is ahead of disk until the next successful
/// save.
pub struct TaskRegistry {
    store: Arc<dyn Store>,
    audit: Option<Arc<dyn AuditSink>>,
    state: Mutex<RegistryState>,
}

impl TaskRegistry {
    /// Load every valid record from `store`.
    ///
    /// Records that fail validation are skipped; a store that cannot be read
    /// at all is fatal.
    pub fn new(store: Arc<dyn Store>) -> Result<Self> {
        let records = store
            .load()
            .map_err(|e| Error::load("reading task store", e))?;

        let total = records.len();
        let mut tasks = HashMap::with_capacity(total);
        for record in records {
            let id = record.id;
            match Task::try_from(record) {
                Ok(task) => {
                    tasks.insert(id, task);
                }
                Err(e) => debug!(%id, error = %e, "skipping invalid task record"),
            }
        }

        let next_id = match tasks.keys().copied().max().filter(|max| max.get() >= 1) {
            None => TaskId::new(1),
            Some(max) => max.next().ok_or_else(|| {
                Error::load(
                    "assigning the next task id",
                    Error::validation("id", format!("id {max} leaves no room for new tasks")),
                )
            })?,
        };

        info!(loaded = tasks.len(), skipped = total - tasks.len(), %next_id, "task registry ready");
        Ok(Self {
            store,
            audit: None,
            state: Mutex::new(RegistryState { tasks, next_id }),
        })
    }

    #[must_use]
    pub fn with_audit(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    /// The id the next `add` will hand out
    pub fn next_id(&self) -> TaskId {
        self.state.lock().next_id
    }

    pub fn len(&self) -> usize {
        self.state.lock().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, tasks: &HashMap<TaskId, Task>) -> Result<()> {
        let records: Vec<TaskRecord> = creation_order(tasks)
            .into_iter()
            .map(Task::to_record)
            .collect();
        self.store
            .save(&records)
            .map_err(|e| Error::persist(format!("saving {} tasks", records.len()), e))
    }

    fn emit(&self, event: AuditEvent) {
        if let Some(sink) = &self.audit {
            if let Err(e) = sink.log_event(&event) {
                warn!(op = %event.op, error = %e, "audit sink rejected event");
            }
        }
    }

    /// Look up `id`, apply `change`, persist, and audit with before/after
    fn mutate<F>(&self, id: TaskId, op: AuditOp, change: F) -> Result<()>
    where
        F: FnOnce(&mut Task) -> Result<()>,
    {
        let mut state = self.state.lock();
        let task = state.tasks.get_mut(&id).ok_or_else(|| Error::not_found(id))?;
        let before = task.to_record();
        change(task)?;
        let after = task.to_record();
        self.persist(&state.tasks)?;
        drop(state);

        debug!(%id, %op, "task updated");
        self.emit(AuditEvent::new(op, Some(id), Some(before), Some(after)));
        Ok(())
    }
}

/// Tasks sorted oldest first; ids break ties so the order is deterministic
fn creation_order(tasks: &HashMap<TaskId, Task>) -> Vec<&Task> {
    let mut ordered: Vec<&Task> = tasks.values().collect();
    ordered.sort_by_key(|task| (task.created_at(), task.id()));
    ordered
}

impl TaskUseCase for TaskRegistry {
    fn add(
        &self,
        title: &str,
        description: &str,
        priority: Priority,
        due_at: Option<DateTime<Utc>>,
    ) -> Result<TaskId> {
        let mut state = self.state.lock();
        let id = state.next_id;
        let next_id = id
            .next()
            .ok_or_else(|| Error::validation("id", "task ids are exhausted"))?;
        let task = Task::new(id, title, description)?
            .with_priority(priority)
            .with_due(due_at);
        let after = task.to_record();

        state.tasks.insert(id, task);
        state.next_id = next_id;
        self.persist(&state.tasks)?;
        drop(state);

        debug!(%id, %priority, "task added");
        self.emit(AuditEvent::new(AuditOp::Add, Some(id), None, Some(after)));
        Ok(id)
    }

    fn list(&self, filter: Option<Status>) -> Vec<Task> {
        let state = self.state.lock();
        creation_order(&state.tasks)
            .into_iter()
            .filter(|task| filter.map_or(true, |status| task.status() == status))
            .cloned()
            .collect()
    }

    fn get(&self, id: TaskId) -> Result<Task> {
        self.state
            .lock()
            .tasks
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found(id))
    }

    fn update_title(&self, id: TaskId, title: &str) -> Result<()> {
        self.mutate(id, AuditOp::UpdateTitle, |task| task.set_title(title))
    }

    fn update_description(&self, id: TaskId, description: &str) -> Result<()> {
        self.mutate(id, AuditOp::UpdateDesc, |task| {
            task.set_description(description);
            Ok(())
        })
    }

    fn set_status(&self, id: TaskId, status: Status) -> Result<()> {
        self.mutate(id, AuditOp::SetStatus, |task| {
            task.set_status(status);
            Ok(())
        })
    }

    fn set_priority(&self, id: TaskId, priority: Priority) -> Result<()> {
        self.mutate(id, AuditOp::SetPriority, |task| {
            task.set_priority(priority);
            Ok(())
        })
    }

    fn set_due(&self, id: TaskId, due_at: DateTime<Utc>) -> Result<()> {
        self.mutate(id, AuditOp::SetDue, |task| {
            task.set_due(due_at);
            Ok(())
        })
    }

    fn clear_due(&self, id: TaskId) -> Result<()> {
        self.mutate(id, AuditOp::ClearDue, |task| {
            task.clear_due();
            Ok(())
        })
    }

    fn delete(&self, id: TaskId) -> Result<()> {
        let mut state = self.state.lock();
        let removed = state.tasks.remove(&id).ok_or_else(|| Error::not_found(id))?;
        self.persist(&state.tasks)?;
        drop(state);

        debug!(%id, "task deleted");
        self.emit(AuditEvent::new(
            AuditOp::Delete,
            Some(id),
            Some(removed.to_record()),
            None,
        ));
        Ok(())
    }

    fn renumber_ids(&self) -> Result<()> {
        let mut state = self.state.lock();

        let mut renumbered = HashMap::with_capacity(state.tasks.len());
        for (index, task) in creation_order(&state.tasks).into_iter().enumerate() {
            let id = TaskId::new(index as i64 + 1);
            let mut task = task.clone();
            task.set_id(id);
            renumbered.insert(id, task);
        }
        let next_id = TaskId::new(renumbered.len() as i64 + 1);

        // Write the renumbered snapshot first; memory only changes once it is on disk
        self.persist(&renumbered)?;
        state.tasks = renumbered;
        state.next_id = next_id;
        drop(state);

        info!(%next_id, "task ids renumbered");
        self.emit(AuditEvent::new(AuditOp::RenumberIds, None, None, None));
        Ok(())
    }
}
