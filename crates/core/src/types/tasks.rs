//! The `Task` entity and its mutation rules

use super::{Priority, Status, TaskId};
use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};

/// A single to-do item.
///
/// Fields are private so the two invariants hold for every value that
/// exists: the title is never empty, and `completed_at` is set exactly
/// when the status is [`Status::Done`]. Every mutator bumps `updated_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    status: Status,
    priority: Priority,
    due_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

fn normalized_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::empty_title());
    }
    Ok(title.to_string())
}

impl Task {
    /// Build a fresh task with status `new` and medium priority
    pub fn new(id: TaskId, title: &str, description: &str) -> Result<Self> {
        let title = normalized_title(title)?;
        let now = Utc::now();
        Ok(Self {
            id,
            title,
            description: description.trim().to_string(),
            status: Status::New,
            priority: Priority::default(),
            due_at: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_due(mut self, due_at: Option<DateTime<Utc>>) -> Self {
        self.due_at = due_at;
        self
    }

    /// Reassemble a task from already-validated parts.
    ///
    /// `completed_at` is reconciled with `status`: a done task without a
    /// completion time takes `updated_at`, any other status drops it.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        id: TaskId,
        title: &str,
        description: &str,
        status: Status,
        priority: Priority,
        due_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        let completed_at = match status {
            Status::Done => completed_at.or(Some(updated_at)),
            _ => None,
        };
        Ok(Self {
            id,
            title: normalized_title(title)?,
            description: description.trim().to_string(),
            status,
            priority,
            due_at,
            created_at,
            updated_at,
            completed_at,
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        self.due_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Renumbering only; does not count as a content change
    pub fn set_id(&mut self, id: TaskId) {
        self.id = id;
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.title = normalized_title(title)?;
        self.touch();
        Ok(())
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.trim().to_string();
        self.touch();
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
        self.completed_at = match status {
            Status::Done => Some(Utc::now()),
            _ => None,
        };
        self.touch();
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.touch();
    }

    pub fn set_due(&mut self, due_at: DateTime<Utc>) {
        self.due_at = Some(due_at);
        self.touch();
    }

    pub fn clear_due(&mut self) {
        self.due_at = None;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn sample() -> Task {
        Task::new(TaskId::new(1), "  Buy milk  ", "  two litres ").unwrap()
    }

    #[test]
    fn test_new_trims_and_defaults() {
        let task = sample();
        assert_eq!(task.title(), "Buy milk");
        assert_eq!(task.description(), "two litres");
        assert_eq!(task.status(), Status::New);
        assert_eq!(task.priority(), Priority::Medium);
        assert_eq!(task.created_at(), task.updated_at());
        assert!(task.completed_at().is_none());
    }

    #[test]
    fn test_new_rejects_blank_title() {
        let err = Task::new(TaskId::new(1), "   ", "").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_set_title_keeps_old_title_on_error() {
        let mut task = sample();
        assert!(task.set_title("").is_err());
        assert_eq!(task.title(), "Buy milk");
    }

    #[test]
    fn test_completed_at_tracks_done() {
        let mut task = sample();
        task.set_status(Status::Done);
        assert!(task.completed_at().is_some());
        task.set_status(Status::Paused);
        assert!(task.completed_at().is_none());
    }

    #[test]
    fn test_mutators_bump_updated_at() {
        let mut task = sample();
        let before = task.updated_at();
        task.set_due(Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap());
        assert!(task.updated_at() >= before);
        assert!(task.due_at().is_some());
        task.clear_due();
        assert!(task.due_at().is_none());
    }

    #[test]
    fn test_from_parts_reconciles_completion() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let done = Task::from_parts(
            TaskId::new(4),
            "x",
            "",
            Status::Done,
            Priority::Low,
            None,
            at,
            at,
            None,
        )
        .unwrap();
        assert_eq!(done.completed_at(), Some(at));

        let open = Task::from_parts(
            TaskId::new(5),
            "y",
            "",
            Status::New,
            Priority::Low,
            None,
            at,
            at,
            Some(at),
        )
        .unwrap();
        assert!(open.completed_at().is_none());
    }

    fn any_status() -> impl Strategy<Value = Status> {
        proptest::sample::select(Status::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_completed_at_follows_status(steps in proptest::collection::vec(any_status(), 1..20)) {
            let mut task = sample();
            for status in steps {
                task.set_status(status);
                prop_assert_eq!(task.completed_at().is_some(), status == Status::Done);
                prop_assert!(task.updated_at() >= task.created_at());
            }
        }
    }
}
