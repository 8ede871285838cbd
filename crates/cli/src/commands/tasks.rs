//! Handlers for the task registry commands

use crate::display::{task_detail, task_line};
use crate::parse::format_date;
use chrono::{DateTime, Utc};
use std::io::Write;
use todo_core::{Error, Priority, Result, Status, TaskId};
use todo_registry::TaskUseCase;

pub fn add(
    tasks: &dyn TaskUseCase,
    out: &mut dyn Write,
    title: &str,
    description: &str,
    priority: Priority,
    due: Option<DateTime<Utc>>,
) -> Result<()> {
    let id = tasks.add(title, description, priority, due)?;
    writeln!(out, "added task #{id}")?;
    Ok(())
}

pub fn list(tasks: &dyn TaskUseCase, out: &mut dyn Write, status: Option<Status>) -> Result<()> {
    let listed = tasks.list(status);
    if listed.is_empty() {
        writeln!(out, "no tasks")?;
    }
    for task in &listed {
        writeln!(out, "{}", task_line(task))?;
    }
    Ok(())
}

pub fn show(tasks: &dyn TaskUseCase, out: &mut dyn Write, id: TaskId) -> Result<()> {
    let task = tasks.get(id)?;
    writeln!(out, "{}", task_detail(&task))?;
    Ok(())
}

pub fn rename(tasks: &dyn TaskUseCase, out: &mut dyn Write, id: TaskId, title: &str) -> Result<()> {
    tasks.update_title(id, title)?;
    writeln!(out, "task #{id} renamed")?;
    Ok(())
}

pub fn describe(
    tasks: &dyn TaskUseCase,
    out: &mut dyn Write,
    id: TaskId,
    text: &str,
) -> Result<()> {
    tasks.update_description(id, text)?;
    writeln!(out, "task #{id} description updated")?;
    Ok(())
}

pub fn set_status(
    tasks: &dyn TaskUseCase,
    out: &mut dyn Write,
    id: TaskId,
    status: Status,
) -> Result<()> {
    tasks.set_status(id, status)?;
    writeln!(out, "task #{id} is now {status}")?;
    Ok(())
}

pub fn set_priority(
    tasks: &dyn TaskUseCase,
    out: &mut dyn Write,
    id: TaskId,
    priority: Priority,
) -> Result<()> {
    tasks.set_priority(id, priority)?;
    writeln!(out, "task #{id} priority set to {priority}")?;
    Ok(())
}

pub fn due(
    tasks: &dyn TaskUseCase,
    out: &mut dyn Write,
    id: TaskId,
    date: Option<DateTime<Utc>>,
    clear: bool,
) -> Result<()> {
    match (date, clear) {
        (_, true) => {
            tasks.clear_due(id)?;
            writeln!(out, "task #{id} has no due date")?;
        }
        (Some(date), false) => {
            tasks.set_due(id, date)?;
            writeln!(out, "task #{id} due {}", format_date(date))?;
        }
        (None, false) => {
            return Err(Error::validation("due", "a date or --clear is required"));
        }
    }
    Ok(())
}

pub fn delete(tasks: &dyn TaskUseCase, out: &mut dyn Write, id: TaskId) -> Result<()> {
    tasks.delete(id)?;
    writeln!(out, "task #{id} deleted")?;
    Ok(())
}

pub fn renumber(tasks: &dyn TaskUseCase, out: &mut dyn Write, confirmed: bool) -> Result<()> {
    if !confirmed {
        writeln!(
            out,
            "renumbering reassigns every task id; run again with --yes to confirm"
        )?;
        return Ok(());
    }
    tasks.renumber_ids()?;
    let count = tasks.list(None).len();
    writeln!(out, "renumbered {count} tasks")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;
    use todo_registry::{JsonFileStore, TaskRegistry};

    fn registry(dir: &TempDir) -> TaskRegistry {
        TaskRegistry::new(Arc::new(JsonFileStore::new(dir.path().join("tasks.json")))).unwrap()
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_add_then_list() {
        let dir = TempDir::new().unwrap();
        let registry = registry(&dir);
        let mut out = Vec::new();

        add(&registry, &mut out, "Buy milk", "", Priority::High, None).unwrap();
        list(&registry, &mut out, None).unwrap();

        assert_eq!(output(out), "added task #1\n#1 [new] (high) Buy milk\n");
    }

    #[test]
    fn test_empty_list_says_so() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();
        list(&registry(&dir), &mut out, Some(Status::Done)).unwrap();
        assert_eq!(output(out), "no tasks\n");
    }

    #[test]
    fn test_renumber_needs_confirmation() {
        let dir = TempDir::new().unwrap();
        let registry = registry(&dir);
        let mut out = Vec::new();
        add(&registry, &mut out, "a", "", Priority::Low, None).unwrap();
        add(&registry, &mut out, "b", "", Priority::Low, None).unwrap();
        delete(&registry, &mut out, TaskId::new(1)).unwrap();

        renumber(&registry, &mut out, false).unwrap();
        assert!(registry.get(TaskId::new(2)).is_ok());

        renumber(&registry, &mut out, true).unwrap();
        assert_eq!(registry.get(TaskId::new(1)).unwrap().title(), "b");
        assert!(output(out).ends_with("renumbered 1 tasks\n"));
    }

    #[test]
    fn test_due_requires_date_or_clear() {
        let dir = TempDir::new().unwrap();
        let registry = registry(&dir);
        let mut out = Vec::new();
        add(&registry, &mut out, "a", "", Priority::Low, None).unwrap();

        let err = due(&registry, &mut out, TaskId::new(1), None, false).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_missing_task_is_reported() {
        let dir = TempDir::new().unwrap();
        let mut out = Vec::new();
        let err = show(&registry(&dir), &mut out, TaskId::new(9)).unwrap_err();
        assert!(err.is_not_found());
    }
}
