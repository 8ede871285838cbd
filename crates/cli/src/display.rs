//! Plain-text rendering of tasks and buckets

use crate::parse::format_date;
use std::fmt::Write;
use todo_core::{Priority, Task};
use todo_pipeline::PriorityRepository;

const BUCKET_PREVIEW: usize = 5;

/// One line per task: `#3 [in_progress] (high) Write report due 2026-03-14`
pub fn task_line(task: &Task) -> String {
    let mut line = format!(
        "#{} [{}] ({}) {}",
        task.id(),
        task.status(),
        task.priority(),
        task.title()
    );
    if let Some(due) = task.due_at() {
        let _ = write!(line, " due {}", format_date(due));
    }
    line
}

pub fn task_detail(task: &Task) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "id:          {}", task.id());
    let _ = writeln!(out, "title:       {}", task.title());
    if !task.description().is_empty() {
        let _ = writeln!(out, "description: {}", task.description());
    }
    let _ = writeln!(out, "status:      {}", task.status());
    let _ = writeln!(out, "priority:    {}", task.priority());
    if let Some(due) = task.due_at() {
        let _ = writeln!(out, "due:         {}", format_date(due));
    }
    let _ = writeln!(out, "created:     {}", task.created_at().to_rfc3339());
    let _ = writeln!(out, "updated:     {}", task.updated_at().to_rfc3339());
    if let Some(done) = task.completed_at() {
        let _ = writeln!(out, "completed:   {}", done.to_rfc3339());
    }
    out.trim_end().to_string()
}

/// Size of each bucket, highest tier first, with the newest few titles
pub fn bucket_report(repo: &PriorityRepository) -> String {
    let mut out = String::new();
    for tier in Priority::ALL.into_iter().rev() {
        let tasks = repo.snapshot(tier);
        let _ = writeln!(out, "{tier}: {} tasks", tasks.len());
        for task in tasks.iter().rev().take(BUCKET_PREVIEW) {
            let _ = writeln!(out, "  - {} (#{})", task.title(), task.id());
        }
        if tasks.len() > BUCKET_PREVIEW {
            let _ = writeln!(out, "  ... and {} more", tasks.len() - BUCKET_PREVIEW);
        }
    }
    out.trim_end().to_string()
}
