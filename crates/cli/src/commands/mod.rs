use crate::app::App;
use crate::parse::parse_date;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use std::io;
use todo_core::{Priority, Result, Status, TaskId};

pub mod run;
pub mod tasks;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new task
    #[command(visible_alias = "a")]
    Add {
        /// Task title
        title: String,

        /// Longer description
        #[arg(short, long, default_value = "")]
        description: String,

        /// low, medium, high or 1..3
        #[arg(short, long, default_value_t = Priority::Medium)]
        priority: Priority,

        /// Due date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        due: Option<DateTime<Utc>>,
    },

    /// List tasks, oldest first
    #[command(visible_alias = "ls")]
    List {
        /// Only show tasks with this status
        #[arg(short, long)]
        status: Option<Status>,
    },

    /// Show every field of one task
    Show { id: TaskId },

    /// Rename a task
    Title { id: TaskId, title: String },

    /// Replace a task's description
    Describe { id: TaskId, text: String },

    /// Move a task to new, in_progress, done, paused or canceled
    Status { id: TaskId, status: Status },

    /// Change a task's priority
    Priority { id: TaskId, priority: Priority },

    /// Set or clear a task's due date
    Due {
        id: TaskId,

        /// Due date (YYYY-MM-DD)
        #[arg(value_parser = parse_date, required_unless_present = "clear")]
        date: Option<DateTime<Utc>>,

        /// Remove the due date instead
        #[arg(long, conflicts_with = "date")]
        clear: bool,
    },

    /// Delete a task
    #[command(visible_alias = "rm")]
    Delete { id: TaskId },

    /// Reassign ids 1..N in creation order
    Renumber {
        /// Confirm; ids shown by earlier commands become stale
        #[arg(long)]
        yes: bool,
    },

    /// Start the background pipeline and accept commands on stdin
    Run,
}

impl Commands {
    pub async fn execute(self, app: &App) -> Result<()> {
        let registry = app.registry.as_ref();
        let mut out = io::stdout();

        match self {
            Commands::Add {
                title,
                description,
                priority,
                due,
            } => tasks::add(registry, &mut out, &title, &description, priority, due),
            Commands::List { status } => tasks::list(registry, &mut out, status),
            Commands::Show { id } => tasks::show(registry, &mut out, id),
            Commands::Title { id, title } => tasks::rename(registry, &mut out, id, &title),
            Commands::Describe { id, text } => tasks::describe(registry, &mut out, id, &text),
            Commands::Status { id, status } => tasks::set_status(registry, &mut out, id, status),
            Commands::Priority { id, priority } => {
                tasks::set_priority(registry, &mut out, id, priority)
            }
            Commands::Due { id, date, clear } => tasks::due(registry, &mut out, id, date, clear),
            Commands::Delete { id } => tasks::delete(registry, &mut out, id),
            Commands::Renumber { yes } => tasks::renumber(registry, &mut out, yes),
            Commands::Run => run::execute(app).await,
        }
    }
}
