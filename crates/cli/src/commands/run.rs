//! Interactive mode: the pipeline runs while commands arrive on stdin

use crate::app::App;
use crate::display::bucket_report;
use crate::parse::parse_date;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tokio::sync::mpsc;
use todo_core::{Error, Priority, Result, TaskId};
use todo_pipeline::{Coordinator, PriorityRepository};
use todo_utils::cancel_on_termination;
use tracing::{debug, warn};

use super::tasks;

const MENU: &str = "\
commands:
  add <title>               add a medium priority task
  list [status]             list tasks, optionally filtered by status
  show <id>                 show one task
  title <id> <text>         rename a task
  describe <id> <text>      replace a task's description
  status <id> <status>      move a task to another status
  priority <id> <priority>  change a task's priority
  due <id> <date|clear>     set or clear a due date (YYYY-MM-DD)
  delete <id>               delete a task
  renumber                  compact ids in creation order (asks first)
  buckets                   show generated tasks per priority
  debug                     toggle debug logging
  help                      show this menu
  quit | exit               stop the pipeline and leave";

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// State carried between interactive lines
#[derive(Debug, Default)]
struct Session {
    confirm_renumber: bool,
}

/// Start every pipeline worker, serve stdin commands, then join the workers.
///
/// `quit`, end of input, Ctrl-C and SIGTERM all cancel the same token.
pub async fn execute(app: &App) -> Result<()> {
    let settings = &app.settings.pipeline;
    let repo = Arc::new(match &settings.buckets_dir {
        Some(dir) => PriorityRepository::persistent(dir),
        None => PriorityRepository::new(),
    });

    let coordinator = Coordinator::start(settings, repo.clone())?;
    let token = coordinator.token();
    let watcher = cancel_on_termination(token.clone());

    let mut out = io::stdout();
    writeln!(out, "{MENU}")?;

    let mut session = Session::default();
    let mut input = spawn_stdin_reader();
    loop {
        tokio::select! {
            () = token.cancelled() => break,
            line = input.recv() => {
                let flow = match line {
                    Some(line) => handle_line(app, &repo, &mut session, line.trim(), &mut out)
                        .unwrap_or_else(|e| {
                            warn!(error = %e, "cannot write to stdout");
                            Flow::Quit
                        }),
                    None => Flow::Quit,
                };
                if flow == Flow::Quit {
                    token.cancel();
                    break;
                }
            }
        }
    }

    let report = coordinator.shutdown().await;
    if let Err(e) = watcher.await {
        warn!(error = %e, "signal watcher did not stop cleanly");
    }

    writeln!(
        out,
        "stopped {} workers ({} failed)",
        report.joined, report.panicked
    )?;
    writeln!(out, "{}", bucket_report(&repo))?;
    Ok(())
}

/// Read stdin on a plain thread; a blocking read must not hold up runtime shutdown
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn handle_line(
    app: &App,
    repo: &PriorityRepository,
    session: &mut Session,
    line: &str,
    out: &mut dyn Write,
) -> io::Result<Flow> {
    let registry = app.registry.as_ref();
    if std::mem::take(&mut session.confirm_renumber) {
        let outcome = if matches!(line.to_ascii_lowercase().as_str(), "y" | "yes") {
            tasks::renumber(registry, out, true)
        } else {
            writeln!(out, "renumber cancelled")?;
            Ok(())
        };
        if let Err(e) = outcome {
            writeln!(out, "error: {e}")?;
        }
        return Ok(Flow::Continue);
    }

    let (command, rest) = split_word(line);
    if command.is_empty() {
        return Ok(Flow::Continue);
    }
    debug!(command, "interactive command");

    let outcome = match command {
        "add" => tasks::add(registry, out, rest, "", Priority::Medium, None),
        "list" | "ls" if rest.is_empty() => tasks::list(registry, out, None),
        "list" | "ls" => rest
            .parse()
            .and_then(|status| tasks::list(registry, out, Some(status))),
        "show" => rest.parse().and_then(|id| tasks::show(registry, out, id)),
        "title" => with_id(rest).and_then(|(id, text)| tasks::rename(registry, out, id, text)),
        "describe" => {
            with_id(rest).and_then(|(id, text)| tasks::describe(registry, out, id, text))
        }
        "status" => with_id(rest).and_then(|(id, status)| {
            tasks::set_status(registry, out, id, status.parse()?)
        }),
        "priority" => with_id(rest).and_then(|(id, priority)| {
            tasks::set_priority(registry, out, id, priority.parse()?)
        }),
        "due" => with_id(rest).and_then(|(id, date)| match date {
            "clear" => tasks::due(registry, out, id, None, true),
            _ => {
                let date = parse_date(date).map_err(|e| Error::validation("due", e))?;
                tasks::due(registry, out, id, Some(date), false)
            }
        }),
        "delete" | "rm" => rest.parse().and_then(|id| tasks::delete(registry, out, id)),
        "renumber" => {
            writeln!(out, "renumbering reassigns every task id; continue? [y/N]")?;
            session.confirm_renumber = true;
            Ok(())
        }
        "buckets" => {
            writeln!(out, "{}", bucket_report(repo))?;
            Ok(())
        }
        "debug" => {
            let verbose = app.toggle_verbose();
            writeln!(out, "debug logging {}", if verbose { "on" } else { "off" })?;
            Ok(())
        }
        "help" | "?" => {
            writeln!(out, "{MENU}")?;
            Ok(())
        }
        "quit" | "exit" => return Ok(Flow::Quit),
        _ => {
            writeln!(out, "unknown command {line:?}; type help for the menu")?;
            Ok(())
        }
    };

    if let Err(e) = outcome {
        writeln!(out, "error: {e}")?;
    }
    Ok(Flow::Continue)
}

/// First word of `line` and the trimmed remainder
fn split_word(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    }
}

fn with_id(rest: &str) -> Result<(TaskId, &str)> {
    let (id, text) = split_word(rest);
    Ok((id.parse()?, text))
}
