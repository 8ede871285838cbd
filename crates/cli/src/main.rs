use clap::Parser;
use eyre::eyre;
use std::path::PathBuf;
use todo_cli::{App, Commands};
use todo_config::Settings;

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Track tasks and run the priority distribution pipeline", long_about = None)]
#[command(version)]
struct Cli {
    /// Task snapshot file (overrides TODO_TASKS_FILE)
    #[arg(long, global = true, value_name = "PATH")]
    tasks_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let log = todo_utils::tracing::init(cli.verbose)
        .map_err(|e| eyre!("failed to initialize logging: {e}"))?;

    let mut settings = Settings::from_env()?;
    if let Some(path) = cli.tasks_file {
        settings = settings.with_tasks_file(path);
    }

    let app = App::open(settings)?.with_log_handle(log, cli.verbose);

    // Default behavior when no command is specified
    let command = cli.command.unwrap_or(Commands::List { status: None });
    command.execute(&app).await?;
    Ok(())
}
