use tracing_subscriber::{fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};

const DEFAULT_DIRECTIVE: &str = "info";
const VERBOSE_DIRECTIVE: &str = "debug";

/// Handle for switching the global log level after initialization
#[derive(Clone)]
pub struct LogLevelHandle {
    handle: reload::Handle<EnvFilter, Registry>,
}

impl LogLevelHandle {
    /// Switch between the default and the verbose filter
    pub fn set_verbose(&self, verbose: bool) -> Result<(), reload::Error> {
        let directive = if verbose {
            VERBOSE_DIRECTIVE
        } else {
            DEFAULT_DIRECTIVE
        };
        self.handle.modify(|filter| *filter = EnvFilter::new(directive))
    }
}

/// Initialize the tracing system
///
/// `RUST_LOG` wins when set; otherwise the filter is `info`, or `debug`
/// when `verbose` is requested. Output goes to stderr so stdout stays free
/// for command results.
pub fn init(
    verbose: bool,
) -> Result<LogLevelHandle, Box<dyn std::error::Error + Send + Sync + 'static>> {
    let fallback = if verbose {
        VERBOSE_DIRECTIVE
    } else {
        DEFAULT_DIRECTIVE
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;
    let (filter_layer, handle) = reload::Layer::new(filter);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(LogLevelHandle { handle })
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Span wrapping one periodic worker for its whole lifetime
pub fn worker_span(name: &'static str) -> Span {
    span!(Level::INFO, "worker", worker = name)
}
