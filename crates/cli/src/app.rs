//! Wiring shared by every command

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use todo_config::Settings;
use todo_core::Result;
use todo_registry::{AuditSink, JsonFileStore, JsonLinesAuditSink, TaskRegistry, TracingAuditSink};
use todo_utils::tracing::LogLevelHandle;
use tracing::{debug, warn};

/// Settings plus the registry opened from them
pub struct App {
    pub settings: Settings,
    pub registry: Arc<TaskRegistry>,
    log: Option<LogLevelHandle>,
    verbose: AtomicBool,
}

impl App {
    /// Load the task snapshot and attach the configured audit sink
    pub fn open(settings: Settings) -> Result<Self> {
        let store = Arc::new(JsonFileStore::new(&settings.tasks_file));
        let audit: Arc<dyn AuditSink> = match &settings.audit_log {
            Some(path) => Arc::new(JsonLinesAuditSink::new(path)),
            None => Arc::new(TracingAuditSink),
        };
        let registry = TaskRegistry::new(store)?.with_audit(audit);
        debug!(tasks_file = %settings.tasks_file.display(), "registry opened");

        Ok(Self {
            settings,
            registry: Arc::new(registry),
            log: None,
            verbose: AtomicBool::new(false),
        })
    }

    #[must_use]
    pub fn with_log_handle(mut self, handle: LogLevelHandle, verbose: bool) -> Self {
        self.log = Some(handle);
        self.verbose = AtomicBool::new(verbose);
        self
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose.load(Ordering::Relaxed)
    }

    /// Flip between info and debug logging; returns the new state
    pub fn toggle_verbose(&self) -> bool {
        let verbose = !self.verbose.fetch_xor(true, Ordering::Relaxed);
        if let Some(log) = &self.log {
            if let Err(e) = log.set_verbose(verbose) {
                warn!(error = %e, "could not change log level");
            }
        }
        verbose
    }
}
