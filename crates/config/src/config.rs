//! Centralized configuration management for todo
//!
//! `Settings` is immutable after construction and `Clone`, so it can be
//! handed to the registry, the pipeline and the CLI without coordination.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use todo_core::{
    Error, Result, DEFAULT_CHANNEL_CAPACITY, DEFAULT_GENERATOR_INTERVAL_MS,
    DEFAULT_LEGACY_INTERVAL_MS, DEFAULT_LOGGER_INTERVAL_MS, LEGACY_TASKS_FILE_VAR,
    TODO_AUDIT_LOG_VAR, TODO_BUCKETS_DIR_VAR, TODO_CHANNEL_CAPACITY_VAR,
    TODO_GENERATOR_INTERVAL_VAR, TODO_LEGACY_INTERVAL_VAR, TODO_LOGGER_INTERVAL_VAR,
    TODO_TASKS_FILE_VAR,
};
use todo_utils::XdgPaths;

/// Timing and sizing of the background distribution pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Period of the channel-backed generator
    pub generator_interval: Duration,

    /// Period of the direct (legacy) distributor
    pub legacy_interval: Duration,

    /// Period of the addition logger; must be sub-second
    pub logger_interval: Duration,

    /// Bound of the generator → distributor channel
    pub channel_capacity: usize,

    /// Directory holding one snapshot file per priority tier, if persisted
    pub buckets_dir: Option<PathBuf>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            generator_interval: Duration::from_millis(DEFAULT_GENERATOR_INTERVAL_MS),
            legacy_interval: Duration::from_millis(DEFAULT_LEGACY_INTERVAL_MS),
            logger_interval: Duration::from_millis(DEFAULT_LOGGER_INTERVAL_MS),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            buckets_dir: None,
        }
    }
}

impl PipelineSettings {
    /// Reject values the workers cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.generator_interval.is_zero() || self.legacy_interval.is_zero() {
            return Err(Error::configuration("producer intervals must be non-zero"));
        }
        if self.logger_interval.is_zero() || self.logger_interval >= Duration::from_secs(1) {
            return Err(Error::configuration(format!(
                "logger interval must be between 1ms and 999ms, got {:?}",
                self.logger_interval
            )));
        }
        if self.channel_capacity == 0 {
            return Err(Error::configuration("channel capacity must be at least 1"));
        }
        Ok(())
    }
}

/// Top-level settings for one todo process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// JSON snapshot backing the task registry
    pub tasks_file: PathBuf,

    /// Append-only JSON-lines audit log; audit goes to tracing when unset
    pub audit_log: Option<PathBuf>,

    pub pipeline: PipelineSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tasks_file: XdgPaths::tasks_file(),
            audit_log: None,
            pipeline: PipelineSettings::default(),
        }
    }
}

impl Settings {
    /// Build settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Settings::default();

        if let Some(path) = value(TODO_TASKS_FILE_VAR).or_else(|| value(LEGACY_TASKS_FILE_VAR)) {
            settings.tasks_file = PathBuf::from(path);
        }
        settings.audit_log = value(TODO_AUDIT_LOG_VAR).map(PathBuf::from);

        let pipeline = &mut settings.pipeline;
        pipeline.buckets_dir = value(TODO_BUCKETS_DIR_VAR).map(PathBuf::from);
        if let Some(ms) = parse_var::<u64>(&value, TODO_GENERATOR_INTERVAL_VAR)? {
            pipeline.generator_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&value, TODO_LEGACY_INTERVAL_VAR)? {
            pipeline.legacy_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64>(&value, TODO_LOGGER_INTERVAL_VAR)? {
            pipeline.logger_interval = Duration::from_millis(ms);
        }
        if let Some(capacity) = parse_var::<usize>(&value, TODO_CHANNEL_CAPACITY_VAR)? {
            pipeline.channel_capacity = capacity;
        }

        settings.pipeline.validate()?;
        tracing::debug!(?settings, "settings resolved");
        Ok(settings)
    }

    #[must_use]
    pub fn with_tasks_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.tasks_file = path.into();
        self
    }
}

fn parse_var<T: FromStr>(value: impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>> {
    value(key).map(|raw| {
        raw.trim().parse::<T>().map_err(|_| {
            Error::configuration(format!("{key} must be a non-negative integer, got {raw:?}"))
        })
    })
    .transpose()
}
