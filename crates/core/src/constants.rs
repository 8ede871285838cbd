/// Constants used throughout the todo codebase
// Environment variable names
pub const TODO_TASKS_FILE_VAR: &str = "TODO_TASKS_FILE";
pub const LEGACY_TASKS_FILE_VAR: &str = "TASKS_FILE";
pub const TODO_BUCKETS_DIR_VAR: &str = "TODO_BUCKETS_DIR";
pub const TODO_AUDIT_LOG_VAR: &str = "TODO_AUDIT_LOG";
pub const TODO_GENERATOR_INTERVAL_VAR: &str = "TODO_GENERATOR_INTERVAL_MS";
pub const TODO_LEGACY_INTERVAL_VAR: &str = "TODO_LEGACY_INTERVAL_MS";
pub const TODO_LOGGER_INTERVAL_VAR: &str = "TODO_LOGGER_INTERVAL_MS";
pub const TODO_CHANNEL_CAPACITY_VAR: &str = "TODO_CHANNEL_CAPACITY";

// File names
pub const TASKS_FILE_NAME: &str = "tasks.json";
pub const APP_DIR_NAME: &str = "todo";

// Pipeline defaults (milliseconds)
pub const DEFAULT_GENERATOR_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_LEGACY_INTERVAL_MS: u64 = 10_000;
pub const DEFAULT_LOGGER_INTERVAL_MS: u64 = 200;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 10;

// Synthetic task shape
pub const AUTO_TASK_TITLE_PREFIX: &str = "Auto-Task";
pub const AUTO_TASK_DESCRIPTION: &str = "automatically generated task for pipeline testing";

/// Upper bound (exclusive) for ephemeral ids handed to generated tasks
pub const EPHEMERAL_ID_LIMIT: i64 = 1_000_000_000;
