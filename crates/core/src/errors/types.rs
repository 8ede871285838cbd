//! Core error type definitions

use crate::types::TaskId;
use std::path::PathBuf;

/// Result type alias for todo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for todo operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rejected input: empty title, unknown status, out-of-range priority
    Validation { field: &'static str, message: String },

    /// No task with the given id exists in the registry
    NotFound { id: TaskId },

    /// Writing the snapshot failed after the in-memory change was applied
    Persist {
        message: String,
        #[source]
        source: Box<Error>,
    },

    /// The store could not be read at startup
    Load {
        message: String,
        #[source]
        source: Box<Error>,
    },

    /// File system operations
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration errors
    Configuration { message: String },
}
