//! Builder methods for creating errors with context

use super::types::Error;
use crate::types::TaskId;
use std::path::PathBuf;

impl Error {
    /// Create a validation error for the named field
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn empty_title() -> Self {
        Error::validation("title", "title is empty")
    }

    #[must_use]
    pub fn invalid_status(value: impl std::fmt::Display) -> Self {
        Error::validation("status", format!("invalid status: {value}"))
    }

    #[must_use]
    pub fn invalid_priority(value: impl std::fmt::Display) -> Self {
        Error::validation("priority", format!("invalid priority: {value}"))
    }

    /// Create a not-found error for a task id
    #[must_use]
    pub fn not_found(id: TaskId) -> Self {
        Error::NotFound { id }
    }

    /// Wrap a store failure raised while saving a snapshot
    #[must_use]
    pub fn persist(message: impl Into<String>, source: Error) -> Self {
        Error::Persist {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Wrap a store failure raised while loading at startup
    #[must_use]
    pub fn load(message: impl Into<String>, source: Error) -> Self {
        Error::Load {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Create a file system error
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a JSON error with a custom message
    #[must_use]
    pub fn json(message: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Json {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_persist(&self) -> bool {
        matches!(self, Error::Persist { .. })
    }
}
