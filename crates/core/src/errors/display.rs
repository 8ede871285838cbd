//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation { field, message } => {
                write!(f, "validation failed for {field}: {message}")
            }
            Error::NotFound { id } => write!(f, "task not found: {id}"),
            Error::Persist { message, source } => {
                write!(f, "failed to persist snapshot ({message}): {source}")
            }
            Error::Load { message, source } => {
                write!(f, "failed to load tasks ({message}): {source}")
            }
            Error::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system {} operation failed for '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            Error::Json { message, .. } => write!(f, "JSON error: {message}"),
            Error::Configuration { message } => write!(f, "configuration error: {message}"),
        }
    }
}
