//! Core domain types, errors, and constants for the `todo` application.
//!
//! ## Key Components
//!
//! - **`errors`**: the primary `Error` enum and `Result` alias shared by every
//!   crate in the workspace.
//! - **`types`**: `Task` and its identifiers, status and priority enums, and the
//!   persisted `TaskRecord` representation.
//! - **`audit`**: the event emitted to audit sinks after each registry mutation.
//! - **`constants`**: environment variable names and pipeline defaults.

pub mod audit;
pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    audit::{AuditEvent, AuditOp},
    constants::*,
    errors::{Error, Result},
    types::*,
};
