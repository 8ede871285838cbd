//! Shared utilities for todo
//!
//! Small, dependency-light helpers used by the registry, the pipeline and
//! the CLI: crash-safe file replacement, tracing setup, XDG locations and
//! OS termination signals.

pub mod atomic_file;
pub mod shutdown;
pub mod tracing;
pub mod xdg;

pub use atomic_file::*;
pub use shutdown::*;
pub use xdg::*;
