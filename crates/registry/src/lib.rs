//! Task registry for todo
//!
//! This crate owns the authoritative set of user tasks. It assigns ids,
//! validates every mutation, writes a full snapshot through a [`Store`]
//! after each change and reports each change to an optional [`AuditSink`].

pub mod audit;
pub mod registry;
pub mod store;
pub mod usecase;

pub use audit::*;
pub use registry::*;
pub use store::*;
pub use usecase::*;
