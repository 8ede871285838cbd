//! Runtime configuration for todo
//!
//! Settings are read once from the environment at startup and then shared
//! read-only with every component.

pub mod config;

pub use config::*;
