//! Library side of the `todo` binary: command definitions and handlers

pub mod app;
pub mod commands;
pub mod display;
pub mod parse;

pub use app::App;
pub use commands::Commands;
