//! Background distribution pipeline for todo
//!
//! Synthetic tasks flow into a [`PriorityRepository`] along two routes: a
//! generator feeding a bounded channel drained by a [`ChannelDistributor`],
//! and a legacy producer that distributes directly. An [`AdditionLogger`]
//! watches bucket sizes. The [`Coordinator`] owns the shared cancellation
//! token and joins every worker on shutdown.
//!
//! Tasks in this pipeline never enter the task registry.

pub mod coordinator;
pub mod distributor;
pub mod logger;
pub mod producer;
pub mod repository;

pub use coordinator::*;
pub use distributor::*;
pub use logger::*;
pub use producer::*;
pub use repository::*;
