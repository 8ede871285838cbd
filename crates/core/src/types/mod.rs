//! Core domain types for the `todo` application.
//!
//! - **`newtypes`**: the `TaskId` wrapper
//! - **`states`**: `Status` and `Priority`, the two closed vocabularies a task carries
//! - **`tasks`**: the `Task` entity and its mutation rules
//! - **`records`**: the persisted `TaskRecord` shape and conversions to and from `Task`

pub mod newtypes;
pub mod records;
pub mod states;
pub mod tasks;

pub use newtypes::*;
pub use records::*;
pub use states::*;
pub use tasks::*;
