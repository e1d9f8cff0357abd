//! Maintenance core: apt / Flatpak command execution, progress and output reduction

pub mod operations;
pub mod parser;
pub mod progress;
pub mod runner;
pub mod task;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

// Re-exports used by the front-end
pub use operations::{Catalog, CommandSet, Operation};
pub use runner::ShellRunner;
pub use task::{spawn_operation, TaskEvent, TaskHandle};
pub use types::{CommandResult, Details};
