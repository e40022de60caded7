//! Suite model and batch scheduling
//!
//! Sibling tasks run in alternating sequential/concurrent batches formed
//! from maximal runs of equal concurrency flags.

mod partition;
mod task;

pub use partition::{batches, partition_runs, partition_suite_children, Batch};
pub use task::{full_name, Task, TaskKind, NAME_SEPARATOR};
