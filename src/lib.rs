//! suitekit - data shaping for a test runner
//!
//! This crate holds the pieces of the runner that reshape data rather than
//! execute anything: layered configuration merging, batching of sibling
//! tasks by concurrency, and canonicalization of module ids into file paths.

pub mod config;
pub mod logging;
pub mod path;
pub mod suite;

pub use config::{ConfigError, EffectiveConfig, PlatformKind, ToolConfig};
pub use path::{to_file_path, PathError, Platform};
pub use suite::{batches, partition_suite_children, Batch, Task, TaskKind};
pub use suitekit_merge::{deep_merge, merge_layers, MergeError, Merger, ValueKind, OPAQUE_TAG};
