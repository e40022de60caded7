//! Deep merge for JSON configuration values.
//!
//! Merges an overlay value onto a base value, recursing into objects and
//! merging arrays index by index. Objects tagged with [`OPAQUE_TAG`] are
//! treated as leaves and swapped in whole.

mod error;
mod kind;
mod merge;

pub use error::MergeError;
pub use kind::{is_object, Node, ValueKind, OPAQUE_TAG};
pub use merge::{deep_merge, merge_layers, Merger, DEFAULT_MAX_DEPTH};
