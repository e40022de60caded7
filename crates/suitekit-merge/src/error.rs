//! Merge errors

use std::fmt;

/// Errors raised while merging.
///
/// Type mismatches between base and overlay are resolved by policy and never
/// surface here; the only failure is running into the depth guard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    /// Nesting went deeper than the configured limit
    #[error("Merge depth limit of {limit} exceeded at {path}")]
    DepthExceeded { limit: usize, path: String },
}

/// One step into a nested value
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Key(String),
    Index(usize),
}

/// Location of the value currently being merged, e.g. `server.hosts[2]`
#[derive(Debug, Clone, Default)]
pub(crate) struct KeyPath {
    segments: Vec<Segment>,
}

impl KeyPath {
    pub(crate) fn depth(&self) -> usize {
        self.segments.len()
    }

    pub(crate) fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{}", key)?,
                Segment::Key(key) => write!(f, ".{}", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}
