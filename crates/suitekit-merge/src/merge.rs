//! Deep merge
//!
//! Merge semantics:
//! - Mapping + Mapping: merge key by key (recursive)
//! - Sequence + Sequence: merge index by index, NOT concatenation
//! - Opaque overlay values: swapped in whole, never merged into
//! - Any other overlay value under a key: overlay wins
//! - Mismatched kinds at the top of a call: base is returned untouched

use serde_json::{Map, Value};

use crate::error::{KeyPath, MergeError, Segment};
use crate::kind::Node;

/// Default nesting limit, matching serde_json's parser recursion limit
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Deep merge with an explicit depth guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merger {
    max_depth: usize,
}

impl Default for Merger {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Merger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit how many levels below the top the merge may descend
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Merge `overlay` over `base`.
    ///
    /// Both inputs are consumed; `base`'s containers are reused for the
    /// result so nothing the caller still holds is modified.
    pub fn merge(&self, base: Value, overlay: Value) -> Result<Value, MergeError> {
        let mut path = KeyPath::default();
        self.merge_at(base, overlay, &mut path)
    }

    fn merge_at(&self, base: Value, overlay: Value, path: &mut KeyPath) -> Result<Value, MergeError> {
        self.check_depth(path)?;

        match (Node::from(base), Node::from(overlay)) {
            (Node::Mapping(base_map), Node::Mapping(overlay_map)) => {
                self.merge_maps(base_map, overlay_map, path).map(Value::Object)
            }
            (Node::Sequence(base_items), Node::Sequence(overlay_items)) => self
                .merge_arrays(Some(Value::Array(base_items)), overlay_items, path)
                .map(Value::Array),
            (base, overlay) => {
                tracing::trace!(
                    %path,
                    base = %base.kind(),
                    overlay = %overlay.kind(),
                    "kind mismatch, keeping base"
                );
                Ok(base.into_value())
            }
        }
    }

    fn merge_maps(
        &self,
        mut merged: Map<String, Value>,
        overlay: Map<String, Value>,
        path: &mut KeyPath,
    ) -> Result<Map<String, Value>, MergeError> {
        for (key, overlay_value) in overlay {
            path.push(Segment::Key(key.clone()));

            let value = match Node::from(overlay_value) {
                Node::Mapping(map) => match merged.get_mut(&key) {
                    Some(existing) => {
                        let existing = std::mem::take(existing);
                        self.merge_at(existing, Value::Object(map), path)?
                    }
                    // Newly introduced key: taken as-is
                    None => Value::Object(map),
                },
                Node::Sequence(items) => {
                    let existing = merged.get_mut(&key).map(std::mem::take);
                    Value::Array(self.merge_arrays(existing, items, path)?)
                }
                leaf => leaf.into_value(),
            };

            // Existing keys keep their position
            merged.insert(key, value);
            path.pop();
        }

        Ok(merged)
    }

    /// Index-aligned merge of two sequences.
    ///
    /// A missing or non-sequence base counts as empty. Base entries past the
    /// end of `overlay` are kept.
    fn merge_arrays(
        &self,
        base: Option<Value>,
        overlay: Vec<Value>,
        path: &mut KeyPath,
    ) -> Result<Vec<Value>, MergeError> {
        self.check_depth(path)?;

        let mut merged = match base {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };

        for (index, overlay_item) in overlay.into_iter().enumerate() {
            path.push(Segment::Index(index));

            let existing = merged.get_mut(index).map(std::mem::take).map(Node::from);
            let value = match existing {
                // Nested sequences always merge structurally; a non-sequence
                // overlay contributes nothing
                Some(Node::Sequence(nested)) => {
                    let nested_overlay = match overlay_item {
                        Value::Array(items) => items,
                        _ => Vec::new(),
                    };
                    Value::Array(self.merge_arrays(
                        Some(Value::Array(nested)),
                        nested_overlay,
                        path,
                    )?)
                }
                Some(Node::Mapping(map)) => self.merge_at(Value::Object(map), overlay_item, path)?,
                _ => overlay_item,
            };

            match merged.get_mut(index) {
                Some(slot) => *slot = value,
                None => merged.push(value),
            }
            path.pop();
        }

        Ok(merged)
    }

    fn check_depth(&self, path: &KeyPath) -> Result<(), MergeError> {
        if path.depth() > self.max_depth {
            tracing::warn!(limit = self.max_depth, %path, "merge depth limit exceeded");
            return Err(MergeError::DepthExceeded {
                limit: self.max_depth,
                path: path.to_string(),
            });
        }
        Ok(())
    }
}

/// Deep merge two JSON values with the default depth guard.
///
/// See [`Merger::merge`].
pub fn deep_merge(base: Value, overlay: Value) -> Result<Value, MergeError> {
    Merger::default().merge(base, overlay)
}

/// Merge config layers in order (first is base, last has highest precedence).
///
/// An empty list merges to `null`.
pub fn merge_layers<I>(layers: I) -> Result<Value, MergeError>
where
    I: IntoIterator<Item = Value>,
{
    let merger = Merger::default();
    let mut layers = layers.into_iter();
    let Some(first) = layers.next() else {
        return Ok(Value::Null);
    };
    layers.try_fold(first, |acc, layer| merger.merge(acc, layer))
}
