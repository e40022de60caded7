//! Built-in tool defaults (layer 1)
//!
//! Hardcoded defaults for all configuration values.

use serde::{Deserialize, Serialize};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Project root (default: ".")
    pub root: String,

    /// Path conventions (default: "auto" = host platform)
    pub platform: String,

    /// Run sibling tests concurrently unless marked otherwise (default: false)
    pub sequence_concurrent: bool,

    /// Shuffle test order (default: false)
    pub sequence_shuffle: bool,

    /// Per-test timeout in milliseconds (default: 5000)
    pub test_timeout_ms: u64,

    /// Per-hook timeout in milliseconds (default: 10000)
    pub hook_timeout_ms: u64,

    /// Reporters (default: ["default"])
    pub reporters: Vec<String>,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
            platform: "auto".to_string(),
            sequence_concurrent: false,
            sequence_shuffle: false,
            test_timeout_ms: 5000,
            hook_timeout_ms: 10000,
            reporters: vec!["default".to_string()],
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "root": self.root,
            "platform": self.platform,
            "sequence": {
                "concurrent": self.sequence_concurrent,
                "shuffle": self.sequence_shuffle
            },
            "test_timeout_ms": self.test_timeout_ms,
            "hook_timeout_ms": self.hook_timeout_ms,
            "reporters": self.reporters
        })
    }
}
