//! Typed view of the merged configuration

use serde::{Deserialize, Serialize};
use std::io;

use super::effective::ConfigError;
use crate::path::Platform;

/// Which path conventions to canonicalize for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// Whatever the running host uses
    #[default]
    Auto,
    /// POSIX paths, no drive-letter fix-up
    Posix,
    /// Windows paths, drive-letter fix-up enabled
    Windows,
}

impl std::fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlatformKind::Auto => write!(f, "auto"),
            PlatformKind::Posix => write!(f, "posix"),
            PlatformKind::Windows => write!(f, "windows"),
        }
    }
}

impl std::str::FromStr for PlatformKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(PlatformKind::Auto),
            "posix" => Ok(PlatformKind::Posix),
            "windows" => Ok(PlatformKind::Windows),
            _ => Err(ConfigError::ValidationError(format!(
                "platform must be one of auto, posix, windows (got '{}')",
                s
            ))),
        }
    }
}

impl PlatformKind {
    /// Build the platform description, taking the working directory from
    /// the host.
    pub fn platform(self) -> io::Result<Platform> {
        let host = Platform::host()?;
        Ok(match self {
            PlatformKind::Auto => host,
            PlatformKind::Posix => Platform::posix().with_cwd(host.cwd),
            PlatformKind::Windows => Platform::windows(host.cwd),
        })
    }
}

/// Test ordering options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// Default concurrency flag for tasks that do not set one
    #[serde(default)]
    pub concurrent: bool,

    #[serde(default)]
    pub shuffle: bool,
}

/// Tool configuration after all layers are merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Project root used to canonicalize module ids
    pub root: String,

    #[serde(default)]
    pub platform: PlatformKind,

    #[serde(default)]
    pub sequence: SequenceConfig,

    pub test_timeout_ms: u64,

    pub hook_timeout_ms: u64,

    #[serde(default)]
    pub reporters: Vec<String>,
}
