//! Platform description injected into path canonicalization

use serde::{Deserialize, Serialize};
use std::io;

/// Path conventions to canonicalize for.
///
/// Canonicalization never inspects the running process; callers pass the
/// platform explicitly so Windows behaviour can be exercised anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    /// Apply the Windows drive-letter fix-up
    pub windows: bool,

    /// Working directory for resolving relative paths
    pub cwd: String,
}

impl Platform {
    /// POSIX conventions rooted at `/`
    pub fn posix() -> Self {
        Self {
            windows: false,
            cwd: "/".to_string(),
        }
    }

    /// Windows conventions; `cwd` should be drive-qualified (e.g. `C:\work`)
    pub fn windows(cwd: impl Into<String>) -> Self {
        Self {
            windows: true,
            cwd: cwd.into(),
        }
    }

    /// Conventions of the running host
    pub fn host() -> io::Result<Self> {
        let cwd = std::env::current_dir()?.to_string_lossy().into_owned();
        Ok(Self {
            windows: cfg!(windows),
            cwd,
        })
    }

    /// Replace the working directory
    pub fn with_cwd(mut self, cwd: impl Into<String>) -> Self {
        self.cwd = cwd.into();
        self
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::posix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let posix = Platform::posix();
        assert!(!posix.windows);
        assert_eq!(posix.cwd, "/");

        let windows = Platform::windows(r"D:\work");
        assert!(windows.windows);
        assert_eq!(windows.cwd, r"D:\work");

        assert_eq!(Platform::posix().with_cwd("/srv").cwd, "/srv");
        assert_eq!(Platform::default(), Platform::posix());
    }

    #[test]
    fn test_host_matches_target() {
        let host = Platform::host().unwrap();
        assert_eq!(host.windows, cfg!(windows));
        assert!(!host.cwd.is_empty());
    }
}
