//! Module path canonicalization
//!
//! String-based path handling that behaves identically on every host; the
//! target platform is passed in as a [`Platform`].

mod canonical;
mod normalize;
mod platform;

pub use canonical::{to_file_path, PathError, FS_PREFIX};
pub use normalize::{
    dirname, has_drive_letter, is_absolute, normalize_segments, normalize_windows_path, resolve,
    slash,
};
pub use platform::Platform;
