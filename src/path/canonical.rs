//! Module id to file path canonicalization
//!
//! Module ids come from the dev server in several shapes:
//! - `/@fs/<absolute path>`: a file served straight from the filesystem
//! - an absolute path already under the project's parent directory
//! - `/<path>`: relative to the project root
//! - anything else (bare specifiers, virtual modules): left alone
//!
//! On Windows a result like `/C:/proj/a.ts` is not a usable path, so it is
//! round-tripped through a `file:` URL to get `C:\proj\a.ts`.

use percent_encoding::percent_decode_str;
use url::Url;

use super::normalize::{dirname, has_drive_letter, is_absolute, resolve, slash};
use super::platform::Platform;

/// Prefix marking a module served directly from the filesystem
pub const FS_PREFIX: &str = "/@fs/";

const SEPARATORS: [char; 2] = ['/', '\\'];

// Length of `/@fs`; the trailing slash is kept as the path root
const FS_PREFIX_STRIP: usize = 4;

/// Path canonicalization errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// The drive-letter fix-up could not produce a Windows path
    #[error("Cannot canonicalize '{path}': {reason}")]
    NotCanonicalizable { path: String, reason: String },
}

fn not_canonicalizable(path: &str, reason: impl Into<String>) -> PathError {
    PathError::NotCanonicalizable {
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// Convert a module id into a file path relative to `root`'s layout.
///
/// Ids that match none of the known shapes are returned unchanged. The only
/// failure is the Windows drive-letter fix-up.
pub fn to_file_path(id: &str, root: &str, platform: &Platform) -> Result<String, PathError> {
    let mut absolute = if slash(id).starts_with(FS_PREFIX) {
        id.get(FS_PREFIX_STRIP..).unwrap_or(id).to_string()
    } else if id.starts_with(&dirname(root)) {
        id.to_string()
    } else if let Some(rest) = id.strip_prefix('/') {
        slash(&resolve(root, rest, &platform.cwd))
    } else {
        id.to_string()
    };

    if absolute.starts_with("//") {
        absolute.remove(0);
    }

    if platform.windows && absolute.starts_with('/') {
        let converted = to_drive_path(&absolute, platform)?;
        tracing::debug!(id, from = %absolute, to = %converted, "applied drive-letter fix-up");
        return Ok(converted);
    }

    tracing::trace!(id, root, path = %absolute, "canonicalized module id");
    Ok(absolute)
}

/// Turn `/C:/x` into `C:\x`.
///
/// A remainder rooted without a drive (`/x`, `\x`) takes the working
/// directory's drive; a relative one is resolved against the working directory.
fn to_drive_path(absolute: &str, platform: &Platform) -> Result<String, PathError> {
    let without_root = absolute.get(1..).unwrap_or_default();
    let resolved = if has_drive_letter(without_root) && is_absolute(without_root) {
        slash(without_root)
    } else if without_root.starts_with(SEPARATORS) {
        let drive = cwd_drive(platform).ok_or_else(|| {
            not_canonicalizable(
                absolute,
                format!("working directory '{}' has no drive letter", platform.cwd),
            )
        })?;
        let rest = without_root.trim_start_matches(SEPARATORS);
        resolve(&format!("{}/", drive), rest, &platform.cwd)
    } else {
        resolve(&platform.cwd, without_root, &platform.cwd)
    };

    let url = windows_path_to_file_url(&resolved).map_err(|reason| not_canonicalizable(absolute, reason))?;
    file_url_to_windows_path(&url).map_err(|reason| not_canonicalizable(absolute, reason))
}

// `C:` of a drive-qualified working directory
fn cwd_drive(platform: &Platform) -> Option<&str> {
    platform.cwd.get(..2).filter(|drive| has_drive_letter(drive))
}

fn windows_path_to_file_url(path: &str) -> Result<Url, String> {
    let mut url = Url::parse("file:///").map_err(|e| format!("invalid file URL: {}", e))?;
    // `set_path` leaves `%` alone, so escape it first
    let escaped = path.replace('%', "%25");
    if escaped.starts_with('/') {
        url.set_path(&escaped);
    } else {
        url.set_path(&format!("/{}", escaped));
    }
    Ok(url)
}

fn file_url_to_windows_path(url: &Url) -> Result<String, String> {
    if url.scheme() != "file" {
        return Err(format!("expected a file URL, got '{}'", url));
    }
    if url.host_str().is_some_and(|host| !host.is_empty()) {
        return Err(format!("file URL '{}' must not have a host", url));
    }

    let segments = url
        .path_segments()
        .ok_or_else(|| format!("file URL '{}' has no path", url))?;

    let mut decoded = Vec::new();
    for segment in segments {
        if has_encoded_separator(segment) {
            return Err(format!(
                "file URL '{}' must not include encoded \\ or / characters",
                url
            ));
        }
        let text = percent_decode_str(segment)
            .decode_utf8()
            .map_err(|e| format!("file URL '{}' is not valid UTF-8: {}", url, e))?;
        decoded.push(text.into_owned());
    }

    match decoded.first() {
        Some(drive) if drive.len() == 2 && has_drive_letter(drive) => {}
        _ => return Err(format!("file URL '{}' must be absolute (no drive letter)", url)),
    }

    Ok(decoded.join("\\"))
}

fn has_encoded_separator(segment: &str) -> bool {
    let lower = segment.to_ascii_lowercase();
    lower.contains("%2f") || lower.contains("%5c")
}
