//! Forward-slash path helpers
//!
//! These operate on strings, not `std::path`, so that Windows-style paths
//! (drive letters, backslashes) behave the same on every host.

/// Replace every backslash with a forward slash
pub fn slash(path: &str) -> String {
    path.replace('\\', "/")
}

/// Slash a path and upper-case a leading drive letter (`c:/x` -> `C:/x`)
pub fn normalize_windows_path(path: &str) -> String {
    let mut slashed = slash(path);
    if has_drive_root(&slashed) {
        slashed[..1].make_ascii_uppercase();
    }
    slashed
}

/// True when the path starts with a drive letter and colon (`C:`)
pub fn has_drive_letter(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

// `C:/` or `C:\`
fn has_drive_root(path: &str) -> bool {
    has_drive_letter(path) && matches!(path.as_bytes().get(2), Some(b'/') | Some(b'\\'))
}

fn is_separator(byte: u8) -> bool {
    byte == b'/' || byte == b'\\'
}

/// Absolute in either the POSIX or the Windows sense.
///
/// Matches a single leading separator, a double leading separator not
/// followed by `.`, or a drive root such as `C:/`.
pub fn is_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    match bytes {
        [first, second, rest @ ..] if is_separator(*first) && is_separator(*second) => {
            rest.first() != Some(&b'.')
        }
        [first, ..] if is_separator(*first) => true,
        _ => has_drive_root(path),
    }
}

/// Parent directory of `path`.
///
/// A trailing slash is ignored. A bare drive parent becomes its root
/// (`C:/x` -> `C:/`). Falls back to `/` for absolute paths and `.` otherwise.
pub fn dirname(path: &str) -> String {
    let normalized = normalize_windows_path(path);
    let trimmed = normalized.strip_suffix('/').unwrap_or(&normalized);

    let mut segments: Vec<String> = trimmed.split('/').map(str::to_string).collect();
    segments.pop();

    if let [only] = segments.as_mut_slice() {
        if only.len() == 2 && has_drive_letter(only) {
            only.push('/');
        }
    }

    let joined = segments.join("/");
    if !joined.is_empty() {
        joined
    } else if is_absolute(path) {
        "/".to_string()
    } else {
        ".".to_string()
    }
}

/// Collapse `.`, `..` and empty segments.
///
/// `..` at the top is kept only when `allow_above_root` is set.
pub fn normalize_segments(path: &str, allow_above_root: bool) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if allow_above_root => segments.push(".."),
                _ => {}
            },
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Resolve `relative` against `base`, falling back to `cwd` when `base`
/// is itself relative.
///
/// The result uses forward slashes and carries no trailing slash.
pub fn resolve(base: &str, relative: &str, cwd: &str) -> String {
    let mut resolved = String::new();
    let mut resolved_absolute = false;

    for part in [relative, base, cwd] {
        if resolved_absolute {
            break;
        }
        if part.is_empty() {
            continue;
        }
        let part = normalize_windows_path(part);
        resolved = format!("{}/{}", part, resolved);
        resolved_absolute = is_absolute(&part);
    }

    let normalized = normalize_segments(&resolved, !resolved_absolute);
    if resolved_absolute && !is_absolute(&normalized) {
        return format!("/{}", normalized);
    }
    if normalized.is_empty() {
        ".".to_string()
    } else {
        normalized
    }
}
