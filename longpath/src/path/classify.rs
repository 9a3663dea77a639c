//! Path topology classification.
//!
//! The form of a path is decided by its leading characters alone, so
//! classification never touches the file system and never fails for
//! non-empty input.

use std::fmt;

use serde::Serialize;

use super::{
    has_prefix, is_separator_byte, starts_with_drive, DEVICE_PREFIX, GLOBAL_ROOT_PREFIX,
    LONG_PATH_PREFIX, LONG_PATH_UNC_PREFIX, VOLUME_PREFIX,
};
use crate::error::{Error, Result};

/// The topology of a path string.
///
/// # Examples
///
/// ```
/// use longpath::path::{classify, PathForm};
///
/// assert_eq!(classify(r"C:\Windows").unwrap(), PathForm::DriveRooted);
/// assert_eq!(classify(r"\\?\C:\Windows").unwrap(), PathForm::LongForm);
/// assert_eq!(classify(r"\\?\UNC\server\share").unwrap(), PathForm::UncRooted);
/// assert_eq!(classify(r"\\.\PhysicalDrive0").unwrap(), PathForm::DeviceRooted);
/// assert_eq!(classify(r"docs\readme.txt").unwrap(), PathForm::Relative);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathForm {
    /// Resolved against a base directory: `file.txt`, `..\dir`, `\dir`.
    Relative,
    /// Starts with a drive letter: `C:\dir`, `C:dir`.
    DriveRooted,
    /// A network path: `\\server\share` or `\\?\UNC\server\share`.
    UncRooted,
    /// The device namespace: `\\.\X`, `\\?\GLOBALROOT\...`, `\\?\Volume{...}`.
    DeviceRooted,
    /// A drive path in long form: `\\?\C:\dir`.
    LongForm,
}

impl fmt::Display for PathForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relative => write!(f, "relative"),
            Self::DriveRooted => write!(f, "drive-rooted"),
            Self::UncRooted => write!(f, "unc-rooted"),
            Self::DeviceRooted => write!(f, "device-rooted"),
            Self::LongForm => write!(f, "long-form"),
        }
    }
}

/// Classify a path by its leading characters.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if `path` is empty.
pub fn classify(path: &str) -> Result<PathForm> {
    if path.is_empty() {
        return Err(Error::invalid(path, "path is empty"));
    }
    Ok(classify_unchecked(path))
}

/// Classification for input already known to be non-empty.
pub(crate) fn classify_unchecked(path: &str) -> PathForm {
    if has_prefix(path, DEVICE_PREFIX)
        || has_prefix(path, GLOBAL_ROOT_PREFIX)
        || has_prefix(path, VOLUME_PREFIX)
    {
        return PathForm::DeviceRooted;
    }
    if has_prefix(path, LONG_PATH_UNC_PREFIX) {
        return PathForm::UncRooted;
    }
    if has_prefix(path, LONG_PATH_PREFIX) {
        return if starts_with_drive(&path[LONG_PATH_PREFIX.len()..]) {
            PathForm::LongForm
        } else {
            PathForm::DeviceRooted
        };
    }

    let bytes = path.as_bytes();
    if bytes.len() >= 3
        && is_separator_byte(bytes[0])
        && is_separator_byte(bytes[1])
        && !is_separator_byte(bytes[2])
    {
        return PathForm::UncRooted;
    }
    if starts_with_drive(path) {
        return PathForm::DriveRooted;
    }
    PathForm::Relative
}

/// Returns `true` if the path carries the `\\?\` prefix.
///
/// # Examples
///
/// ```
/// use longpath::path::is_long_path;
///
/// assert!(is_long_path(r"\\?\C:\Windows"));
/// assert!(is_long_path(r"\\?\UNC\server\share"));
/// assert!(!is_long_path(r"C:\Windows"));
/// ```
#[must_use]
pub fn is_long_path(path: &str) -> bool {
    has_prefix(path, LONG_PATH_PREFIX)
}

/// Returns `true` for both plain and long-form UNC paths.
#[must_use]
pub fn is_unc_path(path: &str) -> bool {
    !path.is_empty() && classify_unchecked(path) == PathForm::UncRooted
}

/// Returns `true` if the path has a root: a drive, a leading separator, or
/// one of the prefixed forms.
///
/// `C:dir` counts as rooted even though it is relative to the drive's
/// current directory.
#[must_use]
pub fn is_path_rooted(path: &str) -> bool {
    root_length(path) > 0
}

/// Length in bytes of the root portion of `path`.
///
/// | Path | Root |
/// |---|---|
/// | `C:\dir` | `C:\` |
/// | `C:dir` | `C:` |
/// | `\dir` | `\` |
/// | `\\server\share\dir` | `\\server\share` |
/// | `\\?\C:\dir` | `\\?\C:\` |
/// | `\\?\UNC\server\share\dir` | `\\?\UNC\server\share` |
/// | `\\.\COM1` | `\\.\COM1` |
/// | `dir` | (empty) |
#[must_use]
pub fn root_length(path: &str) -> usize {
    if path.is_empty() {
        return 0;
    }
    let bytes = path.as_bytes();
    match classify_unchecked(path) {
        PathForm::Relative => usize::from(is_separator_byte(bytes[0])),
        PathForm::DriveRooted => drive_root_length(bytes, 0),
        PathForm::LongForm => drive_root_length(bytes, LONG_PATH_PREFIX.len()),
        PathForm::UncRooted => {
            let start = if has_prefix(path, LONG_PATH_UNC_PREFIX) {
                LONG_PATH_UNC_PREFIX.len()
            } else {
                2
            };
            let server_end = segment_end(bytes, start);
            if server_end == bytes.len() {
                return server_end;
            }
            segment_end(bytes, server_end + 1)
        }
        PathForm::DeviceRooted => {
            let start = if has_prefix(path, GLOBAL_ROOT_PREFIX) {
                GLOBAL_ROOT_PREFIX.len()
            } else {
                DEVICE_PREFIX.len()
            };
            let end = segment_end(bytes, start);
            if end < bytes.len() {
                end + 1
            } else {
                end
            }
        }
    }
}

fn drive_root_length(bytes: &[u8], offset: usize) -> usize {
    let after_colon = offset + 2;
    if bytes.len() > after_colon && is_separator_byte(bytes[after_colon]) {
        after_colon + 1
    } else {
        after_colon
    }
}

fn segment_end(bytes: &[u8], start: usize) -> usize {
    bytes[start.min(bytes.len())..]
        .iter()
        .position(|&b| is_separator_byte(b))
        .map_or(bytes.len(), |pos| start + pos)
}

/// The root portion of `path` (see [`root_length`]).
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if `path` is empty.
///
/// # Examples
///
/// ```
/// use longpath::path::get_path_root;
///
/// assert_eq!(get_path_root(r"C:\Windows\System32").unwrap(), r"C:\");
/// assert_eq!(get_path_root(r"\\server\share\dir").unwrap(), r"\\server\share");
/// assert_eq!(get_path_root("relative").unwrap(), "");
/// ```
pub fn get_path_root(path: &str) -> Result<&str> {
    if path.is_empty() {
        return Err(Error::invalid(path, "path is empty"));
    }
    Ok(&path[..root_length(path)])
}
