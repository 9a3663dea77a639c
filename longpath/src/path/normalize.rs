//! Path normalization functions.
//!
//! This module provides functionality to normalize paths by:
//! - Rejecting illegal characters, stray colons and reserved device names
//! - Converting relative paths to absolute paths against a base directory
//! - Resolving `.` and `..` components
//! - Converting `/` to `\` and removing redundant separators
//! - Adding or removing the `\\?\` long-path prefix

use std::borrow::Cow;
use std::env;

use super::classify::{classify_unchecked, is_long_path, is_path_rooted, root_length, PathForm};
use super::types::CanonicalPath;
use super::{
    has_prefix, is_separator, starts_with_drive, wide_len, ALT_DIRECTORY_SEPARATOR,
    DEVICE_PREFIX, DIRECTORY_SEPARATOR, LONG_PATH_PREFIX, LONG_PATH_UNC_PREFIX, MAX_LONG_PATH,
    MAX_PATH, VOLUME_SEPARATOR,
};
use crate::error::{Error, Result};

/// Segment stems that name DOS devices and cannot be used as file names.
const RESERVED_DEVICE_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Options for [`get_full_path_with`].
///
/// # Examples
///
/// ```
/// use longpath::path::{get_full_path_with, FullPathOptions};
///
/// let options = FullPathOptions::default()
///     .with_force_long(true)
///     .with_trailing_separator(true);
/// let full = get_full_path_with(r"C:\Windows", None, &options).unwrap();
/// assert_eq!(full.as_str(), r"\\?\C:\Windows\");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullPathOptions {
    /// Results at least this long receive the long-path prefix.
    pub max_path: usize,
    /// Always add the long-path prefix.
    pub force_long: bool,
    /// End the result with a separator.
    pub trailing_separator: bool,
    /// Accept `*` and `?` in the input.
    pub allow_wildcards: bool,
}

impl Default for FullPathOptions {
    fn default() -> Self {
        Self {
            max_path: MAX_PATH,
            force_long: false,
            trailing_separator: false,
            allow_wildcards: false,
        }
    }
}

impl FullPathOptions {
    /// Sets the length at which the long-path prefix is added.
    #[must_use]
    pub const fn with_max_path(mut self, max_path: usize) -> Self {
        self.max_path = max_path;
        self
    }

    /// Sets whether the long-path prefix is always added.
    #[must_use]
    pub const fn with_force_long(mut self, force_long: bool) -> Self {
        self.force_long = force_long;
        self
    }

    /// Sets whether the result ends with a separator.
    #[must_use]
    pub const fn with_trailing_separator(mut self, trailing_separator: bool) -> Self {
        self.trailing_separator = trailing_separator;
        self
    }

    /// Sets whether wildcards are accepted.
    #[must_use]
    pub const fn with_allow_wildcards(mut self, allow_wildcards: bool) -> Self {
        self.allow_wildcards = allow_wildcards;
        self
    }
}

/// Normalize a path into canonical form with default options.
///
/// Relative paths are resolved against `base_dir`, or against the process
/// current directory when no base is given.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if the path is empty, contains illegal
/// characters or wildcards, has a colon outside the drive position, names a
/// reserved device, is a UNC path without server or share, or if it is
/// relative and the base directory is not an absolute drive or UNC path.
///
/// # Examples
///
/// ```
/// use longpath::path::get_full_path;
///
/// let full = get_full_path(r"..\Temp\.\file.txt", Some(r"C:\Windows\System32")).unwrap();
/// assert_eq!(full.as_str(), r"C:\Windows\Temp\file.txt");
///
/// let unc = get_full_path("//server/share/dir/", None).unwrap();
/// assert_eq!(unc.as_str(), r"\\server\share\dir");
///
/// assert!(get_full_path(r"C:\?test.txt", None).is_err());
/// ```
pub fn get_full_path(path: &str, base_dir: Option<&str>) -> Result<CanonicalPath> {
    get_full_path_with(path, base_dir, &FullPathOptions::default())
}

/// Normalize a path into canonical form.
///
/// Device paths (`\\.\...`, `\\?\GLOBALROOT\...`, `\\?\Volume{...}`) are
/// checked for illegal characters and returned unchanged.
///
/// # Errors
///
/// See [`get_full_path`]. Additionally fails if the result would exceed
/// 32,767 characters.
pub fn get_full_path_with(
    path: &str,
    base_dir: Option<&str>,
    options: &FullPathOptions,
) -> Result<CanonicalPath> {
    check_path_chars(path, options.allow_wildcards)?;

    if classify_unchecked(path) == PathForm::DeviceRooted {
        return Ok(CanonicalPath::from_normalized(path.to_string()));
    }

    let was_long = is_long_path(path);
    let body = strip_long_prefix(path);
    check_colons(path, &body)?;

    let absolute = resolve_against_base(path, &body, was_long, base_dir)?;
    let (root, segments) = split_root(path, &absolute)?;
    if !was_long {
        check_device_names(path, &segments)?;
    }
    let segments = collapse(segments);

    let mut regular = root;
    if segments.is_empty() {
        if options.trailing_separator && !regular.ends_with(DIRECTORY_SEPARATOR) {
            regular.push(DIRECTORY_SEPARATOR);
        }
    } else {
        if !regular.ends_with(DIRECTORY_SEPARATOR) {
            regular.push(DIRECTORY_SEPARATOR);
        }
        regular.push_str(&segments.join("\\"));
        if options.trailing_separator {
            regular.push(DIRECTORY_SEPARATOR);
        }
    }

    let full = if was_long || options.force_long || wide_len(&regular) >= options.max_path {
        prefix_regular(&regular)
    } else {
        regular
    };

    if wide_len(&full) > MAX_LONG_PATH {
        return Err(Error::invalid(
            path,
            format!("path exceeds the {MAX_LONG_PATH} character limit"),
        ));
    }

    log::trace!("normalized '{path}' to '{full}'");
    Ok(CanonicalPath::from_normalized(full))
}

/// Reject empty input, control characters, `"<>|`, and wildcards unless
/// allowed. The `?` of a `\\?\` prefix is not a wildcard.
pub(crate) fn check_path_chars(path: &str, allow_wildcards: bool) -> Result<()> {
    if path.trim().is_empty() {
        return Err(Error::invalid(path, "path is empty or whitespace"));
    }
    check_fragment_chars(path, allow_wildcards)
}

fn check_fragment_chars(path: &str, allow_wildcards: bool) -> Result<()> {
    let skip = if has_prefix(path, LONG_PATH_PREFIX) || has_prefix(path, DEVICE_PREFIX) {
        LONG_PATH_PREFIX.len()
    } else {
        0
    };

    for c in path[skip..].chars() {
        if u32::from(c) < 0x20 {
            return Err(Error::invalid(path, "path contains a control character"));
        }
        match c {
            '"' | '<' | '>' | '|' => {
                return Err(Error::invalid(path, format!("illegal character '{c}'")));
            }
            '*' | '?' if !allow_wildcards => {
                return Err(Error::invalid(
                    path,
                    format!("wildcard '{c}' is not allowed in a path"),
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

fn strip_long_prefix(path: &str) -> Cow<'_, str> {
    if has_prefix(path, LONG_PATH_UNC_PREFIX) {
        Cow::Owned(format!(r"\\{}", &path[LONG_PATH_UNC_PREFIX.len()..]))
    } else if is_long_path(path) {
        Cow::Borrowed(&path[LONG_PATH_PREFIX.len()..])
    } else {
        Cow::Borrowed(path)
    }
}

fn check_colons(path: &str, body: &str) -> Result<()> {
    let drive = starts_with_drive(body);
    for (index, c) in body.char_indices() {
        if c == VOLUME_SEPARATOR && !(index == 1 && drive) {
            return Err(Error::invalid(
                path,
                "a colon is only allowed directly after the drive letter",
            ));
        }
    }
    Ok(())
}

fn resolve_against_base(
    path: &str,
    body: &str,
    was_long: bool,
    base_dir: Option<&str>,
) -> Result<String> {
    let body = body.replace(ALT_DIRECTORY_SEPARATOR, "\\");
    let bytes = body.as_bytes();

    match classify_unchecked(&body) {
        PathForm::DriveRooted if bytes.len() > 2 && bytes[2] == b'\\' => Ok(body),
        PathForm::DriveRooted => {
            let (drive, rest) = body.split_at(2);
            if was_long {
                return Ok(format!("{drive}\\{rest}"));
            }
            let base = base_directory(path, base_dir)?;
            if starts_with_drive(&base) && base[..2].eq_ignore_ascii_case(drive) {
                Ok(join_base(&base, rest))
            } else {
                Ok(format!("{drive}\\{rest}"))
            }
        }
        PathForm::Relative => {
            if bytes.len() >= 2 && bytes[0] == b'\\' && bytes[1] == b'\\' {
                return Err(Error::invalid(path, "UNC path is missing the server name"));
            }
            let base = base_directory(path, base_dir)?;
            if bytes.first() == Some(&b'\\') {
                let root = base[..root_length(&base)].trim_end_matches(DIRECTORY_SEPARATOR);
                Ok(format!("{root}{body}"))
            } else {
                Ok(join_base(&base, &body))
            }
        }
        _ => Ok(body),
    }
}

/// The regular canonical form of the base directory for relative input.
fn base_directory(path: &str, base_dir: Option<&str>) -> Result<String> {
    let base = match base_dir {
        Some(base) => base.to_string(),
        None => env::current_dir()
            .map_err(|e| Error::invalid(path, format!("cannot get current directory: {e}")))?
            .to_string_lossy()
            .into_owned(),
    };

    let absolute = !base.is_empty()
        && match classify_unchecked(&base) {
            PathForm::DriveRooted => root_length(&base) == 3,
            PathForm::UncRooted | PathForm::LongForm => true,
            PathForm::Relative | PathForm::DeviceRooted => false,
        };
    if !absolute {
        return Err(Error::invalid(
            path,
            format!("base directory '{base}' is not an absolute drive or UNC path"),
        ));
    }

    let options = FullPathOptions::default().with_max_path(usize::MAX);
    Ok(get_full_path_with(&base, None, &options)?.to_regular())
}

fn join_base(base: &str, rest: &str) -> String {
    format!("{}\\{rest}", base.trim_end_matches(DIRECTORY_SEPARATOR))
}

fn split_root<'a>(path: &str, absolute: &'a str) -> Result<(String, Vec<&'a str>)> {
    if starts_with_drive(absolute) {
        let root = format!("{}\\", &absolute[..2]);
        return Ok((root, absolute[2..].split(DIRECTORY_SEPARATOR).collect()));
    }

    let mut parts = absolute[2..].split(DIRECTORY_SEPARATOR);
    let server = parts.next().unwrap_or_default();
    let share = parts.next().unwrap_or_default();
    if server.is_empty() {
        return Err(Error::invalid(path, "UNC path is missing the server name"));
    }
    if share.is_empty() {
        return Err(Error::invalid(path, "UNC path is missing the share name"));
    }
    Ok((format!(r"\\{server}\{share}"), parts.collect()))
}

fn check_device_names(path: &str, segments: &[&str]) -> Result<()> {
    for segment in segments {
        let stem = segment.split('.').next().unwrap_or_default().trim_end();
        if RESERVED_DEVICE_NAMES
            .iter()
            .any(|name| name.eq_ignore_ascii_case(stem))
        {
            return Err(Error::invalid(
                path,
                format!("'{segment}' is a reserved device name"),
            ));
        }
    }
    Ok(())
}

/// Resolve `.` and `..` and drop empty segments. `..` at the root is
/// discarded.
fn collapse(segments: Vec<&str>) -> Vec<&str> {
    let mut result = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => {
                result.pop();
            }
            other => result.push(other),
        }
    }
    result
}

fn prefix_regular(regular: &str) -> String {
    match regular.strip_prefix(r"\\") {
        Some(unc) => format!("{LONG_PATH_UNC_PREFIX}{unc}"),
        None => format!("{LONG_PATH_PREFIX}{regular}"),
    }
}

/// Strip the long-path prefix from a path.
///
/// `\\?\UNC\server\share` becomes `\\server\share`; `\\?\C:\` and `\\.\C:\`
/// become `C:\`. Other device paths and regular paths are returned
/// unchanged.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if the path is empty or contains illegal
/// characters.
///
/// # Examples
///
/// ```
/// use longpath::path::get_regular_path;
///
/// assert_eq!(get_regular_path(r"\\?\C:\Windows").unwrap(), r"C:\Windows");
/// assert_eq!(get_regular_path(r"\\.\C:\Windows").unwrap(), r"C:\Windows");
/// assert_eq!(get_regular_path(r"\\?\Volume{1}\x").unwrap(), r"\\?\Volume{1}\x");
/// ```
pub fn get_regular_path(path: &str) -> Result<String> {
    check_path_chars(path, true)?;

    if has_prefix(path, LONG_PATH_UNC_PREFIX) {
        return Ok(format!(r"\\{}", &path[LONG_PATH_UNC_PREFIX.len()..]));
    }
    if (is_long_path(path) || has_prefix(path, DEVICE_PREFIX))
        && starts_with_drive(&path[LONG_PATH_PREFIX.len()..])
    {
        return Ok(path[LONG_PATH_PREFIX.len()..].to_string());
    }
    Ok(path.to_string())
}

/// Add the long-path prefix to an absolute path regardless of its length.
///
/// Relative and drive-relative paths, device paths and paths that already
/// carry the prefix are returned unchanged.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if the path is empty or contains illegal
/// characters.
///
/// # Examples
///
/// ```
/// use longpath::path::get_long_path;
///
/// assert_eq!(get_long_path(r"C:\Windows").unwrap(), r"\\?\C:\Windows");
/// assert_eq!(get_long_path(r"\\server\share").unwrap(), r"\\?\UNC\server\share");
/// assert_eq!(get_long_path("relative").unwrap(), "relative");
/// ```
pub fn get_long_path(path: &str) -> Result<String> {
    check_path_chars(path, true)?;

    let prefixed = match classify_unchecked(path) {
        PathForm::UncRooted if !is_long_path(path) => Some(format!(
            "{LONG_PATH_UNC_PREFIX}{}",
            path[2..].replace(ALT_DIRECTORY_SEPARATOR, "\\")
        )),
        PathForm::DriveRooted if root_length(path) == 3 => Some(format!(
            "{LONG_PATH_PREFIX}{}",
            path.replace(ALT_DIRECTORY_SEPARATOR, "\\")
        )),
        _ => None,
    };
    Ok(prefixed.unwrap_or_else(|| path.to_string()))
}

/// Combine two path fragments with exactly one separator between them.
///
/// An empty fragment is ignored, and a rooted `second` replaces `first`.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if either fragment contains illegal
/// characters. Wildcards are accepted.
///
/// # Examples
///
/// ```
/// use longpath::path::combine;
///
/// assert_eq!(combine(r"C:\Windows", "System32").unwrap(), r"C:\Windows\System32");
/// assert_eq!(combine(r"C:\Windows\", "System32").unwrap(), r"C:\Windows\System32");
/// assert_eq!(combine(r"C:\Windows", r"D:\Data").unwrap(), r"D:\Data");
/// assert_eq!(combine("", "file.txt").unwrap(), "file.txt");
/// ```
pub fn combine(first: &str, second: &str) -> Result<String> {
    check_fragment_chars(first, true)?;
    check_fragment_chars(second, true)?;

    if second.is_empty() {
        return Ok(first.to_string());
    }
    if first.is_empty() || is_path_rooted(second) {
        return Ok(second.to_string());
    }

    let mut combined = String::with_capacity(first.len() + second.len() + 1);
    combined.push_str(first);
    if !first.ends_with(|c| is_separator(c) || c == VOLUME_SEPARATOR) {
        combined.push(DIRECTORY_SEPARATOR);
    }
    combined.push_str(second);
    Ok(combined)
}

/// Combine any number of fragments left to right with [`combine`].
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if any fragment contains illegal
/// characters.
pub fn combine_all<S: AsRef<str>>(parts: &[S]) -> Result<String> {
    parts
        .iter()
        .try_fold(String::new(), |acc, part| combine(&acc, part.as_ref()))
}

/// Ensure the path ends with a separator.
///
/// `alt` selects `/` instead of `\`. A path that already ends with either
/// separator, and the empty path, are returned unchanged.
///
/// # Examples
///
/// ```
/// use longpath::path::add_trailing_separator;
///
/// assert_eq!(add_trailing_separator(r"C:\Windows", false), r"C:\Windows\");
/// assert_eq!(add_trailing_separator("C:/Windows", true), "C:/Windows/");
/// assert_eq!(add_trailing_separator(r"C:\Windows\", true), r"C:\Windows\");
/// ```
#[must_use]
pub fn add_trailing_separator(path: &str, alt: bool) -> String {
    if path.is_empty() || path.ends_with(is_separator) {
        return path.to_string();
    }
    let separator = if alt {
        ALT_DIRECTORY_SEPARATOR
    } else {
        DIRECTORY_SEPARATOR
    };
    let mut result = String::with_capacity(path.len() + 1);
    result.push_str(path);
    result.push(separator);
    result
}

/// Strip trailing separators, never removing the separator of a root.
///
/// # Examples
///
/// ```
/// use longpath::path::remove_trailing_separator;
///
/// assert_eq!(remove_trailing_separator(r"C:\Windows\\"), r"C:\Windows");
/// assert_eq!(remove_trailing_separator(r"C:\"), r"C:\");
/// assert_eq!(remove_trailing_separator(r"\\server\share\"), r"\\server\share");
/// ```
#[must_use]
pub fn remove_trailing_separator(path: &str) -> String {
    let root = root_length(path);
    let trimmed = path.trim_end_matches(is_separator);
    if trimmed.len() < root {
        path[..root].to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: Option<&str> = Some(r"C:\Windows\System32");

    fn full(path: &str) -> String {
        get_full_path(path, BASE).unwrap().into_string()
    }

    #[test]
    fn test_full_path_resolves_dots() {
        assert_eq!(full(r"C:\a\.\b\..\c"), r"C:\a\c");
        assert_eq!(full(r"C:\a\b\..\..\c"), r"C:\c");
        assert_eq!(full(r"C:\..\..\x"), r"C:\x");
        assert_eq!(full(r"C:\a\\\b\\"), r"C:\a\b");
        assert_eq!(full("C:/a/b/"), r"C:\a\b");
    }

    #[test]
    fn test_full_path_roots_keep_separator() {
        assert_eq!(full(r"C:\"), r"C:\");
        assert_eq!(full(r"C:\.."), r"C:\");
        assert_eq!(full(r"\\server\share\"), r"\\server\share");
        assert_eq!(full(r"\\server\share\a\..\.."), r"\\server\share");
    }

    #[test]
    fn test_full_path_relative_forms() {
        assert_eq!(full("file.txt"), r"C:\Windows\System32\file.txt");
        assert_eq!(full(r"..\notepad.exe"), r"C:\Windows\notepad.exe");
        assert_eq!(full("."), r"C:\Windows\System32");
        assert_eq!(full(r"\Temp"), r"C:\Temp");
        assert_eq!(full("C:drivers"), r"C:\Windows\System32\drivers");
        assert_eq!(full("D:data"), r"D:\data");
        assert_eq!(full("c:drivers"), r"C:\Windows\System32\drivers");
    }

    #[test]
    fn test_full_path_relative_against_unc_base() {
        let base = Some(r"\\server\share\dir");
        assert_eq!(
            get_full_path(r"..\x", base).unwrap().as_str(),
            r"\\server\share\x"
        );
        assert_eq!(
            get_full_path(r"\root.txt", base).unwrap().as_str(),
            r"\\server\share\root.txt"
        );
    }

    #[test]
    fn test_full_path_rejects_relative_base() {
        let err = get_full_path("x", Some("relative")).unwrap_err();
        assert!(err.is_structural());
        let err = get_full_path("x", Some("C:relative")).unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_full_path_illegal_input() {
        for bad in [
            "",
            "   ",
            r"C:\?test.txt",
            r"C:\*",
            r"C:\a|b",
            r#"C:\"quoted""#,
            "C:\\a\0b",
            "aaa:aaa.txt",
            r"C:\a:b",
            r"\\\\.txt",
            r"\\server",
            r"\\server\",
            r"C:\CON",
            r"C:\dir\nul.txt",
            r"C:\com1 .log",
        ] {
            let err = get_full_path(bad, BASE).unwrap_err();
            assert!(err.is_structural(), "expected structural error for {bad:?}");
        }
    }

    #[test]
    fn test_full_path_allows_device_names_in_long_form() {
        let path = get_full_path(r"\\?\C:\dir\CON", None).unwrap();
        assert_eq!(path.as_str(), r"\\?\C:\dir\CON");
    }

    #[test]
    fn test_full_path_reserved_name_as_part_of_longer_name() {
        assert_eq!(full(r"C:\CONSOLE\auxiliary.txt"), r"C:\CONSOLE\auxiliary.txt");
    }

    #[test]
    fn test_full_path_wildcards_when_allowed() {
        let options = FullPathOptions::default().with_allow_wildcards(true);
        let path = get_full_path_with(r"C:\dir\*.txt", None, &options).unwrap();
        assert_eq!(path.as_str(), r"C:\dir\*.txt");
    }

    #[test]
    fn test_full_path_long_prefix_threshold() {
        let name = "a".repeat(MAX_PATH - 3);
        let just_short = format!(r"C:\{}", &name[1..]);
        assert_eq!(wide_len(&just_short), MAX_PATH - 1);
        assert_eq!(full(&just_short), just_short);

        let at_limit = format!(r"C:\{name}");
        assert_eq!(wide_len(&at_limit), MAX_PATH);
        assert_eq!(full(&at_limit), format!(r"\\?\C:\{name}"));
    }

    #[test]
    fn test_full_path_unc_long_prefix() {
        let options = FullPathOptions::default().with_force_long(true);
        let path = get_full_path_with(r"\\server\share\dir", None, &options).unwrap();
        assert_eq!(path.as_str(), r"\\?\UNC\server\share\dir");
    }

    #[test]
    fn test_full_path_keeps_long_input() {
        assert_eq!(full(r"\\?\C:\a\..\b"), r"\\?\C:\b");
        assert_eq!(full(r"\\?\C:"), r"\\?\C:\");
        assert_eq!(full(r"\\?\UNC\server\share\x\"), r"\\?\UNC\server\share\x");
    }

    #[test]
    fn test_full_path_device_passthrough() {
        assert_eq!(full(r"\\.\PhysicalDrive0"), r"\\.\PhysicalDrive0");
        assert_eq!(
            full(r"\\?\GLOBALROOT\Device\HarddiskVolume1\x"),
            r"\\?\GLOBALROOT\Device\HarddiskVolume1\x"
        );
    }

    #[test]
    fn test_full_path_trailing_separator_option() {
        let options = FullPathOptions::default().with_trailing_separator(true);
        let dir = get_full_path_with(r"C:\dir", None, &options).unwrap();
        assert_eq!(dir.as_str(), r"C:\dir\");
        let root = get_full_path_with(r"\\server\share", None, &options).unwrap();
        assert_eq!(root.as_str(), r"\\server\share\");
        let again = get_full_path_with(dir.as_str(), None, &options).unwrap();
        assert_eq!(again, dir);
    }

    #[test]
    fn test_full_path_is_idempotent() {
        for path in [r"C:\a\b", r"\\server\share\x", r"\\?\C:\x", r"C:\"] {
            let once = full(path);
            assert_eq!(full(&once), once);
        }
    }

    #[test]
    fn test_full_path_limit() {
        let huge = format!(r"C:\{}", "a".repeat(MAX_LONG_PATH));
        assert!(get_full_path(&huge, None).unwrap_err().is_structural());
    }

    #[test]
    fn test_regular_path() {
        assert_eq!(get_regular_path(r"\\?\C:\x").unwrap(), r"C:\x");
        assert_eq!(get_regular_path(r"\\?\UNC\s\share\x").unwrap(), r"\\s\share\x");
        assert_eq!(get_regular_path(r"\\.\C:\x").unwrap(), r"C:\x");
        assert_eq!(get_regular_path(r"\\.\COM1").unwrap(), r"\\.\COM1");
        assert_eq!(get_regular_path(r"C:\x").unwrap(), r"C:\x");
        assert!(get_regular_path("").is_err());
        assert!(get_regular_path(r"C:\a<b").is_err());
    }

    #[test]
    fn test_long_path() {
        assert_eq!(get_long_path(r"C:\x").unwrap(), r"\\?\C:\x");
        assert_eq!(get_long_path("C:/x").unwrap(), r"\\?\C:\x");
        assert_eq!(get_long_path(r"\\?\C:\x").unwrap(), r"\\?\C:\x");
        assert_eq!(get_long_path(r"\\s\share").unwrap(), r"\\?\UNC\s\share");
        assert_eq!(get_long_path("C:x").unwrap(), "C:x");
        assert_eq!(get_long_path(r"\x").unwrap(), r"\x");
        assert_eq!(get_long_path(r"\\.\COM1").unwrap(), r"\\.\COM1");
    }

    #[test]
    fn test_combine() {
        assert_eq!(combine(r"C:\a", "b").unwrap(), r"C:\a\b");
        assert_eq!(combine("C:/a/", "b").unwrap(), "C:/a/b");
        assert_eq!(combine("C:", "b").unwrap(), "C:b");
        assert_eq!(combine(r"C:\a", r"\b").unwrap(), r"\b");
        assert_eq!(combine(r"C:\a", "").unwrap(), r"C:\a");
        assert_eq!(combine(r"C:\a", "*.txt").unwrap(), r"C:\a\*.txt");
        assert!(combine(r"C:\a", "b|c").is_err());
    }

    #[test]
    fn test_combine_all() {
        assert_eq!(
            combine_all(&[r"C:\", "Windows", "", "System32"]).unwrap(),
            r"C:\Windows\System32"
        );
        assert_eq!(combine_all(&["a", r"D:\x", "y"]).unwrap(), r"D:\x\y");
        assert_eq!(combine_all::<&str>(&[]).unwrap(), "");
    }

    #[test]
    fn test_trailing_separator_helpers() {
        assert_eq!(add_trailing_separator("", false), "");
        assert_eq!(add_trailing_separator(r"C:\a/", false), r"C:\a/");
        assert_eq!(remove_trailing_separator(r"C:\a\/"), r"C:\a");
        assert_eq!(remove_trailing_separator(r"\\?\C:\"), r"\\?\C:\");
        assert_eq!(remove_trailing_separator(r"\"), r"\");
        assert_eq!(remove_trailing_separator(r"dir\"), "dir");
        assert_eq!(remove_trailing_separator(""), "");
    }

    // Property-based tests
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn drive_path_strategy() -> impl Strategy<Value = String> {
            (
                "[A-Za-z]",
                prop::collection::vec(
                    prop_oneof![
                        Just(".".to_string()),
                        Just("..".to_string()),
                        Just(String::new()),
                        "[a-zA-Z0-9_ -]{1,12}".prop_map(|s| s),
                    ],
                    0..=8,
                ),
                prop::bool::ANY,
            )
                .prop_map(|(drive, parts, alt)| {
                    let separator = if alt { "/" } else { "\\" };
                    format!("{drive}:{separator}{}", parts.join(separator))
                })
        }

        proptest! {
            /// Normalizing a canonical path changes nothing
            #[test]
            fn full_path_idempotent(s in drive_path_strategy()) {
                if let Ok(once) = get_full_path(&s, None) {
                    let twice = get_full_path(once.as_str(), None).unwrap();
                    prop_assert_eq!(once, twice);
                }
            }

            /// Canonical paths carry no dot segments or doubled separators
            #[test]
            fn full_path_has_no_dot_segments(s in drive_path_strategy()) {
                if let Ok(path) = get_full_path(&s, None) {
                    let regular = path.to_regular();
                    prop_assert!(!regular[3..].split('\\').any(|seg| seg == "." || seg == ".."));
                    prop_assert!(!regular.contains(r"\\"));
                    prop_assert!(!regular.contains('/'));
                }
            }

            /// Regular and full conversions commute
            #[test]
            fn regular_full_round_trip(s in drive_path_strategy()) {
                if let Ok(path) = get_full_path(&s, None) {
                    let via_regular = get_full_path(&get_regular_path(&s).unwrap(), None).unwrap();
                    prop_assert_eq!(get_regular_path(path.as_str()).unwrap(), via_regular.to_regular());
                }
            }

            /// Trailing separator helpers are idempotent
            #[test]
            fn trailing_separator_idempotent(s in drive_path_strategy(), alt in prop::bool::ANY) {
                let added = add_trailing_separator(&s, alt);
                prop_assert_eq!(add_trailing_separator(&added, alt), added.clone());
                let removed = remove_trailing_separator(&s);
                prop_assert_eq!(remove_trailing_separator(&removed), removed);
            }
        }
    }
}
