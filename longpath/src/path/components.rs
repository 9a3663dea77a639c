//! Path component extraction.
//!
//! These functions split a path string into directory, file name and
//! extension without normalizing it first. They accept any separator and
//! never touch the file system.

use super::classify::root_length;
use super::normalize::check_path_chars;
use super::{is_separator, DIRECTORY_SEPARATOR, VOLUME_SEPARATOR};
use crate::error::Result;

/// The directory part of a path, or `None` for a root or an empty path.
///
/// Trailing separators of the directory part are removed, except for the
/// separator belonging to a root.
///
/// # Errors
///
/// Returns an error if the path contains illegal characters.
///
/// # Examples
///
/// ```
/// use longpath::path::get_directory_name;
///
/// assert_eq!(get_directory_name(r"C:\Windows\notepad.exe").unwrap(), Some(r"C:\Windows"));
/// assert_eq!(get_directory_name(r"C:\Windows").unwrap(), Some(r"C:\"));
/// assert_eq!(get_directory_name(r"C:\").unwrap(), None);
/// assert_eq!(get_directory_name("file.txt").unwrap(), Some(""));
/// ```
pub fn get_directory_name(path: &str) -> Result<Option<&str>> {
    if path.is_empty() {
        return Ok(None);
    }
    check_path_chars(path, true)?;

    let root = root_length(path);
    if path.len() <= root {
        return Ok(None);
    }

    let Some(last) = path[root..].rfind(is_separator).map(|i| root + i) else {
        return Ok(Some(&path[..root]));
    };
    let mut end = last;
    while end > root && path[..end].ends_with(is_separator) {
        end -= 1;
    }
    Ok(Some(&path[..end.max(root)]))
}

/// The final segment of a path: everything after the last separator or
/// drive colon.
///
/// # Examples
///
/// ```
/// use longpath::path::get_file_name;
///
/// assert_eq!(get_file_name(r"C:\Windows\notepad.exe"), "notepad.exe");
/// assert_eq!(get_file_name("C:file.txt"), "file.txt");
/// assert_eq!(get_file_name(r"C:\Windows\"), "");
/// ```
#[must_use]
pub fn get_file_name(path: &str) -> &str {
    match path.rfind(|c| is_separator(c) || c == VOLUME_SEPARATOR) {
        Some(index) => &path[index + 1..],
        None => path,
    }
}

/// The extension of the final segment including its dot, or `""`.
///
/// A name whose only dot is the first character (`.gitignore`) or the last
/// character (`file.`) has no extension.
///
/// # Examples
///
/// ```
/// use longpath::path::get_extension;
///
/// assert_eq!(get_extension(r"C:\a\archive.tar.gz"), ".gz");
/// assert_eq!(get_extension(r"C:\a\.gitignore"), "");
/// assert_eq!(get_extension(r"C:\a.dir\README"), "");
/// ```
#[must_use]
pub fn get_extension(path: &str) -> &str {
    let name = get_file_name(path);
    match name.rfind('.') {
        Some(index) if index > 0 && index + 1 < name.len() => &name[index..],
        _ => "",
    }
}

/// Returns `true` if the final segment has an extension.
#[must_use]
pub fn has_extension(path: &str) -> bool {
    !get_extension(path).is_empty()
}

/// The final segment without its extension.
///
/// # Examples
///
/// ```
/// use longpath::path::get_file_name_without_extension;
///
/// assert_eq!(get_file_name_without_extension(r"C:\a\report.final.docx"), "report.final");
/// assert_eq!(get_file_name_without_extension(r"C:\a\.profile"), ".profile");
/// ```
#[must_use]
pub fn get_file_name_without_extension(path: &str) -> &str {
    let name = get_file_name(path);
    &name[..name.len() - get_extension(name).len()]
}

/// Replace, add or (with `None`) remove the extension of the final segment.
///
/// A missing leading dot on `extension` is added.
///
/// # Examples
///
/// ```
/// use longpath::path::change_extension;
///
/// assert_eq!(change_extension(r"C:\a\file.txt", Some(".log")), r"C:\a\file.log");
/// assert_eq!(change_extension(r"C:\a\file", Some("log")), r"C:\a\file.log");
/// assert_eq!(change_extension(r"C:\a\file.txt", None), r"C:\a\file");
/// ```
#[must_use]
pub fn change_extension(path: &str, extension: Option<&str>) -> String {
    let current = get_extension(path);
    let stem = if !current.is_empty() {
        &path[..path.len() - current.len()]
    } else if get_file_name(path).len() > 1 && path.ends_with('.') {
        &path[..path.len() - 1]
    } else {
        path
    };

    let mut result = stem.to_string();
    if let Some(extension) = extension.filter(|e| !e.is_empty()) {
        if !extension.starts_with('.') {
            result.push('.');
        }
        result.push_str(extension);
    }
    result
}

/// The parent directory of `path`, unless that parent is a root.
fn non_root_parent(path: &str) -> Result<Option<&str>> {
    let Some(parent) = get_directory_name(path)? else {
        return Ok(None);
    };
    if parent.len() <= root_length(parent) {
        return Ok(None);
    }
    Ok(Some(parent))
}

/// The name of the directory containing the final segment, or `None` when
/// that directory is a root.
///
/// # Errors
///
/// Returns an error if the path contains illegal characters.
///
/// # Examples
///
/// ```
/// use longpath::path::get_directory_name_without_root;
///
/// assert_eq!(
///     get_directory_name_without_root(r"C:\Windows\system32\missing.txt").unwrap(),
///     Some("system32".to_string())
/// );
/// assert_eq!(get_directory_name_without_root(r"C:\Windows").unwrap(), None);
/// assert_eq!(get_directory_name_without_root(r"C:\").unwrap(), None);
/// ```
pub fn get_directory_name_without_root(path: &str) -> Result<Option<String>> {
    Ok(non_root_parent(path)?.map(|parent| get_file_name(parent).to_string()))
}

/// The parent directory with a trailing separator, or `None` when the
/// parent is a root.
///
/// # Errors
///
/// Returns an error if the path contains illegal characters.
///
/// # Examples
///
/// ```
/// use longpath::path::get_suffixed_directory_name;
///
/// assert_eq!(
///     get_suffixed_directory_name(r"C:\Windows\System32\NeDir").unwrap(),
///     Some(r"C:\Windows\System32\".to_string())
/// );
/// assert_eq!(get_suffixed_directory_name(r"C:\Windows").unwrap(), None);
/// ```
pub fn get_suffixed_directory_name(path: &str) -> Result<Option<String>> {
    Ok(non_root_parent(path)?.map(|parent| format!("{parent}{DIRECTORY_SEPARATOR}")))
}

/// Like [`get_suffixed_directory_name`] with the root removed.
///
/// # Errors
///
/// Returns an error if the path contains illegal characters.
///
/// # Examples
///
/// ```
/// use longpath::path::get_suffixed_directory_name_without_root;
///
/// assert_eq!(
///     get_suffixed_directory_name_without_root(r"\\HOST\C$\Windows\System32\NeDir").unwrap(),
///     Some(r"Windows\System32\".to_string())
/// );
/// ```
pub fn get_suffixed_directory_name_without_root(path: &str) -> Result<Option<String>> {
    Ok(non_root_parent(path)?.map(|parent| {
        let relative = parent[root_length(parent)..].trim_start_matches(is_separator);
        format!("{relative}{DIRECTORY_SEPARATOR}")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_name_forms() {
        let cases = [
            (r"C:\a\b", Some(r"C:\a")),
            (r"C:\a\b\", Some(r"C:\a\b")),
            (r"C:\a\\b", Some(r"C:\a")),
            (r"C:\a", Some(r"C:\")),
            (r"C:\", None),
            ("C:", None),
            ("C:a", Some("C:")),
            (r"\\server\share\x", Some(r"\\server\share")),
            (r"\\server\share", None),
            (r"\\?\C:\a\b", Some(r"\\?\C:\a")),
            (r"\\?\C:\a", Some(r"\\?\C:\")),
            (r"\\?\UNC\server\share\x", Some(r"\\?\UNC\server\share")),
            (r"a\b", Some("a")),
            ("a", Some("")),
            (r"\a", Some(r"\")),
            ("", None),
        ];
        for (path, expected) in cases {
            assert_eq!(get_directory_name(path).unwrap(), expected, "parent of {path:?}");
        }
    }

    #[test]
    fn test_directory_name_rejects_illegal_chars() {
        assert!(get_directory_name(r"C:\a|b\c").is_err());
    }

    #[test]
    fn test_directory_name_allows_wildcards() {
        assert_eq!(get_directory_name(r"C:\a\*.txt").unwrap(), Some(r"C:\a"));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(get_file_name(r"C:\a\b.txt"), "b.txt");
        assert_eq!(get_file_name("C:/a/b.txt"), "b.txt");
        assert_eq!(get_file_name("b.txt"), "b.txt");
        assert_eq!(get_file_name(r"\\server\share"), "share");
        assert_eq!(get_file_name(""), "");
    }

    #[test]
    fn test_extension_rules() {
        assert_eq!(get_extension("a.txt"), ".txt");
        assert_eq!(get_extension("a."), "");
        assert_eq!(get_extension(".a"), "");
        assert_eq!(get_extension("..a"), ".a");
        assert_eq!(get_extension(r"dir.x\file"), "");
        assert!(has_extension("a.b"));
        assert!(!has_extension(".bashrc"));
    }

    #[test]
    fn test_file_name_without_extension() {
        assert_eq!(get_file_name_without_extension("a.txt"), "a");
        assert_eq!(get_file_name_without_extension("a"), "a");
        assert_eq!(get_file_name_without_extension(r"C:\dir\a.b.c"), "a.b");
    }

    #[test]
    fn test_change_extension() {
        assert_eq!(change_extension("a.txt", Some("md")), "a.md");
        assert_eq!(change_extension("a.", Some(".md")), "a.md");
        assert_eq!(change_extension(".bashrc", Some("bak")), ".bashrc.bak");
        assert_eq!(change_extension("a.txt", Some("")), "a");
        assert_eq!(change_extension("a", None), "a");
    }

    #[test]
    fn test_directory_name_without_root() {
        assert_eq!(
            get_directory_name_without_root(r"\\server\share\dir\file").unwrap(),
            Some("dir".to_string())
        );
        assert_eq!(
            get_directory_name_without_root(r"a\b").unwrap(),
            Some("a".to_string())
        );
        assert_eq!(get_directory_name_without_root("a").unwrap(), None);
        assert_eq!(get_directory_name_without_root("").unwrap(), None);
    }

    #[test]
    fn test_suffixed_directory_names() {
        assert_eq!(
            get_suffixed_directory_name(r"\\?\C:\Windows\System32\x").unwrap(),
            Some(r"\\?\C:\Windows\System32\".to_string())
        );
        assert_eq!(get_suffixed_directory_name(r"C:\").unwrap(), None);
        assert_eq!(
            get_suffixed_directory_name_without_root(r"C:\Windows\system32\nedir").unwrap(),
            Some(r"Windows\system32\".to_string())
        );
        assert_eq!(
            get_suffixed_directory_name_without_root(r"C:\Windows").unwrap(),
            None
        );
    }
}
