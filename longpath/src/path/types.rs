//! Core types for path handling.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::classify::{classify_unchecked, is_long_path, PathForm};
use super::normalize::{get_long_path, get_regular_path};
use super::{is_separator, DIRECTORY_SEPARATOR};

/// A path in canonical form.
///
/// A canonical path:
/// - Uses `\` as its only separator
/// - Carries the `\\?\` prefix when it is too long for legacy APIs, when the
///   prefix was requested, or when the input was already in long form
/// - Has no `.` or `..` segments and no redundant separators
/// - Has no trailing separator unless one was requested (roots such as
///   `C:\` always keep theirs)
///
/// Canonical paths are only produced by the normalizer.
///
/// # Examples
///
/// ```
/// use longpath::path::{get_full_path, PathForm};
///
/// let path = get_full_path(r"C:\Data\..\Windows", None).unwrap();
/// assert_eq!(path.as_str(), r"C:\Windows");
/// assert_eq!(path.form(), PathForm::DriveRooted);
/// assert!(!path.is_long());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CanonicalPath(String);

impl CanonicalPath {
    /// Wraps a string the normalizer has already produced.
    pub(crate) fn from_normalized(path: String) -> Self {
        debug_assert!(!path.is_empty());
        Self(path)
    }

    /// The path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the path, returning the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// The topology of this path.
    #[must_use]
    pub fn form(&self) -> PathForm {
        classify_unchecked(&self.0)
    }

    /// Returns `true` if the path carries the `\\?\` prefix.
    #[must_use]
    pub fn is_long(&self) -> bool {
        is_long_path(&self.0)
    }

    /// The path without any long-form prefix.
    #[must_use]
    pub fn to_regular(&self) -> String {
        get_regular_path(&self.0).unwrap_or_else(|_| self.0.clone())
    }

    /// The path with the long-form prefix, regardless of its length.
    #[must_use]
    pub fn to_long(&self) -> Self {
        match get_long_path(&self.0) {
            Ok(long) => Self(long),
            Err(_) => self.clone(),
        }
    }

    /// Appends a single segment that is known to be a valid file name.
    pub(crate) fn child(&self, name: &str) -> Self {
        let mut path = String::with_capacity(self.0.len() + name.len() + 1);
        path.push_str(&self.0);
        if !self.0.ends_with(is_separator) {
            path.push(DIRECTORY_SEPARATOR);
        }
        path.push_str(name);
        Self(path)
    }

    /// Length of the path in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; canonical paths are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CanonicalPath {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CanonicalPath {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<CanonicalPath> for String {
    fn from(path: CanonicalPath) -> Self {
        path.0
    }
}

/// How much checking and resolution an input path receives before it is
/// used, and which form emitted paths take.
///
/// # Examples
///
/// ```
/// use longpath::path::PathFormat;
///
/// assert_eq!(PathFormat::default(), PathFormat::RelativePath);
/// assert!(PathFormat::LongFullPath.emits_long_paths());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathFormat {
    /// The input may be relative and is fully normalized.
    #[default]
    RelativePath,
    /// The input must already be absolute.
    FullPath,
    /// The input must already carry the long-form prefix.
    LongFullPath,
}

impl PathFormat {
    /// Whether paths handed back to the caller keep the `\\?\` prefix.
    #[must_use]
    pub const fn emits_long_paths(self) -> bool {
        matches!(self, Self::LongFullPath)
    }
}
