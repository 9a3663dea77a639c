//! Enumeration options.

use serde::{Deserialize, Serialize};

use super::entry::EntryRecord;
use crate::native::FindHints;

/// Flags controlling a directory enumeration.
///
/// The defaults list files and folders of a single directory, propagate the
/// first error, use the basic (no short name) search and request the large
/// fetch buffer.
///
/// Setting both `files_only` and `folders_only` lists files and folders.
///
/// # Examples
///
/// ```
/// use longpath::EnumerationOptions;
///
/// let options = EnumerationOptions::default()
///     .with_recursive(true)
///     .with_files_only(true);
/// assert!(options.recursive);
/// assert!(options.includes_files());
/// assert!(!options.includes_folders());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct EnumerationOptions {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Yield only files.
    pub files_only: bool,
    /// Yield only folders.
    pub folders_only: bool,
    /// Neither yield nor descend into reparse points.
    pub skip_reparse_points: bool,
    /// Skip subtrees whose search fails instead of ending the enumeration.
    pub continue_on_exception: bool,
    /// Do not retrieve short names.
    pub basic_search: bool,
    /// Ask the native layer for a larger fetch buffer.
    pub large_cache: bool,
    /// Descend into directory symbolic links.
    pub follow_symbolic_links: bool,
}

impl Default for EnumerationOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            files_only: false,
            folders_only: false,
            skip_reparse_points: false,
            continue_on_exception: false,
            basic_search: true,
            large_cache: true,
            follow_symbolic_links: false,
        }
    }
}

impl EnumerationOptions {
    /// Sets recursive descent.
    #[must_use]
    pub const fn with_recursive(mut self, value: bool) -> Self {
        self.recursive = value;
        self
    }

    /// Sets whether only files are yielded.
    #[must_use]
    pub const fn with_files_only(mut self, value: bool) -> Self {
        self.files_only = value;
        self
    }

    /// Sets whether only folders are yielded.
    #[must_use]
    pub const fn with_folders_only(mut self, value: bool) -> Self {
        self.folders_only = value;
        self
    }

    /// Sets whether reparse points are skipped.
    #[must_use]
    pub const fn with_skip_reparse_points(mut self, value: bool) -> Self {
        self.skip_reparse_points = value;
        self
    }

    /// Sets whether failing subtrees are skipped.
    #[must_use]
    pub const fn with_continue_on_exception(mut self, value: bool) -> Self {
        self.continue_on_exception = value;
        self
    }

    /// Sets whether short names are left out of the search.
    #[must_use]
    pub const fn with_basic_search(mut self, value: bool) -> Self {
        self.basic_search = value;
        self
    }

    /// Sets whether the large fetch buffer is requested.
    #[must_use]
    pub const fn with_large_cache(mut self, value: bool) -> Self {
        self.large_cache = value;
        self
    }

    /// Sets whether directory symbolic links are descended into.
    #[must_use]
    pub const fn with_follow_symbolic_links(mut self, value: bool) -> Self {
        self.follow_symbolic_links = value;
        self
    }

    /// Whether files are yielded.
    #[must_use]
    pub const fn includes_files(&self) -> bool {
        !self.folders_only || self.files_only
    }

    /// Whether folders are yielded.
    #[must_use]
    pub const fn includes_folders(&self) -> bool {
        !self.files_only || self.folders_only
    }

    /// Whether `record` passes the type and reparse point filters.
    pub(crate) fn accepts(&self, record: &EntryRecord) -> bool {
        if self.skip_reparse_points && record.is_reparse_point() {
            return false;
        }
        if record.is_directory() {
            self.includes_folders()
        } else {
            self.includes_files()
        }
    }

    /// Whether the engine should descend into `record`.
    pub(crate) fn descends_into(&self, record: &EntryRecord) -> bool {
        self.recursive
            && record.is_directory()
            && !(self.skip_reparse_points && record.is_reparse_point())
            && (self.follow_symbolic_links || !record.is_symbolic_link())
    }

    /// The hints passed to every native search.
    #[must_use]
    pub const fn find_hints(&self) -> FindHints {
        FindHints {
            basic_search: self.basic_search,
            large_cache: self.large_cache,
        }
    }
}
