//! The native file system boundary.
//!
//! [`NativeFileSystem`] is the only place the library talks to a volume.
//! Implementations decode raw find data into [`EntryRecord`]s before
//! returning them, so nothing above this layer sees OS buffers.
//!
//! Two implementations are provided:
//! - [`MemoryFileSystem`]: an in-memory volume with 8.3 name generation,
//!   for tests and for callers that simulate a volume
//! - `StdFileSystem` (Windows only): the host volume through the Win32
//!   find and path name APIs

mod memory;
#[cfg(windows)]
mod std_fs;

pub use memory::{MemoryFileSystem, MemorySearch};
#[cfg(windows)]
pub use std_fs::{StdFileSystem, StdSearch};

use crate::enumerate::{EntryRecord, SearchPattern};
use crate::error::Result;

/// Performance hints for a native search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FindHints {
    /// Leave short names out of the returned records.
    pub basic_search: bool,
    /// Use a larger fetch buffer.
    pub large_cache: bool,
}

impl Default for FindHints {
    fn default() -> Self {
        Self {
            basic_search: true,
            large_cache: true,
        }
    }
}

/// Raw directory search and name translation primitives of a volume.
///
/// Paths passed in are canonical and normally carry the long-path prefix;
/// implementations must accept both prefixed and regular forms.
///
/// A search is opened by [`find_first`](Self::find_first), advanced by
/// [`find_next`](Self::find_next) and must be released with
/// [`find_close`](Self::find_close) exactly once.
pub trait NativeFileSystem {
    /// An open search handle.
    type Search;

    /// Open a search over the entries of `directory` whose names match
    /// `pattern`, returning the handle and the first entry (if any).
    ///
    /// Non-root directories report `.` and `..` like the Win32 API.
    ///
    /// # Errors
    ///
    /// [`Error::DirectoryNotFound`](crate::Error::DirectoryNotFound) if the
    /// directory does not exist,
    /// [`Error::PermissionDenied`](crate::Error::PermissionDenied) if it
    /// cannot be listed, or another native error.
    fn find_first(
        &self,
        directory: &str,
        pattern: &SearchPattern,
        hints: FindHints,
    ) -> Result<(Self::Search, Option<EntryRecord>)>;

    /// The next entry of an open search, or `None` when it is exhausted.
    ///
    /// # Errors
    ///
    /// Returns a native error if the search fails mid-way.
    fn find_next(&self, search: &mut Self::Search) -> Result<Option<EntryRecord>>;

    /// Release an open search.
    fn find_close(&self, search: Self::Search);

    /// Translate every segment of an existing path to its short name.
    ///
    /// # Errors
    ///
    /// [`Error::PathNotFound`](crate::Error::PathNotFound) if a segment does
    /// not exist, [`Error::NotSupported`](crate::Error::NotSupported) if the
    /// volume keeps no short names.
    fn long_to_short(&self, path: &str) -> Result<String>;

    /// Translate every segment of an existing path to its long name.
    ///
    /// # Errors
    ///
    /// [`Error::PathNotFound`](crate::Error::PathNotFound) if a segment does
    /// not exist.
    fn short_to_long(&self, path: &str) -> Result<String>;

    /// Returns `true` if `path` names an existing directory.
    fn directory_exists(&self, path: &str) -> bool;
}
