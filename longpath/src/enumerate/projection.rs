//! Result shapes for enumerated entries.
//!
//! A [`Projection`] turns each accepted [`EntryRecord`] into the value the
//! enumerator yields. Projections are pure: they never call the native
//! layer.

use serde::Serialize;

use super::entry::EntryRecord;
use super::options::EnumerationOptions;
use super::{enumerate_with, Enumerator};
use crate::error::Result;
use crate::native::NativeFileSystem;
use crate::path::{to_short_form, PathFormat};

/// Maps an accepted entry into an output value.
///
/// Any `Fn(EntryRecord) -> T` closure is a projection.
pub trait Projection {
    /// The value yielded per entry.
    type Output;

    /// Project one entry. `format` is the path format the enumeration was
    /// started with.
    fn project(&self, record: EntryRecord, format: PathFormat) -> Self::Output;
}

impl<F, T> Projection for F
where
    F: Fn(EntryRecord) -> T,
{
    type Output = T;

    fn project(&self, record: EntryRecord, _format: PathFormat) -> T {
        self(record)
    }
}

/// Yields the decoded [`EntryRecord`] itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsRecord;

impl Projection for AsRecord {
    type Output = EntryRecord;

    fn project(&self, record: EntryRecord, _format: PathFormat) -> EntryRecord {
        record
    }
}

/// Yields the full path string: long form under
/// [`PathFormat::LongFullPath`], regular form otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsPath;

impl Projection for AsPath {
    type Output = String;

    fn project(&self, record: EntryRecord, format: PathFormat) -> String {
        if format.emits_long_paths() {
            record.long_full_path().to_string()
        } else {
            record.full_path().to_string()
        }
    }
}

/// Yields a [`Node`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AsNode;

impl Projection for AsNode {
    type Output = Node;

    fn project(&self, record: EntryRecord, _format: PathFormat) -> Node {
        Node { record }
    }
}

/// The kind of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
    /// A symbolic link to a file or directory.
    SymbolicLink,
    /// A junction or volume mount point.
    MountPoint,
}

/// A file system object found by an enumeration, able to start further
/// operations on itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    record: EntryRecord,
}

impl Node {
    /// The underlying record.
    #[must_use]
    pub fn record(&self) -> &EntryRecord {
        &self.record
    }

    /// Consumes the node, returning the record.
    #[must_use]
    pub fn into_record(self) -> EntryRecord {
        self.record
    }

    /// The entry name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.record.file_name()
    }

    /// The full path without the long-path prefix.
    #[must_use]
    pub fn full_path(&self) -> &str {
        self.record.full_path()
    }

    /// The full path with the long-path prefix.
    #[must_use]
    pub fn long_full_path(&self) -> &str {
        self.record.long_full_path()
    }

    /// What kind of object this is.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        if self.record.is_symbolic_link() {
            NodeKind::SymbolicLink
        } else if self.record.is_mount_point() {
            NodeKind::MountPoint
        } else if self.record.is_directory() {
            NodeKind::Directory
        } else {
            NodeKind::File
        }
    }

    /// Enumerate the entries below this node.
    ///
    /// # Errors
    ///
    /// Same as [`enumerate_with`]; the node must be a directory.
    pub fn enumerate<'fs, F, P>(
        &self,
        fs: &'fs F,
        pattern: &str,
        options: EnumerationOptions,
        projection: P,
    ) -> Result<Enumerator<'fs, F, P>>
    where
        F: NativeFileSystem,
        P: Projection,
    {
        enumerate_with(
            fs,
            self.long_full_path(),
            pattern,
            options,
            PathFormat::LongFullPath,
            projection,
        )
    }

    /// The 8.3 form of this node's path, in regular form.
    ///
    /// # Errors
    ///
    /// Same as [`to_short_form`].
    pub fn to_short_form<F: NativeFileSystem + ?Sized>(&self, fs: &F) -> Result<String> {
        to_short_form(fs, self.full_path())
    }
}
