//! Decoded directory entries.
//!
//! The native layer hands the engine fully decoded [`EntryRecord`]s; raw
//! find-data buffers never cross that boundary.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::time::UNIX_EPOCH;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::path::CanonicalPath;

/// Win32 file attribute flags.
///
/// # Examples
///
/// ```
/// use longpath::enumerate::FileAttributes;
///
/// let attrs = FileAttributes::DIRECTORY | FileAttributes::HIDDEN;
/// assert!(attrs.contains(FileAttributes::DIRECTORY));
/// assert!(!attrs.contains(FileAttributes::READONLY));
/// assert!(!FileAttributes::INVALID.is_valid());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileAttributes(u32);

impl FileAttributes {
    /// No attributes.
    pub const EMPTY: Self = Self(0);
    /// `FILE_ATTRIBUTE_READONLY`
    pub const READONLY: Self = Self(0x1);
    /// `FILE_ATTRIBUTE_HIDDEN`
    pub const HIDDEN: Self = Self(0x2);
    /// `FILE_ATTRIBUTE_SYSTEM`
    pub const SYSTEM: Self = Self(0x4);
    /// `FILE_ATTRIBUTE_DIRECTORY`
    pub const DIRECTORY: Self = Self(0x10);
    /// `FILE_ATTRIBUTE_ARCHIVE`
    pub const ARCHIVE: Self = Self(0x20);
    /// `FILE_ATTRIBUTE_DEVICE`
    pub const DEVICE: Self = Self(0x40);
    /// `FILE_ATTRIBUTE_NORMAL`
    pub const NORMAL: Self = Self(0x80);
    /// `FILE_ATTRIBUTE_TEMPORARY`
    pub const TEMPORARY: Self = Self(0x100);
    /// `FILE_ATTRIBUTE_SPARSE_FILE`
    pub const SPARSE_FILE: Self = Self(0x200);
    /// `FILE_ATTRIBUTE_REPARSE_POINT`
    pub const REPARSE_POINT: Self = Self(0x400);
    /// `FILE_ATTRIBUTE_COMPRESSED`
    pub const COMPRESSED: Self = Self(0x800);
    /// `FILE_ATTRIBUTE_OFFLINE`
    pub const OFFLINE: Self = Self(0x1000);
    /// `FILE_ATTRIBUTE_NOT_CONTENT_INDEXED`
    pub const NOT_CONTENT_INDEXED: Self = Self(0x2000);
    /// `FILE_ATTRIBUTE_ENCRYPTED`
    pub const ENCRYPTED: Self = Self(0x4000);
    /// `INVALID_FILE_ATTRIBUTES`; every derived predicate answers `false`.
    pub const INVALID: Self = Self(u32::MAX);

    const NAMES: [(Self, &'static str); 14] = [
        (Self::READONLY, "READONLY"),
        (Self::HIDDEN, "HIDDEN"),
        (Self::SYSTEM, "SYSTEM"),
        (Self::DIRECTORY, "DIRECTORY"),
        (Self::ARCHIVE, "ARCHIVE"),
        (Self::DEVICE, "DEVICE"),
        (Self::NORMAL, "NORMAL"),
        (Self::TEMPORARY, "TEMPORARY"),
        (Self::SPARSE_FILE, "SPARSE_FILE"),
        (Self::REPARSE_POINT, "REPARSE_POINT"),
        (Self::COMPRESSED, "COMPRESSED"),
        (Self::OFFLINE, "OFFLINE"),
        (Self::NOT_CONTENT_INDEXED, "NOT_CONTENT_INDEXED"),
        (Self::ENCRYPTED, "ENCRYPTED"),
    ];

    /// Wraps raw attribute bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw attribute bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `false` for [`FileAttributes::INVALID`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }

    /// Returns `true` if every flag of `other` is set. Invalid attributes
    /// contain nothing.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.is_valid() && self.0 & other.0 == other.0
    }
}

impl BitOr for FileAttributes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FileAttributes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for FileAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(f, "FileAttributes(INVALID)");
        }
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "FileAttributes({})", names.join(" | "))
    }
}

/// The reparse tag of an entry.
///
/// # Examples
///
/// ```
/// use longpath::enumerate::ReparseTag;
///
/// assert_eq!(ReparseTag::from_raw(0xA000_000C), ReparseTag::SymLink);
/// assert_eq!(ReparseTag::MountPoint.to_raw(), 0xA000_0003);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReparseTag {
    /// Not a reparse point.
    #[default]
    None,
    /// `IO_REPARSE_TAG_MOUNT_POINT` (junctions and volume mount points).
    MountPoint,
    /// `IO_REPARSE_TAG_SYMLINK`
    SymLink,
    /// Any other tag.
    Other(u32),
}

impl ReparseTag {
    const MOUNT_POINT_RAW: u32 = 0xA000_0003;
    const SYMLINK_RAW: u32 = 0xA000_000C;

    /// Decode a raw tag value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::None,
            Self::MOUNT_POINT_RAW => Self::MountPoint,
            Self::SYMLINK_RAW => Self::SymLink,
            other => Self::Other(other),
        }
    }

    /// The raw tag value.
    #[must_use]
    pub const fn to_raw(self) -> u32 {
        match self {
            Self::None => 0,
            Self::MountPoint => Self::MOUNT_POINT_RAW,
            Self::SymLink => Self::SYMLINK_RAW,
            Self::Other(raw) => raw,
        }
    }
}

/// Convert a `FILETIME` value (100 ns ticks since 1601-01-01 UTC).
///
/// Returns `None` for values chrono cannot represent.
///
/// # Examples
///
/// ```
/// use longpath::enumerate::filetime_to_utc;
///
/// let epoch = filetime_to_utc(116_444_736_000_000_000).unwrap();
/// assert_eq!(epoch.timestamp(), 0);
/// ```
#[must_use]
pub fn filetime_to_utc(filetime: u64) -> Option<DateTime<Utc>> {
    const TICKS_PER_SECOND: u64 = 10_000_000;
    const SECONDS_TO_UNIX_EPOCH: i64 = 11_644_473_600;

    let seconds = i64::try_from(filetime / TICKS_PER_SECOND).ok()? - SECONDS_TO_UNIX_EPOCH;
    let nanos = u32::try_from((filetime % TICKS_PER_SECOND) * 100).ok()?;
    Utc.timestamp_opt(seconds, nanos).single()
}

/// One decoded directory entry.
///
/// Derived facts (`is_directory`, `is_symbolic_link`, ...) are computed from
/// the attributes and reparse tag on demand. The full paths are assigned by
/// the enumeration engine; records built by a native layer start without
/// them.
///
/// # Examples
///
/// ```
/// use longpath::enumerate::{EntryRecord, FileAttributes, ReparseTag};
///
/// let record = EntryRecord::new("link", FileAttributes::DIRECTORY | FileAttributes::REPARSE_POINT)
///     .with_reparse_tag(ReparseTag::SymLink);
/// assert!(record.is_directory());
/// assert!(record.is_symbolic_link());
/// assert!(!record.is_mount_point());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRecord {
    file_name: String,
    alternate_file_name: String,
    attributes: FileAttributes,
    file_size: u64,
    creation_time_utc: DateTime<Utc>,
    last_access_time_utc: DateTime<Utc>,
    last_write_time_utc: DateTime<Utc>,
    reparse_tag: ReparseTag,
    full_path: String,
    long_full_path: String,
}

impl EntryRecord {
    /// A record with no size, no short name and timestamps at the Unix
    /// epoch.
    #[must_use]
    pub fn new(file_name: impl Into<String>, attributes: FileAttributes) -> Self {
        let epoch = DateTime::<Utc>::from(UNIX_EPOCH);
        Self {
            file_name: file_name.into(),
            alternate_file_name: String::new(),
            attributes,
            file_size: 0,
            creation_time_utc: epoch,
            last_access_time_utc: epoch,
            last_write_time_utc: epoch,
            reparse_tag: ReparseTag::None,
            full_path: String::new(),
            long_full_path: String::new(),
        }
    }

    /// Sets the file size in bytes.
    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.file_size = size;
        self
    }

    /// Sets the 8.3 short name.
    #[must_use]
    pub fn with_alternate_file_name(mut self, name: impl Into<String>) -> Self {
        self.alternate_file_name = name.into();
        self
    }

    /// Sets the creation, last access and last write times.
    #[must_use]
    pub fn with_times(
        mut self,
        creation: DateTime<Utc>,
        last_access: DateTime<Utc>,
        last_write: DateTime<Utc>,
    ) -> Self {
        self.creation_time_utc = creation;
        self.last_access_time_utc = last_access;
        self.last_write_time_utc = last_write;
        self
    }

    /// Sets the reparse tag.
    #[must_use]
    pub fn with_reparse_tag(mut self, tag: ReparseTag) -> Self {
        self.reparse_tag = tag;
        self
    }

    pub(crate) fn assign_paths(&mut self, long_full_path: &CanonicalPath) {
        self.full_path = long_full_path.to_regular();
        self.long_full_path = long_full_path.as_str().to_string();
    }

    /// The entry name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The 8.3 short name, empty when the entry has none or it was not
    /// requested.
    #[must_use]
    pub fn alternate_file_name(&self) -> &str {
        &self.alternate_file_name
    }

    /// The attribute flags.
    #[must_use]
    pub fn attributes(&self) -> FileAttributes {
        self.attributes
    }

    /// The size in bytes.
    #[must_use]
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Creation time in UTC.
    #[must_use]
    pub fn creation_time_utc(&self) -> DateTime<Utc> {
        self.creation_time_utc
    }

    /// Last access time in UTC.
    #[must_use]
    pub fn last_access_time_utc(&self) -> DateTime<Utc> {
        self.last_access_time_utc
    }

    /// Last write time in UTC.
    #[must_use]
    pub fn last_write_time_utc(&self) -> DateTime<Utc> {
        self.last_write_time_utc
    }

    /// Creation time in the local time zone.
    #[must_use]
    pub fn creation_time(&self) -> DateTime<Local> {
        self.creation_time_utc.with_timezone(&Local)
    }

    /// Last access time in the local time zone.
    #[must_use]
    pub fn last_access_time(&self) -> DateTime<Local> {
        self.last_access_time_utc.with_timezone(&Local)
    }

    /// Last write time in the local time zone.
    #[must_use]
    pub fn last_write_time(&self) -> DateTime<Local> {
        self.last_write_time_utc.with_timezone(&Local)
    }

    /// The reparse tag; [`ReparseTag::None`] unless the entry is a reparse
    /// point.
    #[must_use]
    pub fn reparse_tag(&self) -> ReparseTag {
        if self.is_reparse_point() {
            self.reparse_tag
        } else {
            ReparseTag::None
        }
    }

    /// The full path without the long-path prefix.
    #[must_use]
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// The full path with the long-path prefix.
    #[must_use]
    pub fn long_full_path(&self) -> &str {
        &self.long_full_path
    }

    /// Returns `true` for directories.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.attributes.contains(FileAttributes::DIRECTORY)
    }

    /// Returns `true` for reparse points.
    #[must_use]
    pub fn is_reparse_point(&self) -> bool {
        self.attributes.contains(FileAttributes::REPARSE_POINT)
    }

    /// Returns `true` for symbolic links.
    #[must_use]
    pub fn is_symbolic_link(&self) -> bool {
        self.reparse_tag() == ReparseTag::SymLink
    }

    /// Returns `true` for junctions and volume mount points.
    #[must_use]
    pub fn is_mount_point(&self) -> bool {
        self.reparse_tag() == ReparseTag::MountPoint
    }

    /// Returns `true` for the `.` and `..` pseudo-entries.
    #[must_use]
    pub fn is_dot_entry(&self) -> bool {
        self.file_name == "." || self.file_name == ".."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_flags() {
        let mut attrs = FileAttributes::ARCHIVE;
        attrs |= FileAttributes::READONLY;
        assert!(attrs.contains(FileAttributes::ARCHIVE | FileAttributes::READONLY));
        assert!(!attrs.contains(FileAttributes::DIRECTORY));
        assert_eq!(attrs.bits(), 0x21);
        assert_eq!(FileAttributes::from_bits(0x21), attrs);
    }

    #[test]
    fn test_invalid_attributes_answer_false() {
        let record = EntryRecord::new("x", FileAttributes::INVALID)
            .with_reparse_tag(ReparseTag::SymLink);
        assert!(!record.is_directory());
        assert!(!record.is_reparse_point());
        assert!(!record.is_symbolic_link());
        assert_eq!(record.reparse_tag(), ReparseTag::None);
    }

    #[test]
    fn test_attribute_debug() {
        let attrs = FileAttributes::DIRECTORY | FileAttributes::HIDDEN;
        assert_eq!(format!("{attrs:?}"), "FileAttributes(HIDDEN | DIRECTORY)");
        assert_eq!(
            format!("{:?}", FileAttributes::INVALID),
            "FileAttributes(INVALID)"
        );
    }

    #[test]
    fn test_reparse_tag_requires_attribute() {
        let plain = EntryRecord::new("dir", FileAttributes::DIRECTORY)
            .with_reparse_tag(ReparseTag::MountPoint);
        assert_eq!(plain.reparse_tag(), ReparseTag::None);
        assert!(!plain.is_mount_point());

        let junction = EntryRecord::new(
            "junction",
            FileAttributes::DIRECTORY | FileAttributes::REPARSE_POINT,
        )
        .with_reparse_tag(ReparseTag::MountPoint);
        assert!(junction.is_mount_point());
        assert!(!junction.is_symbolic_link());
    }

    #[test]
    fn test_reparse_tag_raw_values() {
        assert_eq!(ReparseTag::from_raw(0), ReparseTag::None);
        assert_eq!(ReparseTag::from_raw(0xA000_0003), ReparseTag::MountPoint);
        assert_eq!(ReparseTag::from_raw(0x8000_0017), ReparseTag::Other(0x8000_0017));
        assert_eq!(ReparseTag::Other(7).to_raw(), 7);
    }

    #[test]
    fn test_filetime_conversion() {
        let time = filetime_to_utc(116_444_736_000_000_000 + 15_000_000).unwrap();
        assert_eq!(time.timestamp(), 1);
        assert_eq!(time.timestamp_subsec_millis(), 500);
        assert!(filetime_to_utc(0).is_some());
    }

    #[test]
    fn test_local_time_accessors_match_utc() {
        let when = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let record = EntryRecord::new("f", FileAttributes::NORMAL).with_times(when, when, when);
        assert_eq!(record.creation_time(), when);
        assert_eq!(record.last_write_time().with_timezone(&Utc), when);
        assert_eq!(record.last_access_time_utc(), when);
    }

    #[test]
    fn test_assign_paths() {
        let mut record = EntryRecord::new("f.txt", FileAttributes::ARCHIVE).with_size(3);
        assert_eq!(record.full_path(), "");
        let path = crate::path::get_full_path(r"\\?\C:\dir\f.txt", None).unwrap();
        record.assign_paths(&path);
        assert_eq!(record.full_path(), r"C:\dir\f.txt");
        assert_eq!(record.long_full_path(), r"\\?\C:\dir\f.txt");
        assert_eq!(record.file_size(), 3);
    }

    #[test]
    fn test_dot_entries() {
        assert!(EntryRecord::new(".", FileAttributes::DIRECTORY).is_dot_entry());
        assert!(EntryRecord::new("..", FileAttributes::DIRECTORY).is_dot_entry());
        assert!(!EntryRecord::new("...", FileAttributes::DIRECTORY).is_dot_entry());
    }
}
