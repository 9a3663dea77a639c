//! An in-memory volume.
//!
//! Names are matched case-insensitively, children are listed in insertion
//! order, searches match long and short names, and every entry whose name is not already 8.3-compatible receives a
//! generated short name (`MYLONG~1.TXT`) unless short names are disabled.

use std::cell::Cell;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::{FindHints, NativeFileSystem};
use crate::enumerate::{EntryRecord, FileAttributes, ReparseTag, SearchPattern};
use crate::error::{Error, Result};
use crate::path::{
    classify, get_long_path, get_regular_path, is_long_path, is_separator, root_length, PathForm,
    DIRECTORY_SEPARATOR,
};

/// Characters allowed in an 8.3 name besides ASCII letters and digits.
const SHORT_NAME_PUNCTUATION: &str = "!#$%&'()-@^_`{}~";

/// An in-memory volume implementing [`NativeFileSystem`].
///
/// Parent directories are created on demand. Paths may be given in regular
/// or long form, with either separator.
///
/// # Examples
///
/// ```
/// use longpath::native::{MemoryFileSystem, NativeFileSystem};
///
/// let mut fs = MemoryFileSystem::new();
/// fs.add_file(r"C:\Projects\Quarterly Report.xlsx", 2048).unwrap();
///
/// assert!(fs.directory_exists(r"C:\Projects"));
/// assert!(fs.directory_exists(r"\\?\C:\PROJECTS"));
/// assert_eq!(
///     fs.long_to_short(r"C:\Projects\Quarterly Report.xlsx").unwrap(),
///     r"C:\Projects\QUARTE~1.XLS"
/// );
/// ```
#[derive(Debug)]
pub struct MemoryFileSystem {
    nodes: HashMap<String, MemoryNode>,
    short_names: bool,
    open_searches: Cell<usize>,
}

#[derive(Debug, Clone)]
struct MemoryNode {
    name: String,
    short_name: Option<String>,
    attributes: FileAttributes,
    size: u64,
    reparse_tag: ReparseTag,
    modified: DateTime<Utc>,
    denied: bool,
    is_root: bool,
    children: Vec<String>,
}

impl MemoryNode {
    fn answers_to(&self, segment: &str) -> bool {
        same_name(&self.name, segment)
            || self
                .short_name
                .as_deref()
                .is_some_and(|short| same_name(short, segment))
    }

    fn is_directory(&self) -> bool {
        self.attributes.contains(FileAttributes::DIRECTORY)
    }

    fn to_record(&self, basic_search: bool) -> EntryRecord {
        let record = EntryRecord::new(self.name.as_str(), self.attributes)
            .with_size(self.size)
            .with_times(self.modified, self.modified, self.modified)
            .with_reparse_tag(self.reparse_tag);
        match (&self.short_name, basic_search) {
            (Some(short), false) => record.with_alternate_file_name(short.as_str()),
            _ => record,
        }
    }
}

/// An open search over a [`MemoryFileSystem`] directory.
#[derive(Debug)]
pub struct MemorySearch {
    entries: std::vec::IntoIter<EntryRecord>,
}

/// A path split into its root and segments.
struct Location {
    root_key: String,
    root_display: String,
    segments: Vec<String>,
}

impl Location {
    fn parse(path: &str) -> Result<Self> {
        let regular = get_regular_path(path)?;
        let root_len = root_length(&regular);
        let root = &regular[..root_len];
        let absolute = match classify(&regular)? {
            PathForm::DriveRooted => root_len == 3,
            PathForm::UncRooted => regular[2..root_len].contains(is_separator),
            _ => false,
        };
        if !absolute {
            return Err(Error::invalid(
                path,
                "in-memory volume paths must be absolute drive or UNC paths",
            ));
        }

        let root_display = if root.starts_with(is_separator) {
            root.replace('/', "\\")
        } else {
            format!("{}{DIRECTORY_SEPARATOR}", &root[..2])
        };
        Ok(Self {
            root_key: root_display
                .trim_end_matches(DIRECTORY_SEPARATOR)
                .to_lowercase(),
            root_display,
            segments: regular[root_len..]
                .split(is_separator)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFileSystem {
    /// An empty volume that generates short names.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            short_names: true,
            open_searches: Cell::new(0),
        }
    }

    /// A volume that keeps no 8.3 names, like one with 8.3 generation
    /// disabled.
    #[must_use]
    pub fn without_short_names(mut self) -> Self {
        self.short_names = false;
        for node in self.nodes.values_mut() {
            node.short_name = None;
        }
        self
    }

    /// Number of searches opened and not yet closed.
    #[must_use]
    pub fn open_searches(&self) -> usize {
        self.open_searches.get()
    }

    /// Add a directory and any missing parents. Adding an existing directory
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] for a malformed or relative path, or if
    /// a file occupies the path or one of its parents.
    pub fn add_directory(&mut self, path: &str) -> Result<()> {
        self.insert(path, FileAttributes::DIRECTORY, 0, ReparseTag::None)
    }

    /// Add a file of `size` bytes and any missing parents.
    ///
    /// # Errors
    ///
    /// See [`add_directory`](Self::add_directory); also fails if the entry
    /// already exists.
    pub fn add_file(&mut self, path: &str, size: u64) -> Result<()> {
        self.insert(path, FileAttributes::ARCHIVE, size, ReparseTag::None)
    }

    /// Add an entry with explicit attributes.
    ///
    /// # Errors
    ///
    /// See [`add_file`](Self::add_file).
    pub fn add_entry(&mut self, path: &str, attributes: FileAttributes, size: u64) -> Result<()> {
        self.insert(path, attributes, size, ReparseTag::None)
    }

    /// Add a symbolic link, to a directory when `directory` is set.
    ///
    /// # Errors
    ///
    /// See [`add_file`](Self::add_file).
    pub fn add_symlink(&mut self, path: &str, directory: bool) -> Result<()> {
        let mut attributes = FileAttributes::REPARSE_POINT;
        if directory {
            attributes |= FileAttributes::DIRECTORY;
        }
        self.insert(path, attributes, 0, ReparseTag::SymLink)
    }

    /// Add a junction (a directory mount point).
    ///
    /// # Errors
    ///
    /// See [`add_file`](Self::add_file).
    pub fn add_junction(&mut self, path: &str) -> Result<()> {
        self.insert(
            path,
            FileAttributes::DIRECTORY | FileAttributes::REPARSE_POINT,
            0,
            ReparseTag::MountPoint,
        )
    }

    /// Make searches of an existing directory fail with
    /// [`Error::PermissionDenied`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] if the entry does not exist.
    pub fn deny_access(&mut self, path: &str) -> Result<()> {
        let key = self
            .resolve_keys(path)
            .and_then(|chain| chain.last().cloned())
            .ok_or_else(|| not_found(path))?;
        if let Some(node) = self.nodes.get_mut(&key) {
            node.denied = true;
        }
        Ok(())
    }

    /// Remove an entry and everything below it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathNotFound`] if the entry does not exist and
    /// [`Error::InvalidPath`] for a volume root.
    pub fn remove(&mut self, path: &str) -> Result<()> {
        let chain = self.resolve_keys(path).ok_or_else(|| not_found(path))?;
        if chain.len() < 2 {
            return Err(Error::invalid(path, "cannot remove a volume root"));
        }
        let key = chain[chain.len() - 1].clone();
        if let Some(parent) = self.nodes.get_mut(&chain[chain.len() - 2]) {
            parent.children.retain(|child| *child != key);
        }

        let mut pending = vec![key];
        while let Some(key) = pending.pop() {
            if let Some(node) = self.nodes.remove(&key) {
                pending.extend(node.children);
            }
        }
        Ok(())
    }

    fn insert(
        &mut self,
        path: &str,
        attributes: FileAttributes,
        size: u64,
        reparse_tag: ReparseTag,
    ) -> Result<()> {
        let location = Location::parse(path)?;
        let mut parent_key = self.ensure_root(&location);
        let want_directory = attributes.contains(FileAttributes::DIRECTORY)
            && reparse_tag == ReparseTag::None;

        for (index, segment) in location.segments.iter().enumerate() {
            let last = index + 1 == location.segments.len();
            let key = format!("{parent_key}{DIRECTORY_SEPARATOR}{}", segment.to_lowercase());

            if let Some(existing) = self.nodes.get(&key) {
                if last && !(want_directory && existing.is_directory()) {
                    return Err(Error::invalid(path, "entry already exists"));
                }
                if !existing.is_directory() {
                    return Err(Error::invalid(path, format!("'{segment}' is not a directory")));
                }
            } else {
                let short_name = if self.short_names {
                    self.unique_short_name(&parent_key, segment)
                } else {
                    None
                };
                let node = MemoryNode {
                    name: segment.clone(),
                    short_name,
                    attributes: if last { attributes } else { FileAttributes::DIRECTORY },
                    size: if last { size } else { 0 },
                    reparse_tag: if last { reparse_tag } else { ReparseTag::None },
                    modified: Utc::now(),
                    denied: false,
                    is_root: false,
                    children: Vec::new(),
                };
                self.nodes.insert(key.clone(), node);
                if let Some(parent) = self.nodes.get_mut(&parent_key) {
                    parent.children.push(key.clone());
                }
            }
            parent_key = key;
        }
        Ok(())
    }

    fn ensure_root(&mut self, location: &Location) -> String {
        let key = location.root_key.clone();
        self.nodes.entry(key.clone()).or_insert_with(|| MemoryNode {
            name: location.root_display.clone(),
            short_name: None,
            attributes: FileAttributes::DIRECTORY,
            size: 0,
            reparse_tag: ReparseTag::None,
            modified: Utc::now(),
            denied: false,
            is_root: true,
            children: Vec::new(),
        });
        key
    }

    fn unique_short_name(&self, parent_key: &str, name: &str) -> Option<String> {
        let siblings: Vec<&MemoryNode> = self
            .nodes
            .get(parent_key)
            .map(|parent| {
                parent
                    .children
                    .iter()
                    .filter_map(|key| self.nodes.get(key))
                    .collect()
            })
            .unwrap_or_default();
        generate_short_name(name, |candidate| {
            siblings.iter().any(|sibling| sibling.answers_to(candidate))
        })
    }

    /// The keys from the root down to the entry `path` names, resolving
    /// both long and short segment names.
    fn resolve_keys(&self, path: &str) -> Option<Vec<String>> {
        let location = Location::parse(path).ok()?;
        let mut key = location.root_key;
        self.nodes.get(&key)?;

        let mut chain = vec![key.clone()];
        for segment in &location.segments {
            let node = self.nodes.get(&key)?;
            key = node
                .children
                .iter()
                .find(|child| {
                    self.nodes
                        .get(*child)
                        .is_some_and(|child| child.answers_to(segment))
                })?
                .clone();
            chain.push(key.clone());
        }
        Some(chain)
    }

    fn resolve(&self, path: &str) -> Option<Vec<&MemoryNode>> {
        self.resolve_keys(path)?
            .iter()
            .map(|key| self.nodes.get(key))
            .collect()
    }

    /// Join the names picked by `name` from `chain` in the prefix
    /// convention of `input`.
    fn render(
        input: &str,
        chain: &[&MemoryNode],
        name: impl Fn(&MemoryNode) -> String,
    ) -> Result<String> {
        let mut path = chain
            .first()
            .map(|root| root.name.clone())
            .unwrap_or_default();
        for node in chain.iter().skip(1) {
            if !path.ends_with(DIRECTORY_SEPARATOR) {
                path.push(DIRECTORY_SEPARATOR);
            }
            path.push_str(&name(node));
        }
        if is_long_path(input) {
            get_long_path(&path)
        } else {
            Ok(path)
        }
    }
}

impl NativeFileSystem for MemoryFileSystem {
    type Search = MemorySearch;

    fn find_first(
        &self,
        directory: &str,
        pattern: &SearchPattern,
        hints: FindHints,
    ) -> Result<(MemorySearch, Option<EntryRecord>)> {
        let node = self
            .resolve(directory)
            .and_then(|chain| chain.last().copied())
            .filter(|node| node.is_directory())
            .ok_or_else(|| Error::DirectoryNotFound {
                path: display(directory),
            })?;
        if node.denied {
            return Err(Error::PermissionDenied {
                path: display(directory),
            });
        }

        let mut records = Vec::new();
        if !node.is_root {
            for dot in [".", ".."] {
                if pattern.matches(dot) {
                    records.push(EntryRecord::new(dot, FileAttributes::DIRECTORY));
                }
            }
        }
        records.extend(
            node.children
                .iter()
                .filter_map(|key| self.nodes.get(key))
                .filter(|child| {
                    pattern.matches_entry(&child.name, child.short_name.as_deref().unwrap_or_default())
                })
                .map(|child| child.to_record(hints.basic_search)),
        );

        self.open_searches.set(self.open_searches.get() + 1);
        let mut entries = records.into_iter();
        let first = entries.next();
        Ok((MemorySearch { entries }, first))
    }

    fn find_next(&self, search: &mut MemorySearch) -> Result<Option<EntryRecord>> {
        Ok(search.entries.next())
    }

    fn find_close(&self, search: MemorySearch) {
        self.open_searches
            .set(self.open_searches.get().saturating_sub(1));
        drop(search);
    }

    fn long_to_short(&self, path: &str) -> Result<String> {
        if !self.short_names {
            return Err(Error::NotSupported {
                path: display(path),
                reason: "the volume does not keep 8.3 short names".to_string(),
            });
        }
        let chain = self.resolve(path).ok_or_else(|| not_found(path))?;
        Self::render(path, &chain, |node| {
            node.short_name.clone().unwrap_or_else(|| node.name.clone())
        })
    }

    fn short_to_long(&self, path: &str) -> Result<String> {
        let chain = self.resolve(path).ok_or_else(|| not_found(path))?;
        Self::render(path, &chain, |node| node.name.clone())
    }

    fn directory_exists(&self, path: &str) -> bool {
        self.resolve(path)
            .and_then(|chain| chain.last().map(|node| node.is_directory()))
            .unwrap_or(false)
    }
}

fn display(path: &str) -> String {
    get_regular_path(path).unwrap_or_else(|_| path.to_string())
}

fn not_found(path: &str) -> Error {
    Error::PathNotFound {
        path: display(path),
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

fn is_short_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || SHORT_NAME_PUNCTUATION.contains(c)
}

/// Whether `name` already fits the 8.3 format and needs no short name.
pub(super) fn is_short_name_compatible(name: &str) -> bool {
    let (stem, extension) = name.rsplit_once('.').unwrap_or((name, ""));
    !stem.is_empty()
        && stem.len() <= 8
        && extension.len() <= 3
        && stem.chars().chain(extension.chars()).all(is_short_name_char)
}

/// Generate `STEM~N.EXT` for `name`, picking the lowest `N` for which
/// `taken` answers `false`. Returns `None` for names that are already 8.3.
fn generate_short_name(name: &str, taken: impl Fn(&str) -> bool) -> Option<String> {
    if is_short_name_compatible(name) {
        return None;
    }

    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, extension)) if !stem.trim_matches('.').is_empty() => (stem, extension),
        _ => (name, ""),
    };
    let clean = |part: &str| -> String {
        part.chars()
            .filter(|c| *c != ' ' && *c != '.')
            .map(|c| {
                if is_short_name_char(c) {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    };
    let mut stem = clean(stem);
    if stem.is_empty() {
        stem.push('_');
    }
    let extension: String = clean(extension).chars().take(3).collect();

    (1u32..).map(|n| {
        let suffix = format!("~{n}");
        let base: String = stem
            .chars()
            .take(8usize.saturating_sub(suffix.len()))
            .collect();
        if extension.is_empty() {
            format!("{base}{suffix}")
        } else {
            format!("{base}{suffix}.{extension}")
        }
    })
    .find(|candidate| !taken(candidate))
}
