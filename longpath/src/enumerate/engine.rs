//! The lazy directory walker.

use std::iter::FusedIterator;

use super::entry::EntryRecord;
use super::options::EnumerationOptions;
use super::pattern::SearchPattern;
use super::projection::Projection;
use crate::error::{Error, Result};
use crate::native::NativeFileSystem;
use crate::path::normalize::check_path_chars;
use crate::path::{
    classify, get_directory_name, get_full_path, is_long_path, remove_trailing_separator,
    root_length, wide_len, CanonicalPath, PathForm, PathFormat, MAX_LONG_PATH,
};

/// Enumerate the entries of `path` matching `pattern`.
///
/// `path` is fully normalized first (relative paths resolve against the
/// current directory) and emitted paths use the regular form. See
/// [`enumerate_with`] for the other path formats.
///
/// # Errors
///
/// See [`enumerate_with`].
///
/// # Examples
///
/// ```
/// use longpath::enumerate::{enumerate, AsPath, EnumerationOptions};
/// use longpath::native::MemoryFileSystem;
///
/// let mut fs = MemoryFileSystem::new();
/// fs.add_file(r"C:\logs\app.log", 10).unwrap();
/// fs.add_file(r"C:\logs\old\app.log", 10).unwrap();
///
/// let options = EnumerationOptions::default().with_recursive(true);
/// let paths: Vec<String> = enumerate(&fs, r"C:\logs", "*", options, AsPath)
///     .unwrap()
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(paths, [r"C:\logs\app.log", r"C:\logs\old", r"C:\logs\old\app.log"]);
/// ```
pub fn enumerate<'fs, F, P>(
    fs: &'fs F,
    path: &str,
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
        path,
        pattern,
        options,
        PathFormat::RelativePath,
        projection,
    )
}

/// Enumerate the entries of `path` matching `pattern`, interpreting `path`
/// according to `format`.
///
/// Nothing is listed until the returned iterator is advanced. The parent of
/// `path` is checked up front; the directory itself is checked by the first
/// native search.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] for a malformed path or pattern, for a
/// relative path under [`PathFormat::FullPath`] and for a regular path under
/// [`PathFormat::LongFullPath`]. Returns [`Error::DirectoryNotFound`] if the
/// parent of `path` does not exist.
pub fn enumerate_with<'fs, F, P>(
    fs: &'fs F,
    path: &str,
    pattern: &str,
    options: EnumerationOptions,
    format: PathFormat,
    projection: P,
) -> Result<Enumerator<'fs, F, P>>
where
    F: NativeFileSystem,
    P: Projection,
{
    let root = canonicalize(path, format)?.to_long();
    let pattern = SearchPattern::new(pattern)?;

    if let Some(parent) = get_directory_name(root.as_str())?.filter(|p| !p.is_empty()) {
        if !fs.directory_exists(parent) {
            return Err(Error::DirectoryNotFound {
                path: root.to_regular(),
            });
        }
    }

    // Recursive walks must see every subdirectory, so the native search
    // lists everything and names are filtered here.
    let filter_names = options.recursive && !pattern.is_match_all();
    let native_pattern = if filter_names {
        SearchPattern::match_all()
    } else {
        pattern.clone()
    };

    log::debug!(
        "enumerating '{}' for '{}' (recursive: {})",
        root.to_regular(),
        pattern,
        options.recursive
    );

    Ok(Enumerator {
        fs,
        root: root.clone(),
        pattern,
        native_pattern,
        filter_names,
        options,
        format,
        projection,
        pending: vec![root],
        current: None,
        finished: false,
    })
}

fn canonicalize(path: &str, format: PathFormat) -> Result<CanonicalPath> {
    match format {
        PathFormat::RelativePath => get_full_path(path, None),
        PathFormat::FullPath => {
            let absolute = match classify(path)? {
                PathForm::DriveRooted => root_length(path) == 3,
                PathForm::Relative => false,
                _ => true,
            };
            if !absolute {
                return Err(Error::invalid(path, "an absolute path is required"));
            }
            get_full_path(path, None)
        }
        PathFormat::LongFullPath => {
            if !is_long_path(path) {
                return Err(Error::invalid(path, "a long-form path is required"));
            }
            check_path_chars(path, false)?;
            Ok(CanonicalPath::from_normalized(remove_trailing_separator(path)))
        }
    }
}

/// A lazy, depth-first walk over a directory tree.
///
/// Yields one projected value per accepted entry. After an error is yielded
/// the iterator is finished. At most one native search is open at a time and
/// it is closed when the directory is exhausted, when an error ends the walk
/// or when the enumerator is dropped.
pub struct Enumerator<'fs, F: NativeFileSystem, P: Projection> {
    fs: &'fs F,
    root: CanonicalPath,
    pattern: SearchPattern,
    native_pattern: SearchPattern,
    filter_names: bool,
    options: EnumerationOptions,
    format: PathFormat,
    projection: P,
    pending: Vec<CanonicalPath>,
    current: Option<ActiveSearch<'fs, F>>,
    finished: bool,
}

impl<F: NativeFileSystem, P: Projection> Enumerator<'_, F, P> {
    /// The start directory, in long form.
    #[must_use]
    pub fn root(&self) -> &CanonicalPath {
        &self.root
    }

    /// The options the walk was started with.
    #[must_use]
    pub fn options(&self) -> &EnumerationOptions {
        &self.options
    }

    fn open(&mut self, directory: CanonicalPath) -> Result<()> {
        log::debug!("opening search in '{directory}'");
        let hints = self.options.find_hints();
        let (handle, first) = self
            .fs
            .find_first(directory.as_str(), &self.native_pattern, hints)?;
        self.current = Some(ActiveSearch {
            fs: self.fs,
            exhausted: first.is_none(),
            handle: Some(handle),
            directory,
            pending_first: first,
            subdirectories: Vec::new(),
        });
        Ok(())
    }

    /// Decide whether a failed directory ends the walk. Returns the error to
    /// yield, if any. Failures of the start directory always end it.
    fn fail(&mut self, error: Error, directory: &CanonicalPath) -> Option<Error> {
        if *directory == self.root {
            self.finish();
            if error.is_not_found() {
                return Some(Error::DirectoryNotFound {
                    path: directory.to_regular(),
                });
            }
            return Some(error);
        }
        if self.options.continue_on_exception {
            log::warn!("skipping '{}': {error}", directory.to_regular());
            return None;
        }
        self.finish();
        Some(error)
    }

    fn finish(&mut self) {
        self.finished = true;
        self.pending.clear();
        self.current = None;
    }
}

impl<F: NativeFileSystem, P: Projection> Iterator for Enumerator<'_, F, P> {
    type Item = Result<P::Output>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            if self.current.is_none() {
                let Some(directory) = self.pending.pop() else {
                    self.finished = true;
                    return None;
                };
                if let Err(error) = self.open(directory.clone()) {
                    if let Some(error) = self.fail(error, &directory) {
                        return Some(Err(error));
                    }
                    continue;
                }
            }

            let Some(search) = self.current.as_mut() else {
                continue;
            };
            match search.next_record() {
                Ok(Some(mut record)) => {
                    if record.is_dot_entry() {
                        continue;
                    }
                    let path = search.directory.child(record.file_name());
                    record.assign_paths(&path);

                    if self.options.descends_into(&record) {
                        if wide_len(path.as_str()) > MAX_LONG_PATH {
                            log::warn!(
                                "not descending into '{}': path exceeds {MAX_LONG_PATH} characters",
                                record.full_path()
                            );
                        } else {
                            search.subdirectories.push(path);
                        }
                    }

                    let matched = self
                        .pattern
                        .matches_entry(record.file_name(), record.alternate_file_name());
                    if self.filter_names && !matched {
                        log::trace!("'{}' does not match '{}'", record.full_path(), self.pattern);
                        continue;
                    }
                    if !self.options.accepts(&record) {
                        log::trace!("'{}' filtered out", record.full_path());
                        continue;
                    }
                    return Some(Ok(self.projection.project(record, self.format)));
                }
                Ok(None) => {
                    if let Some(mut done) = self.current.take() {
                        let subdirectories = std::mem::take(&mut done.subdirectories);
                        if !subdirectories.is_empty() {
                            log::debug!(
                                "queued {} subdirectories of '{}'",
                                subdirectories.len(),
                                done.directory
                            );
                        }
                        self.pending.extend(subdirectories.into_iter().rev());
                    }
                }
                Err(error) => {
                    let directory = search.directory.clone();
                    self.current = None;
                    if let Some(error) = self.fail(error, &directory) {
                        return Some(Err(error));
                    }
                }
            }
        }
    }
}

impl<F: NativeFileSystem, P: Projection> FusedIterator for Enumerator<'_, F, P> {}

impl<F: NativeFileSystem, P: Projection> std::fmt::Debug for Enumerator<'_, F, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enumerator")
            .field("root", &self.root)
            .field("pattern", &self.pattern)
            .field("options", &self.options)
            .field("format", &self.format)
            .field("pending", &self.pending)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

/// One open native search. Dropping it closes the handle.
struct ActiveSearch<'fs, F: NativeFileSystem> {
    fs: &'fs F,
    handle: Option<F::Search>,
    directory: CanonicalPath,
    pending_first: Option<EntryRecord>,
    exhausted: bool,
    subdirectories: Vec<CanonicalPath>,
}

impl<F: NativeFileSystem> ActiveSearch<'_, F> {
    fn next_record(&mut self) -> Result<Option<EntryRecord>> {
        if let Some(first) = self.pending_first.take() {
            return Ok(Some(first));
        }
        if self.exhausted {
            return Ok(None);
        }
        let Some(handle) = self.handle.as_mut() else {
            return Ok(None);
        };
        let next = self.fs.find_next(handle)?;
        if next.is_none() {
            self.exhausted = true;
        }
        Ok(next)
    }
}

impl<F: NativeFileSystem> Drop for ActiveSearch<'_, F> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            log::trace!("closing search in '{}'", self.directory);
            self.fs.find_close(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerate::{AsNode, AsPath, AsRecord, FileAttributes};
    use crate::native::MemoryFileSystem;

    fn volume() -> MemoryFileSystem {
        let mut fs = MemoryFileSystem::new();
        fs.add_file(r"C:\root\a.txt", 1).unwrap();
        fs.add_file(r"C:\root\b.log", 2).unwrap();
        fs.add_file(r"C:\root\sub\c.txt", 3).unwrap();
        fs.add_file(r"C:\root\sub\deep\d.txt", 4).unwrap();
        fs.add_file(r"C:\root\other\e.txt", 5).unwrap();
        fs
    }

    fn paths<F: NativeFileSystem>(
        fs: &F,
        path: &str,
        pattern: &str,
        options: EnumerationOptions,
    ) -> Vec<String> {
        enumerate(fs, path, pattern, options, AsPath)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap()
    }

    #[test]
    fn test_single_directory() {
        let fs = volume();
        assert_eq!(
            paths(&fs, r"C:\root", "*", EnumerationOptions::default()),
            vec![
                r"C:\root\a.txt",
                r"C:\root\b.log",
                r"C:\root\sub",
                r"C:\root\other",
            ]
        );
    }

    #[test]
    fn test_recursive_depth_first() {
        let fs = volume();
        let options = EnumerationOptions::default().with_recursive(true);
        assert_eq!(
            paths(&fs, r"C:\root", "*", options),
            vec![
                r"C:\root\a.txt",
                r"C:\root\b.log",
                r"C:\root\sub",
                r"C:\root\other",
                r"C:\root\sub\c.txt",
                r"C:\root\sub\deep",
                r"C:\root\sub\deep\d.txt",
                r"C:\root\other\e.txt",
            ]
        );
        assert_eq!(fs.open_searches(), 0);
    }

    #[test]
    fn test_recursive_pattern_still_descends() {
        let fs = volume();
        let options = EnumerationOptions::default()
            .with_recursive(true)
            .with_files_only(true);
        assert_eq!(
            paths(&fs, r"C:\root", "*.txt", options),
            vec![
                r"C:\root\a.txt",
                r"C:\root\sub\c.txt",
                r"C:\root\sub\deep\d.txt",
                r"C:\root\other\e.txt",
            ]
        );
    }

    #[test]
    fn test_missing_parent_fails_up_front() {
        let fs = volume();
        let err = enumerate(
            &fs,
            r"C:\missing\child",
            "*",
            EnumerationOptions::default(),
            AsRecord,
        )
        .unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound { ref path } if path == r"C:\missing\child"));
    }

    #[test]
    fn test_missing_directory_is_single_error() {
        let fs = volume();
        let options = EnumerationOptions::default().with_continue_on_exception(true);
        let results: Vec<_> = enumerate(&fs, r"C:\root\nope", "*", options, AsRecord)
            .unwrap()
            .collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(
            &results[0],
            Err(Error::DirectoryNotFound { path }) if path == r"C:\root\nope"
        ));
    }

    #[test]
    fn test_file_as_start_directory() {
        let fs = volume();
        let mut entries =
            enumerate(&fs, r"C:\root\a.txt", "*", EnumerationOptions::default(), AsRecord).unwrap();
        assert!(entries.next().unwrap().unwrap_err().is_not_found());
        assert!(entries.next().is_none());
    }

    #[test]
    fn test_path_formats() {
        let fs = volume();
        let long: Vec<String> = enumerate_with(
            &fs,
            r"\\?\C:\root\sub",
            "*.txt",
            EnumerationOptions::default(),
            PathFormat::LongFullPath,
            AsPath,
        )
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();
        assert_eq!(long, vec![r"\\?\C:\root\sub\c.txt"]);

        let err = enumerate_with(
            &fs,
            r"C:\root",
            "*",
            EnumerationOptions::default(),
            PathFormat::LongFullPath,
            AsRecord,
        )
        .unwrap_err();
        assert!(err.is_structural());

        let err = enumerate_with(
            &fs,
            r"root\sub",
            "*",
            EnumerationOptions::default(),
            PathFormat::FullPath,
            AsRecord,
        )
        .unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_invalid_pattern() {
        let fs = volume();
        for pattern in ["", r"a\b", "a|b"] {
            let err = enumerate(&fs, r"C:\root", pattern, EnumerationOptions::default(), AsRecord)
                .unwrap_err();
            assert!(err.is_structural(), "{pattern}");
        }
    }

    #[test]
    fn test_denied_subdirectory() {
        let mut fs = volume();
        fs.deny_access(r"C:\root\sub").unwrap();

        let options = EnumerationOptions::default()
            .with_recursive(true)
            .with_files_only(true);
        let results: Vec<_> = enumerate(&fs, r"C:\root", "*", options, AsPath)
            .unwrap()
            .collect();
        assert_eq!(results.len(), 3);
        assert!(results[2].as_ref().unwrap_err().is_permission_denied());

        let skipping: Vec<String> = enumerate(
            &fs,
            r"C:\root",
            "*",
            options.with_continue_on_exception(true),
            AsPath,
        )
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();
        assert_eq!(
            skipping,
            vec![r"C:\root\a.txt", r"C:\root\b.log", r"C:\root\other\e.txt"]
        );
        assert_eq!(fs.open_searches(), 0);
    }

    #[test]
    fn test_node_enumerates_itself() {
        let fs = volume();
        let sub = enumerate(
            &fs,
            r"C:\root",
            "sub",
            EnumerationOptions::default(),
            AsNode,
        )
        .unwrap()
        .next()
        .unwrap()
        .unwrap();
        assert!(sub.record().attributes().contains(FileAttributes::DIRECTORY));

        let children: Vec<String> = sub
            .enumerate(&fs, "*", EnumerationOptions::default(), |r: EntryRecord| {
                r.full_path().to_string()
            })
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(children, vec![r"C:\root\sub\c.txt", r"C:\root\sub\deep"]);
    }

    #[test]
    fn test_root_of_volume() {
        let fs = volume();
        assert_eq!(
            paths(&fs, r"C:\", "*", EnumerationOptions::default()),
            vec![r"C:\root"]
        );
    }
}
