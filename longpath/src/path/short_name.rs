//! Translation between long names and legacy 8.3 short names.
//!
//! Both directions canonicalize the input first, answer roots without a
//! native call and keep the caller's prefix convention: long-form input
//! yields long-form output, regular input yields regular output.

use super::classify::{is_long_path, root_length};
use super::components::{get_directory_name, get_file_name};
use super::normalize::{get_full_path, get_regular_path};
use super::types::CanonicalPath;
use crate::enumerate::SearchPattern;
use crate::error::{Error, Result};
use crate::native::{FindHints, NativeFileSystem};

/// Translate a path into its 8.3 short form.
///
/// Segments without a short name (already 8.3-compatible) keep their name.
///
/// # Errors
///
/// Returns a structural error for malformed input, [`Error::PathNotFound`]
/// if a segment does not exist and [`Error::NotSupported`] if the volume
/// keeps no short names.
///
/// # Examples
///
/// ```
/// use longpath::native::MemoryFileSystem;
/// use longpath::path::to_short_form;
///
/// let mut fs = MemoryFileSystem::new();
/// fs.add_directory(r"C:\My Long Directory").unwrap();
///
/// assert_eq!(to_short_form(&fs, r"C:\My Long Directory").unwrap(), r"C:\MYLONG~1");
/// ```
pub fn to_short_form<F: NativeFileSystem + ?Sized>(fs: &F, path: &str) -> Result<String> {
    let canonical = get_full_path(path, None)?;
    if is_root(&canonical) {
        return Ok(canonical.into_string());
    }

    let long = canonical.to_long();
    log::debug!("translating '{long}' to short form");
    let short = fs.long_to_short(long.as_str())?;
    present(path, &short)
}

/// Translate a path containing short names into its long form.
///
/// # Errors
///
/// Returns a structural error for malformed input and
/// [`Error::PathNotFound`] if a segment does not exist. Returns
/// [`Error::TransientRace`] if the final segment still carries a `~N` short
/// name marker after translation and its parent no longer lists an entry
/// of that long name, meaning the entry vanished between the native
/// lookups. Real names such as `report~1.txt` translate to themselves.
///
/// # Examples
///
/// ```
/// use longpath::native::MemoryFileSystem;
/// use longpath::path::to_long_form;
///
/// let mut fs = MemoryFileSystem::new();
/// fs.add_file(r"C:\Program Files\Application Data.txt", 10).unwrap();
///
/// assert_eq!(
///     to_long_form(&fs, r"C:\PROGRA~1\APPLIC~1.TXT").unwrap(),
///     r"C:\Program Files\Application Data.txt"
/// );
/// ```
pub fn to_long_form<F: NativeFileSystem + ?Sized>(fs: &F, short: &str) -> Result<String> {
    let canonical = get_full_path(short, None)?;
    if is_root(&canonical) {
        return Ok(canonical.into_string());
    }

    let long_input = canonical.to_long();
    log::debug!("translating '{long_input}' to long form");
    let long = fs.short_to_long(long_input.as_str())?;

    let requested = get_file_name(canonical.as_str());
    let resolved = get_file_name(&long);
    if has_short_name_marker(resolved)
        && resolved.eq_ignore_ascii_case(requested)
        && !lists_long_name(fs, &long, resolved)?
    {
        return Err(Error::TransientRace {
            path: canonical.to_regular(),
            details: format!("'{requested}' could not be resolved to a long name"),
        });
    }

    present(short, &long)
}

/// Returns `true` if the parent of `path` lists an entry whose long name is
/// `name`. A vanished parent counts as not listed.
fn lists_long_name<F: NativeFileSystem + ?Sized>(fs: &F, path: &str, name: &str) -> Result<bool> {
    let Some(parent) = get_directory_name(path)?.filter(|parent| !parent.is_empty()) else {
        return Ok(false);
    };
    let pattern = SearchPattern::new(name)?;
    let (mut search, mut next) = match fs.find_first(parent, &pattern, FindHints::default()) {
        Ok(opened) => opened,
        Err(e) if e.is_not_found() => return Ok(false),
        Err(e) => return Err(e),
    };

    let mut found = false;
    let mut outcome = Ok(());
    while let Some(record) = next {
        if record.file_name().eq_ignore_ascii_case(name) {
            found = true;
            break;
        }
        match fs.find_next(&mut search) {
            Ok(record) => next = record,
            Err(e) => {
                outcome = Err(e);
                break;
            }
        }
    }
    fs.find_close(search);
    outcome.map(|()| found)
}

fn is_root(path: &CanonicalPath) -> bool {
    path.len() <= root_length(path.as_str())
}

/// Express a native result in the prefix convention of the caller's input.
fn present(input: &str, result: &str) -> Result<String> {
    if is_long_path(input) {
        Ok(result.to_string())
    } else {
        get_regular_path(result)
    }
}

/// Returns `true` for names whose stem ends in `~` followed by digits.
pub(crate) fn has_short_name_marker(name: &str) -> bool {
    let stem = name.split('.').next().unwrap_or_default();
    stem.rfind('~').is_some_and(|index| {
        let digits = &stem[index + 1..];
        !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::MemoryFileSystem;

    fn volume() -> MemoryFileSystem {
        let mut fs = MemoryFileSystem::new();
        fs.add_file(r"C:\My Long Data File Or Directory\Some Report.docx", 42)
            .unwrap();
        fs.add_directory(r"C:\short").unwrap();
        fs
    }

    #[test]
    fn test_short_name_marker() {
        assert!(has_short_name_marker("MYLONG~1"));
        assert!(has_short_name_marker("SOMERE~12.DOC"));
        assert!(!has_short_name_marker("tilde~"));
        assert!(!has_short_name_marker("a~b"));
        assert!(!has_short_name_marker("plain.txt"));
    }

    #[test]
    fn test_to_short_form_ends_with_marker() {
        let fs = volume();
        let short = to_short_form(&fs, r"C:\My Long Data File Or Directory").unwrap();
        assert!(short.ends_with("~1"), "{short}");
        assert!(!short.starts_with(r"\\?\"));
    }

    #[test]
    fn test_round_trip() {
        let fs = volume();
        let original = r"C:\My Long Data File Or Directory\Some Report.docx";
        let short = to_short_form(&fs, original).unwrap();
        assert_eq!(short, r"C:\MYLONG~1\SOMERE~1.DOC");
        let long = to_long_form(&fs, &short).unwrap();
        assert_eq!(long, original);
    }

    #[test]
    fn test_long_form_input_keeps_prefix() {
        let fs = volume();
        let short = to_short_form(&fs, r"\\?\C:\My Long Data File Or Directory").unwrap();
        assert_eq!(short, r"\\?\C:\MYLONG~1");
        let long = to_long_form(&fs, &short).unwrap();
        assert_eq!(long, r"\\?\C:\My Long Data File Or Directory");
    }

    #[test]
    fn test_real_tilde_names_round_trip() {
        let mut fs = volume();
        fs.add_file(r"C:\report~1.txt", 1).unwrap();
        fs.add_directory(r"C:\Archive\BACKUP~2").unwrap();

        for original in [r"C:\report~1.txt", r"C:\Archive\BACKUP~2", r"\\?\C:\report~1.txt"] {
            let short = to_short_form(&fs, original).unwrap();
            assert_eq!(short, original);
            assert_eq!(to_long_form(&fs, &short).unwrap(), original);
        }
        assert_eq!(fs.open_searches(), 0);
    }

    #[test]
    fn test_eight_dot_three_names_are_unchanged() {
        let fs = volume();
        assert_eq!(to_short_form(&fs, r"C:\short").unwrap(), r"C:\short");
    }

    #[test]
    fn test_roots_skip_native_call() {
        let fs = MemoryFileSystem::new().without_short_names();
        assert_eq!(to_short_form(&fs, r"C:\").unwrap(), r"C:\");
        assert_eq!(to_long_form(&fs, r"\\server\share").unwrap(), r"\\server\share");
    }

    #[test]
    fn test_no_short_names_volume() {
        let mut fs = MemoryFileSystem::new().without_short_names();
        fs.add_directory(r"C:\My Long Directory").unwrap();
        let err = to_short_form(&fs, r"C:\My Long Directory").unwrap_err();
        assert!(matches!(err, Error::NotSupported { .. }));
    }

    #[test]
    fn test_missing_entry() {
        let fs = volume();
        let err = to_short_form(&fs, r"C:\Missing Directory").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_malformed_input() {
        let fs = volume();
        assert!(to_short_form(&fs, r"C:\a|b").unwrap_err().is_structural());
        assert!(to_long_form(&fs, "").unwrap_err().is_structural());
    }
}
