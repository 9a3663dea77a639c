//! The host volume, searched through the Win32 find API.

#![allow(unsafe_code)]

use std::io;

use chrono::{DateTime, Utc};
use windows::core::PCWSTR;
use windows::Win32::Foundation::{ERROR_FILE_NOT_FOUND, ERROR_NO_MORE_FILES, FILETIME, HANDLE};
use windows::Win32::Storage::FileSystem::{
    FindClose, FindExInfoBasic, FindExInfoStandard, FindExSearchNameMatch, FindFirstFileExW,
    FindNextFileW, GetFileAttributesW, GetLongPathNameW, GetShortPathNameW, FIND_FIRST_EX_FLAGS,
    FIND_FIRST_EX_LARGE_FETCH, WIN32_FIND_DATAW,
};

use super::memory::is_short_name_compatible;
use super::{FindHints, NativeFileSystem};
use crate::enumerate::{filetime_to_utc, EntryRecord, FileAttributes, ReparseTag, SearchPattern};
use crate::error::{Error, Result};
use crate::path::{is_separator, root_length, DIRECTORY_SEPARATOR, MAX_PATH};

/// The host volume.
///
/// Searches go through `FindFirstFileExW`, so records carry the reparse tag
/// of every entry and, unless the search is basic, its 8.3 name. Short and
/// long names are translated with `GetShortPathNameW` and
/// `GetLongPathNameW`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

/// An open find handle. A search over a directory with no matching entry
/// holds no handle.
#[derive(Debug)]
pub struct StdSearch {
    handle: Option<HANDLE>,
    directory: String,
}

impl StdFileSystem {
    /// A handle to the host volume.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl NativeFileSystem for StdFileSystem {
    type Search = StdSearch;

    fn find_first(
        &self,
        directory: &str,
        pattern: &SearchPattern,
        hints: FindHints,
    ) -> Result<(StdSearch, Option<EntryRecord>)> {
        let query = wide(&format!(
            "{}{DIRECTORY_SEPARATOR}{}",
            directory.trim_end_matches(is_separator),
            pattern.as_str()
        ));
        let level = if hints.basic_search {
            FindExInfoBasic
        } else {
            FindExInfoStandard
        };
        let flags = if hints.large_cache {
            FIND_FIRST_EX_LARGE_FETCH
        } else {
            FIND_FIRST_EX_FLAGS(0)
        };

        let mut data = WIN32_FIND_DATAW::default();
        // SAFETY: `query` is NUL-terminated and `data` outlives the call.
        let opened = unsafe {
            FindFirstFileExW(
                PCWSTR(query.as_ptr()),
                level,
                std::ptr::addr_of_mut!(data).cast(),
                FindExSearchNameMatch,
                None,
                flags,
            )
        };

        let search = |handle| StdSearch {
            handle,
            directory: directory.to_string(),
        };
        match opened {
            Ok(handle) => Ok((search(Some(handle)), Some(record_from_find_data(&data)))),
            // An existing directory with no matching entry
            Err(e)
                if e.code() == ERROR_FILE_NOT_FOUND.to_hresult()
                    && self.directory_exists(directory) =>
            {
                Ok((search(None), None))
            }
            Err(e) => Err(Error::from_io(directory, io::Error::from(e), true)),
        }
    }

    fn find_next(&self, search: &mut StdSearch) -> Result<Option<EntryRecord>> {
        let Some(handle) = search.handle else {
            return Ok(None);
        };
        let mut data = WIN32_FIND_DATAW::default();
        // SAFETY: `handle` is an open find handle owned by `search`.
        match unsafe { FindNextFileW(handle, &mut data) } {
            Ok(()) => Ok(Some(record_from_find_data(&data))),
            Err(e) if e.code() == ERROR_NO_MORE_FILES.to_hresult() => Ok(None),
            Err(e) => Err(Error::from_io(search.directory.as_str(), io::Error::from(e), true)),
        }
    }

    fn find_close(&self, search: StdSearch) {
        if let Some(handle) = search.handle {
            // SAFETY: the handle came from `FindFirstFileExW` and is closed once.
            if let Err(e) = unsafe { FindClose(handle) } {
                log::warn!("failed to close search in '{}': {e}", search.directory);
            }
        }
    }

    fn long_to_short(&self, path: &str) -> Result<String> {
        // SAFETY: `input` is NUL-terminated and `buffer` is a valid slice.
        let short = translate(path, |input, buffer| unsafe { GetShortPathNameW(input, buffer) })?;
        if short == path && has_long_segment(path) {
            return Err(Error::NotSupported {
                path: path.to_string(),
                reason: "the volume does not keep 8.3 short names".to_string(),
            });
        }
        Ok(short)
    }

    fn short_to_long(&self, path: &str) -> Result<String> {
        // SAFETY: `input` is NUL-terminated and `buffer` is a valid slice.
        translate(path, |input, buffer| unsafe { GetLongPathNameW(input, buffer) })
    }

    fn directory_exists(&self, path: &str) -> bool {
        let input = wide(path);
        // SAFETY: `input` is NUL-terminated.
        let raw = unsafe { GetFileAttributesW(PCWSTR(input.as_ptr())) };
        let attributes = FileAttributes::from_bits(raw);
        attributes.is_valid() && attributes.contains(FileAttributes::DIRECTORY)
    }
}

/// Run a `Get*PathNameW` call, growing the buffer until the result fits.
fn translate(path: &str, call: impl Fn(PCWSTR, Option<&mut [u16]>) -> u32) -> Result<String> {
    let input = wide(path);
    let mut buffer = vec![0u16; MAX_PATH];
    loop {
        let written = call(PCWSTR(input.as_ptr()), Some(&mut buffer)) as usize;
        if written == 0 {
            return Err(Error::from_io(path, io::Error::last_os_error(), false));
        }
        if written < buffer.len() {
            return Ok(String::from_utf16_lossy(&buffer[..written]));
        }
        buffer.resize(written, 0);
    }
}

/// Returns `true` if a segment below the root needs an 8.3 alias.
fn has_long_segment(path: &str) -> bool {
    path[root_length(path)..]
        .split(is_separator)
        .any(|segment| !segment.is_empty() && !is_short_name_compatible(segment))
}

fn record_from_find_data(data: &WIN32_FIND_DATAW) -> EntryRecord {
    let attributes = FileAttributes::from_bits(data.dwFileAttributes);
    // dwReserved0 holds the reparse tag only for reparse points
    let tag = if attributes.contains(FileAttributes::REPARSE_POINT) {
        ReparseTag::from_raw(data.dwReserved0)
    } else {
        ReparseTag::None
    };

    let record = EntryRecord::new(from_wide(&data.cFileName), attributes)
        .with_size((u64::from(data.nFileSizeHigh) << 32) | u64::from(data.nFileSizeLow))
        .with_times(
            to_utc(data.ftCreationTime),
            to_utc(data.ftLastAccessTime),
            to_utc(data.ftLastWriteTime),
        )
        .with_reparse_tag(tag);
    let alternate = from_wide(&data.cAlternateFileName);
    if alternate.is_empty() {
        record
    } else {
        record.with_alternate_file_name(alternate)
    }
}

fn to_utc(time: FILETIME) -> DateTime<Utc> {
    let ticks = (u64::from(time.dwHighDateTime) << 32) | u64::from(time.dwLowDateTime);
    filetime_to_utc(ticks).unwrap_or_default()
}

fn wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

fn from_wide(buffer: &[u16]) -> String {
    let end = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..end])
}
