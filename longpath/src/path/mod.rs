//! Windows path handling that works the same on every host.
//!
//! All functions in this module operate on path *strings* using the Win32
//! conventions (`\` separators, drive letters, `\\server\share` roots and the
//! `\\?\` long-path prefix). Nothing here touches the file system; the
//! process current directory is only consulted when a relative path is
//! resolved without an explicit base directory.
//!
//! # Key Concepts
//!
//! ## Classification
//!
//! [`classify`] inspects the leading characters of a path and returns its
//! [`PathForm`]. It never fails for non-empty input.
//!
//! ## Normalization
//!
//! [`get_full_path`] converts any path into a [`CanonicalPath`] by:
//! - Rejecting illegal characters and malformed roots
//! - Resolving relative paths against a base directory
//! - Resolving `.` and `..` segments and redundant separators
//! - Adding the `\\?\` prefix when the result is too long for legacy APIs
//!
//! Re-normalizing a canonical path returns it unchanged.
//!
//! # Examples
//!
//! ```
//! use longpath::path::{classify, get_full_path, get_regular_path, PathForm};
//!
//! assert_eq!(classify(r"\\server\share").unwrap(), PathForm::UncRooted);
//!
//! let full = get_full_path(r"C:\Windows\.\System32\..\Temp", None).unwrap();
//! assert_eq!(full.as_str(), r"C:\Windows\Temp");
//!
//! assert_eq!(get_regular_path(r"\\?\UNC\server\share\x").unwrap(), r"\\server\share\x");
//! ```

pub mod classify;
pub mod components;
pub mod normalize;
pub mod short_name;
mod types;
pub mod unc;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use classify::{
    classify, get_path_root, is_long_path, is_path_rooted, is_unc_path, root_length, PathForm,
};
pub use components::{
    change_extension, get_directory_name, get_directory_name_without_root, get_extension,
    get_file_name, get_file_name_without_extension, get_suffixed_directory_name,
    get_suffixed_directory_name_without_root, has_extension,
};
pub use normalize::{
    add_trailing_separator, combine, combine_all, get_full_path, get_full_path_with,
    get_long_path, get_regular_path, remove_trailing_separator, FullPathOptions,
};
pub use short_name::{to_long_form, to_short_form};
pub use types::{CanonicalPath, PathFormat};
pub use unc::{local_to_unc, local_to_unc_with_host};

/// The primary directory separator.
pub const DIRECTORY_SEPARATOR: char = '\\';

/// The alternate directory separator, accepted on input.
pub const ALT_DIRECTORY_SEPARATOR: char = '/';

/// Separates a drive letter from the rest of the path.
pub const VOLUME_SEPARATOR: char = ':';

/// Prefix that lifts the legacy length limit for drive paths.
pub const LONG_PATH_PREFIX: &str = r"\\?\";

/// Prefix that lifts the legacy length limit for UNC paths.
pub const LONG_PATH_UNC_PREFIX: &str = r"\\?\UNC\";

/// Leading text of a plain UNC path.
pub const UNC_PREFIX: &str = r"\\";

/// Prefix of the Win32 device namespace.
pub const DEVICE_PREFIX: &str = r"\\.\";

/// Prefix of paths into the NT object manager root.
pub const GLOBAL_ROOT_PREFIX: &str = r"\\?\GLOBALROOT\";

/// Prefix of volume GUID paths.
pub const VOLUME_PREFIX: &str = r"\\?\Volume{";

/// The legacy path length limit.
pub const MAX_PATH: usize = 260;

/// The longest path the long-path APIs accept.
pub const MAX_LONG_PATH: usize = 32_767;

/// Returns `true` for either directory separator.
#[must_use]
pub const fn is_separator(c: char) -> bool {
    c == DIRECTORY_SEPARATOR || c == ALT_DIRECTORY_SEPARATOR
}

/// Length of a path in UTF-16 code units, the unit Win32 limits are
/// expressed in.
pub(crate) fn wide_len(path: &str) -> usize {
    path.encode_utf16().count()
}

/// Byte-level variant of [`is_separator`].
pub(crate) const fn is_separator_byte(b: u8) -> bool {
    b == b'\\' || b == b'/'
}

/// Matches an ASCII prefix where `\` in the prefix accepts either separator
/// and letters compare case-insensitively.
pub(crate) fn has_prefix(path: &str, prefix: &str) -> bool {
    let path = path.as_bytes();
    let prefix = prefix.as_bytes();
    if path.len() < prefix.len() {
        return false;
    }
    path.iter().zip(prefix).all(|(&p, &q)| {
        if q == b'\\' {
            is_separator_byte(p)
        } else {
            p.eq_ignore_ascii_case(&q)
        }
    })
}

/// Returns `true` when `path` starts with a drive letter and a colon.
pub(crate) fn starts_with_drive(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
