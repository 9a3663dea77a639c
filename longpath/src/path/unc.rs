//! Conversion of local drive paths into administrative-share UNC paths.

use std::ffi::OsString;

use super::classify::{classify_unchecked, root_length, PathForm};
use super::normalize::check_path_chars;
use super::{is_separator, ALT_DIRECTORY_SEPARATOR, LONG_PATH_PREFIX, LONG_PATH_UNC_PREFIX};
use crate::error::{Error, Result};

/// Convert a local drive path into a UNC path on this machine.
///
/// The host name comes from the operating system via the `hostname` crate.
///
/// # Errors
///
/// Returns [`Error::Io`] if the host name cannot be read,
/// [`Error::Validation`] if it is not valid Unicode, or any error of
/// [`local_to_unc_with_host`].
pub fn local_to_unc(path: &str) -> Result<String> {
    let host = hostname::get().map_err(|source| Error::Io {
        path: path.to_string(),
        source,
    })?;
    local_to_unc_with_host(path, &host_name_from_os(host)?)
}

fn host_name_from_os(host: OsString) -> Result<String> {
    host.into_string().map_err(|raw| {
        log::warn!("host name {raw:?} is not valid Unicode; set host_name explicitly");
        Error::Validation {
            field: "host_name".to_string(),
            message: format!("the local host name {raw:?} is not valid Unicode"),
        }
    })
}

/// Convert a local drive path into a UNC path on `host`, using the
/// administrative `X$` share of the drive.
///
/// Long-form input produces long-form UNC output. UNC input is returned
/// unchanged.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if the path is relative, drive-relative
/// or a device path, contains illegal characters, or if `host` is empty or
/// contains a separator.
///
/// # Examples
///
/// ```
/// use longpath::path::local_to_unc_with_host;
///
/// assert_eq!(local_to_unc_with_host(r"C:\Data", "HOST").unwrap(), r"\\HOST\C$\Data");
/// assert_eq!(
///     local_to_unc_with_host(r"\\?\d:\Data", "HOST").unwrap(),
///     r"\\?\UNC\HOST\D$\Data"
/// );
/// assert_eq!(
///     local_to_unc_with_host(r"\\server\share\x", "HOST").unwrap(),
///     r"\\server\share\x"
/// );
/// ```
pub fn local_to_unc_with_host(path: &str, host: &str) -> Result<String> {
    check_path_chars(path, false)?;
    validate_host(host)?;

    match classify_unchecked(path) {
        PathForm::UncRooted => Ok(path.to_string()),
        PathForm::DriveRooted => Ok(format!(r"\\{}", share_path(path, host)?)),
        PathForm::LongForm => {
            let body = &path[LONG_PATH_PREFIX.len()..];
            Ok(format!("{LONG_PATH_UNC_PREFIX}{}", share_path(body, host)?))
        }
        PathForm::Relative | PathForm::DeviceRooted => Err(Error::invalid(
            path,
            "only drive-rooted paths can be converted to UNC",
        )),
    }
}

/// `HOST\X$\rest` for a drive path `X:\rest` or `X:`.
fn share_path(drive_path: &str, host: &str) -> Result<String> {
    if drive_path.len() > 2 && root_length(drive_path) != 3 {
        return Err(Error::invalid(
            drive_path,
            "drive-relative paths cannot be converted to UNC",
        ));
    }
    let letter = drive_path[..1].to_ascii_uppercase();
    let rest = drive_path[2..].replace(ALT_DIRECTORY_SEPARATOR, "\\");
    Ok(format!(r"{host}\{letter}${rest}"))
}

fn validate_host(host: &str) -> Result<()> {
    if host.trim().is_empty() {
        return Err(Error::invalid(host, "host name is empty"));
    }
    if host.contains(is_separator) {
        return Err(Error::invalid(host, "host name contains a separator"));
    }
    Ok(())
}
