//! Error types for the longpath library.
//!
//! This module provides the error hierarchy shared by the path normalizer,
//! the short/long name translator and the enumeration engine, using
//! `thiserror` for ergonomic error handling. Every path-related variant
//! carries the offending path for diagnostics.

use std::fmt;

use thiserror::Error;

/// Result type alias for operations that may fail with a longpath error.
///
/// # Examples
///
/// ```
/// use longpath::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(260)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the longpath library.
#[derive(Debug, Error)]
pub enum Error {
    /// A path string is malformed or contains illegal characters.
    ///
    /// Raised before any native call is attempted and never retried.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The invalid path.
        path: String,
        /// The reason the path is invalid.
        reason: String,
    },

    /// A drive, directory or file segment does not exist.
    #[error("path not found: {path}")]
    PathNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A directory to be searched does not exist.
    #[error("directory not found: {path}")]
    DirectoryNotFound {
        /// The directory that was not found.
        path: String,
    },

    /// Permission denied by a native call.
    #[error("permission denied: {path}")]
    PermissionDenied {
        /// The path that could not be accessed.
        path: String,
    },

    /// The operation is unavailable on the target volume.
    #[error("operation not supported for '{path}': {reason}")]
    NotSupported {
        /// The path the operation was attempted on.
        path: String,
        /// Why the operation is unavailable.
        reason: String,
    },

    /// An entry changed between two dependent native calls.
    #[error("entry changed during the operation '{path}': {details}")]
    TransientRace {
        /// The path of the entry that changed.
        path: String,
        /// Details about the race.
        details: String,
    },

    /// A native I/O call failed for a reason not covered above.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The path the call was made on.
        path: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration value failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),
}

/// Broad classification of an [`Error`].
///
/// Callers that only need to know *what kind* of failure happened can match
/// on the category instead of the individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed or illegal path string.
    Structural,
    /// Drive, directory or file absent.
    NotFound,
    /// Permission failure on a native call.
    AccessDenied,
    /// Operation unavailable on the target volume.
    NotSupported,
    /// Entry mutated between two dependent native calls.
    TransientRace,
    /// Other native I/O failure.
    Io,
    /// Invalid configuration.
    Configuration,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structural => write!(f, "structural"),
            Self::NotFound => write!(f, "not-found"),
            Self::AccessDenied => write!(f, "access-denied"),
            Self::NotSupported => write!(f, "not-supported"),
            Self::TransientRace => write!(f, "transient-race"),
            Self::Io => write!(f, "io"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

impl Error {
    /// Shorthand for building an [`Error::InvalidPath`].
    pub(crate) fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Map a `std::io::Error` raised for `path` onto the error taxonomy.
    ///
    /// `not_found_is_directory` selects between [`Error::DirectoryNotFound`]
    /// and [`Error::PathNotFound`] for missing entries.
    #[must_use]
    pub fn from_io(path: impl Into<String>, err: std::io::Error, not_found_is_directory: bool) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound if not_found_is_directory => {
                Self::DirectoryNotFound { path }
            }
            std::io::ErrorKind::NotFound => Self::PathNotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::Unsupported => Self::NotSupported {
                path,
                reason: err.to_string(),
            },
            _ => Self::Io { path, source: err },
        }
    }

    /// The category this error belongs to.
    ///
    /// # Examples
    ///
    /// ```
    /// use longpath::{Error, ErrorCategory};
    ///
    /// let err = Error::PermissionDenied { path: r"C:\secret".to_string() };
    /// assert_eq!(err.category(), ErrorCategory::AccessDenied);
    /// ```
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidPath { .. } => ErrorCategory::Structural,
            Self::PathNotFound { .. } | Self::DirectoryNotFound { .. } => ErrorCategory::NotFound,
            Self::PermissionDenied { .. } => ErrorCategory::AccessDenied,
            Self::NotSupported { .. } => ErrorCategory::NotSupported,
            Self::TransientRace { .. } => ErrorCategory::TransientRace,
            Self::Io { .. } => ErrorCategory::Io,
            Self::Validation { .. } | Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }

    /// The offending path, when the error concerns one.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::InvalidPath { path, .. }
            | Self::PathNotFound { path }
            | Self::DirectoryNotFound { path }
            | Self::PermissionDenied { path }
            | Self::NotSupported { path, .. }
            | Self::TransientRace { path, .. }
            | Self::Io { path, .. } => Some(path),
            Self::Validation { .. } | Self::Configuration(_) => None,
        }
    }

    /// Check if error indicates a path does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use longpath::Error;
    ///
    /// let err = Error::DirectoryNotFound { path: r"C:\missing".to_string() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }

    /// Check if error is permission-related.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// Check if error is a structural path error.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::InvalidPath { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_path_error() {
        let err = Error::invalid(r"C:\a|b", "illegal character '|'");
        let display = format!("{err}");
        assert!(display.contains("invalid path"));
        assert!(display.contains(r"C:\a|b"));
        assert!(display.contains("illegal character"));
        assert!(err.is_structural());
    }

    #[test]
    fn test_not_found_errors() {
        let dir = Error::DirectoryNotFound {
            path: r"C:\missing".to_string(),
        };
        let file = Error::PathNotFound {
            path: r"C:\missing.txt".to_string(),
        };
        assert!(dir.is_not_found());
        assert!(file.is_not_found());
        assert!(format!("{dir}").contains("directory not found"));
        assert_eq!(file.path(), Some(r"C:\missing.txt"));
    }

    #[test]
    fn test_transient_race_error() {
        let err = Error::TransientRace {
            path: r"C:\MYLONG~1".to_string(),
            details: "entry deleted".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::TransientRace);
        assert!(format!("{err}").contains("MYLONG~1"));
    }

    #[test]
    fn test_from_io_mapping() {
        let err = Error::from_io(
            r"C:\d",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            true,
        );
        assert!(matches!(err, Error::DirectoryNotFound { .. }));

        let err = Error::from_io(
            r"C:\f",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            false,
        );
        assert!(matches!(err, Error::PathNotFound { .. }));

        let err = Error::from_io(
            r"C:\f",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no"),
            false,
        );
        assert!(err.is_permission_denied());

        let err = Error::from_io(
            r"C:\f",
            std::io::Error::new(std::io::ErrorKind::Other, "boom"),
            false,
        );
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.path(), Some(r"C:\f"));
    }

    #[test]
    fn test_validation_error_has_no_path() {
        let err = Error::Validation {
            field: "max_path".to_string(),
            message: "must be at least 4".to_string(),
        };
        assert_eq!(err.path(), None);
        assert_eq!(err.category(), ErrorCategory::Configuration);
        let display = format!("{err}");
        assert!(display.contains("validation error"));
        assert!(display.contains("max_path"));
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::NotSupported.to_string(), "not-supported");
        assert_eq!(ErrorCategory::Structural.to_string(), "structural");
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<u16> {
            Err(Error::invalid("", "empty"))
        }

        assert!(returns_result().is_err());
    }
}
