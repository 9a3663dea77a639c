#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # longpath
//!
//! Windows path canonicalization, 8.3 short name translation and directory
//! enumeration without the legacy 260 character limit.
//!
//! Path strings are handled with Win32 semantics on every host. Everything
//! that touches a volume goes through the [`NativeFileSystem`] trait, so the
//! same code runs against the host volume (`native::StdFileSystem` on
//! Windows) or an in-memory one ([`native::MemoryFileSystem`]).
//!
//! ## Core Types
//!
//! - [`CanonicalPath`] and [`PathForm`]: normalized paths and their topology
//! - [`EntryRecord`] and [`EnumerationOptions`]: directory entries and walk flags
//! - [`PathEngine`]: a volume bundled with a [`Config`]
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use longpath::enumerate::{enumerate, AsPath};
//! use longpath::native::MemoryFileSystem;
//! use longpath::path::{get_full_path, PathForm};
//! use longpath::EnumerationOptions;
//!
//! let full = get_full_path(r"C:\Users\..\Windows\.\notepad.exe", None).unwrap();
//! assert_eq!(full.as_str(), r"C:\Windows\notepad.exe");
//! assert_eq!(full.form(), PathForm::DriveRooted);
//!
//! let mut fs = MemoryFileSystem::new();
//! fs.add_file(r"C:\Windows\notepad.exe", 200_000).unwrap();
//! fs.add_file(r"C:\Windows\System32\cmd.exe", 300_000).unwrap();
//!
//! let options = EnumerationOptions::default()
//!     .with_recursive(true)
//!     .with_files_only(true);
//! let exes: Vec<String> = enumerate(&fs, r"C:\Windows", "*.exe", options, AsPath)
//!     .unwrap()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(exes, [r"C:\Windows\notepad.exe", r"C:\Windows\System32\cmd.exe"]);
//! ```

pub mod config;
pub mod engine;
pub mod enumerate;
pub mod error;
pub mod logging;
pub mod native;
pub mod path;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder};
pub use engine::PathEngine;
pub use enumerate::{EntryRecord, EnumerationOptions, FileAttributes, ReparseTag};
pub use error::{Error, ErrorCategory, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use native::NativeFileSystem;
pub use path::{CanonicalPath, PathForm, PathFormat};
