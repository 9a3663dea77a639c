//! Common test utilities for integration tests.
//!
//! This module provides fixture builders for in-memory volumes and helpers
//! for collecting enumeration results.

use longpath::enumerate::{enumerate, AsPath};
use longpath::native::MemoryFileSystem;
use longpath::{EnumerationOptions, Result};

/// Builder for an in-memory volume.
///
/// # Examples
///
/// ```no_run
/// # use common::VolumeFixture;
/// let fs = VolumeFixture::new()
///     .file(r"C:\data\a.txt", 10)
///     .dir(r"C:\data\empty")
///     .build();
/// ```
#[allow(dead_code)]
pub struct VolumeFixture {
    fs: MemoryFileSystem,
}

#[allow(dead_code)]
impl VolumeFixture {
    /// An empty volume with short name generation.
    pub fn new() -> Self {
        Self {
            fs: MemoryFileSystem::new(),
        }
    }

    /// An empty volume that keeps no short names.
    pub fn without_short_names() -> Self {
        Self {
            fs: MemoryFileSystem::new().without_short_names(),
        }
    }

    /// Adds a directory.
    pub fn dir(mut self, path: &str) -> Self {
        self.fs.add_directory(path).unwrap();
        self
    }

    /// Adds a file of `size` bytes.
    pub fn file(mut self, path: &str, size: u64) -> Self {
        self.fs.add_file(path, size).unwrap();
        self
    }

    /// Adds a junction.
    pub fn junction(mut self, path: &str) -> Self {
        self.fs.add_junction(path).unwrap();
        self
    }

    /// Adds a directory symbolic link.
    pub fn dir_symlink(mut self, path: &str) -> Self {
        self.fs.add_symlink(path, true).unwrap();
        self
    }

    /// Denies listing of an existing directory.
    pub fn deny(mut self, path: &str) -> Self {
        self.fs.deny_access(path).unwrap();
        self
    }

    /// Finishes the volume.
    pub fn build(self) -> MemoryFileSystem {
        self.fs
    }
}

/// A small project tree used by several suites:
///
/// ```text
/// C:\project
/// ├── readme.txt
/// ├── build.log
/// ├── src
/// │   ├── main.txt
/// │   └── lib
/// │       └── util.txt
/// └── docs
///     └── guide.txt
/// ```
#[allow(dead_code)]
pub fn project_volume() -> VolumeFixture {
    VolumeFixture::new()
        .file(r"C:\project\readme.txt", 100)
        .file(r"C:\project\build.log", 200)
        .file(r"C:\project\src\main.txt", 300)
        .file(r"C:\project\src\lib\util.txt", 400)
        .file(r"C:\project\docs\guide.txt", 500)
}

/// Collects every result of an enumeration projected to paths.
#[allow(dead_code)]
pub fn collect_paths(
    fs: &MemoryFileSystem,
    path: &str,
    pattern: &str,
    options: EnumerationOptions,
) -> Vec<Result<String>> {
    enumerate(fs, path, pattern, options, AsPath)
        .unwrap()
        .collect()
}

/// Like [`collect_paths`], panicking on the first error.
#[allow(dead_code)]
pub fn paths(
    fs: &MemoryFileSystem,
    path: &str,
    pattern: &str,
    options: EnumerationOptions,
) -> Vec<String> {
    collect_paths(fs, path, pattern, options)
        .into_iter()
        .collect::<Result<_>>()
        .unwrap()
}
