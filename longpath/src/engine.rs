//! A configured entry point bundling a volume with a [`Config`].

use crate::config::Config;
use crate::enumerate::{enumerate_with, EnumerationOptions, Enumerator, Projection};
use crate::error::Result;
use crate::native::NativeFileSystem;
use crate::path::{
    self, get_full_path_with, local_to_unc_with_host, CanonicalPath, FullPathOptions, PathForm,
    PathFormat,
};

/// Path operations against one volume, using configured defaults.
///
/// The configured `max_path` only decides whether
/// [`get_full_path`](Self::get_full_path) adds the long-path prefix. Short
/// name translation and enumeration always reach the volume in long form
/// and present their results in the caller's convention, so it has no
/// effect on them.
///
/// # Examples
///
/// ```
/// use longpath::config::Config;
/// use longpath::enumerate::AsPath;
/// use longpath::native::MemoryFileSystem;
/// use longpath::PathEngine;
///
/// let mut fs = MemoryFileSystem::new();
/// fs.add_file(r"C:\Program Files\App\app.exe", 1024).unwrap();
///
/// let config = Config {
///     host_name: Some("WORKSTATION".to_string()),
///     ..Config::defaults()
/// };
/// let engine = PathEngine::new(fs, config);
///
/// assert_eq!(
///     engine.local_to_unc(r"C:\Program Files").unwrap(),
///     r"\\WORKSTATION\C$\Program Files"
/// );
/// assert_eq!(engine.to_short_form(r"C:\Program Files").unwrap(), r"C:\PROGRA~1");
///
/// let files: Vec<String> = engine
///     .enumerate(r"C:\Program Files\App", "*.exe", AsPath)
///     .unwrap()
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(files, [r"C:\Program Files\App\app.exe"]);
/// ```
#[derive(Debug)]
pub struct PathEngine<F> {
    fs: F,
    config: Config,
    full_path_options: FullPathOptions,
    enumeration_options: EnumerationOptions,
}

impl<F: NativeFileSystem> PathEngine<F> {
    /// Bundle `fs` with `config`.
    #[must_use]
    pub fn new(fs: F, config: Config) -> Self {
        let full_path_options = config.full_path_options();
        let enumeration_options = config.enumeration_options();
        Self {
            fs,
            config,
            full_path_options,
            enumeration_options,
        }
    }

    /// The volume.
    #[must_use]
    pub fn file_system(&self) -> &F {
        &self.fs
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The configured enumeration defaults.
    #[must_use]
    pub fn enumeration_options(&self) -> EnumerationOptions {
        self.enumeration_options
    }

    /// Classify `path`. See [`path::classify`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`](crate::Error::InvalidPath) for empty
    /// input.
    pub fn classify(&self, path: &str) -> Result<PathForm> {
        path::classify(path)
    }

    /// Normalize `path` with the configured `max_path`. See
    /// [`path::get_full_path`].
    ///
    /// # Errors
    ///
    /// Same as [`path::get_full_path_with`].
    pub fn get_full_path(&self, path: &str, base_dir: Option<&str>) -> Result<CanonicalPath> {
        get_full_path_with(path, base_dir, &self.full_path_options)
    }

    /// Strip the long-path prefix. See [`path::get_regular_path`].
    ///
    /// # Errors
    ///
    /// Same as [`path::get_regular_path`].
    pub fn get_regular_path(&self, path: &str) -> Result<String> {
        path::get_regular_path(path)
    }

    /// Convert a local path to a UNC path on the configured host, or on this
    /// machine when no host is configured.
    ///
    /// # Errors
    ///
    /// Same as [`path::local_to_unc`].
    pub fn local_to_unc(&self, path: &str) -> Result<String> {
        match self.config.host_name() {
            Some(host) => local_to_unc_with_host(path, host),
            None => path::local_to_unc(path),
        }
    }

    /// Translate to the 8.3 form. See [`path::to_short_form`].
    ///
    /// The result keeps the prefix convention of `path` whatever the
    /// configured `max_path`.
    ///
    /// # Errors
    ///
    /// Same as [`path::to_short_form`].
    pub fn to_short_form(&self, path: &str) -> Result<String> {
        path::to_short_form(&self.fs, path)
    }

    /// Translate to the long form. See [`path::to_long_form`].
    ///
    /// The result keeps the prefix convention of `path` whatever the
    /// configured `max_path`.
    ///
    /// # Errors
    ///
    /// Same as [`path::to_long_form`].
    pub fn to_long_form(&self, path: &str) -> Result<String> {
        path::to_long_form(&self.fs, path)
    }

    /// Enumerate with the configured options.
    ///
    /// Records carry both the regular and the long full path, so the
    /// configured `max_path` does not apply.
    ///
    /// # Errors
    ///
    /// Same as [`enumerate_with`].
    pub fn enumerate<P: Projection>(
        &self,
        path: &str,
        pattern: &str,
        projection: P,
    ) -> Result<Enumerator<'_, F, P>> {
        self.enumerate_with(
            path,
            pattern,
            self.enumeration_options,
            PathFormat::RelativePath,
            projection,
        )
    }

    /// Enumerate with explicit options and path format.
    ///
    /// # Errors
    ///
    /// Same as [`enumerate_with`].
    pub fn enumerate_with<P: Projection>(
        &self,
        path: &str,
        pattern: &str,
        options: EnumerationOptions,
        format: PathFormat,
        projection: P,
    ) -> Result<Enumerator<'_, F, P>> {
        enumerate_with(&self.fs, path, pattern, options, format, projection)
    }
}
