//! Configuration schema definitions.
//!
//! Every field is optional so that partial files and environment overrides
//! can be layered on top of each other.

use serde::{Deserialize, Serialize};

use crate::enumerate::EnumerationOptions;
use crate::error::Result;
use crate::path::{FullPathOptions, MAX_PATH};

/// Default length at which normalized paths receive the long-path prefix.
pub const DEFAULT_MAX_PATH: usize = MAX_PATH;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use longpath::config::{Config, EnumerationConfig};
///
/// let config = Config {
///     max_path: Some(200),
///     enumeration: Some(EnumerationConfig {
///         recursive: Some(true),
///         ..Default::default()
///     }),
///     ..Default::default()
/// };
/// assert_eq!(config.full_path_options().max_path, 200);
/// assert!(config.enumeration_options().recursive);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Length (in UTF-16 units) at which the long-path prefix is added.
    pub max_path: Option<usize>,

    /// Host name used for UNC conversion instead of the machine's name.
    pub host_name: Option<String>,

    /// Default enumeration flags.
    pub enumeration: Option<EnumerationConfig>,
}

/// Default enumeration flags. Unset flags keep the
/// [`EnumerationOptions`] defaults.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct EnumerationConfig {
    /// Descend into subdirectories.
    pub recursive: Option<bool>,
    /// Yield only files.
    pub files_only: Option<bool>,
    /// Yield only folders.
    pub folders_only: Option<bool>,
    /// Skip reparse points.
    pub skip_reparse_points: Option<bool>,
    /// Skip failing subtrees.
    pub continue_on_exception: Option<bool>,
    /// Do not retrieve short names.
    pub basic_search: Option<bool>,
    /// Request the large fetch buffer.
    pub large_cache: Option<bool>,
    /// Descend into directory symbolic links.
    pub follow_symbolic_links: Option<bool>,
}

impl Config {
    /// The built-in defaults, with every field set.
    #[must_use]
    pub fn defaults() -> Self {
        let options = EnumerationOptions::default();
        Self {
            max_path: Some(DEFAULT_MAX_PATH),
            host_name: None,
            enumeration: Some(EnumerationConfig {
                recursive: Some(options.recursive),
                files_only: Some(options.files_only),
                folders_only: Some(options.folders_only),
                skip_reparse_points: Some(options.skip_reparse_points),
                continue_on_exception: Some(options.continue_on_exception),
                basic_search: Some(options.basic_search),
                large_cache: Some(options.large_cache),
                follow_symbolic_links: Some(options.follow_symbolic_links),
            }),
        }
    }

    /// Parse a configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`](crate::Error::Configuration) if the
    /// text is not valid YAML or contains unknown fields.
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Normalizer options derived from this configuration.
    #[must_use]
    pub fn full_path_options(&self) -> FullPathOptions {
        FullPathOptions::default().with_max_path(self.max_path.unwrap_or(DEFAULT_MAX_PATH))
    }

    /// Enumeration options derived from this configuration.
    #[must_use]
    pub fn enumeration_options(&self) -> EnumerationOptions {
        self.enumeration
            .unwrap_or_default()
            .apply_to(EnumerationOptions::default())
    }

    /// The configured host name, if any.
    #[must_use]
    pub fn host_name(&self) -> Option<&str> {
        self.host_name.as_deref()
    }
}

impl EnumerationConfig {
    /// Overlay the set flags onto `options`.
    #[must_use]
    pub fn apply_to(&self, mut options: EnumerationOptions) -> EnumerationOptions {
        let flags = [
            (self.recursive, &mut options.recursive),
            (self.files_only, &mut options.files_only),
            (self.folders_only, &mut options.folders_only),
            (self.skip_reparse_points, &mut options.skip_reparse_points),
            (self.continue_on_exception, &mut options.continue_on_exception),
            (self.basic_search, &mut options.basic_search),
            (self.large_cache, &mut options.large_cache),
            (self.follow_symbolic_links, &mut options.follow_symbolic_links),
        ];
        for (value, slot) in flags {
            if let Some(value) = value {
                *slot = value;
            }
        }
        options
    }
}
