//! Builder for assembling a validated [`Config`] from all sources.

use std::path::{Path, PathBuf};

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::{ConfigLoader, ConfigSource};
use crate::config::merger::ConfigMerger;
use crate::config::schema::Config;
use crate::config::validator::ConfigValidator;
use crate::error::Result;

/// Builds a [`Config`] by merging defaults, files, the environment and
/// programmatic overrides, in that order of increasing precedence.
///
/// # Examples
///
/// ```
/// use longpath::config::{Config, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(Config { max_path: Some(200), ..Default::default() })
///     .build()
///     .unwrap();
///
/// assert_eq!(config.max_path, Some(200));
/// assert!(config.enumeration_options().basic_search);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    skip_files: bool,
    skip_env: bool,
    user_config_dir: Option<PathBuf>,
    config_files: Vec<PathBuf>,
    overrides: Vec<Config>,
}

impl ConfigBuilder {
    /// A builder that reads the user file and the environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Do not read any configuration file, including explicit ones.
    #[must_use]
    pub fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Do not read `LONGPATH_*` environment variables.
    #[must_use]
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Read the user configuration from `dir/config.yaml` instead of
    /// `~/.longpath/config.yaml`.
    #[must_use]
    pub fn with_user_config_dir(mut self, dir: &Path) -> Self {
        self.user_config_dir = Some(dir.to_path_buf());
        self
    }

    /// Add a configuration file that overrides the user configuration.
    /// Later files override earlier ones.
    #[must_use]
    pub fn with_config_file(mut self, path: &Path) -> Self {
        self.config_files.push(path.to_path_buf());
        self
    }

    /// Add programmatic overrides with the highest precedence.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides.push(config);
        self
    }

    /// Merge and validate all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or parsed, an environment
    /// variable is malformed, or the merged configuration is invalid.
    pub fn build(self) -> Result<Config> {
        let mut sources = vec![ConfigSource {
            path: PathBuf::from("<defaults>"),
            precedence: 0,
            config: Config::defaults(),
        }];

        if !self.skip_files {
            if let Some(user) = ConfigLoader::load_user_config(self.user_config_dir.as_deref())? {
                sources.push(user);
            }
            for path in &self.config_files {
                sources.push(ConfigSource {
                    path: path.clone(),
                    precedence: 2,
                    config: ConfigLoader::load_file(path)?,
                });
            }
        }

        let mut config = ConfigMerger::merge(sources);

        if !self.skip_env {
            EnvironmentConfig::apply_overrides(&mut config)?;
        }

        for overrides in &self.overrides {
            ConfigMerger::merge_into(&mut config, overrides);
        }

        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}
