//! Environment variable handling for configuration overrides.
//!
//! This module provides support for `LONGPATH_*` environment variables that
//! override configuration file values.

use std::env;

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Overrides the length at which the long-path prefix is added.
pub const MAX_PATH_ENV: &str = "LONGPATH_MAX_PATH";
/// Overrides the host name used for UNC conversion.
pub const HOST_NAME_ENV: &str = "LONGPATH_HOST_NAME";
/// Overrides the default `recursive` flag.
pub const RECURSIVE_ENV: &str = "LONGPATH_RECURSIVE";
/// Overrides the default `continue_on_exception` flag.
pub const CONTINUE_ON_EXCEPTION_ENV: &str = "LONGPATH_CONTINUE_ON_EXCEPTION";
/// Overrides the default `skip_reparse_points` flag.
pub const SKIP_REPARSE_POINTS_ENV: &str = "LONGPATH_SKIP_REPARSE_POINTS";
/// Overrides the default `basic_search` flag.
pub const BASIC_SEARCH_ENV: &str = "LONGPATH_BASIC_SEARCH";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use longpath::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns an error if any environment variable value is invalid
    /// (e.g., non-numeric length, invalid boolean).
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(value) = env::var(MAX_PATH_ENV) {
            config.max_path = Some(value.trim().parse().map_err(|_| Error::Validation {
                field: MAX_PATH_ENV.into(),
                message: "Must be a positive integer".into(),
            })?);
        }

        if let Ok(host) = env::var(HOST_NAME_ENV) {
            config.host_name = Some(host);
        }

        Self::apply_enumeration_overrides(config)
    }

    fn apply_enumeration_overrides(config: &mut Config) -> Result<()> {
        let mut enumeration = config.enumeration.unwrap_or_default();
        let mut modified = false;

        for (name, slot) in [
            (RECURSIVE_ENV, &mut enumeration.recursive),
            (
                CONTINUE_ON_EXCEPTION_ENV,
                &mut enumeration.continue_on_exception,
            ),
            (SKIP_REPARSE_POINTS_ENV, &mut enumeration.skip_reparse_points),
            (BASIC_SEARCH_ENV, &mut enumeration.basic_search),
        ] {
            if let Ok(value) = env::var(name) {
                *slot = Some(Self::parse_bool(name, &value)?);
                modified = true;
            }
        }

        if modified {
            config.enumeration = Some(enumeration);
        }
        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}
