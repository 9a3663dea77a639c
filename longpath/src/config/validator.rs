//! Configuration validation.

use crate::config::schema::Config;
use crate::error::{Error, Result};
use crate::path::{is_separator, MAX_LONG_PATH};

/// Smallest accepted `max_path`: a drive root plus one character.
pub const MIN_MAX_PATH: usize = 4;

/// Longest accepted host name (DNS limit).
pub const MAX_HOST_NAME_LEN: usize = 255;

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use longpath::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::defaults()).unwrap();
///
/// let bad = Config { max_path: Some(1), ..Default::default() };
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first invalid field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(max_path) = config.max_path {
            Self::validate_max_path(max_path)?;
        }
        if let Some(ref host) = config.host_name {
            Self::validate_host_name(host)?;
        }
        Ok(())
    }

    fn validate_max_path(max_path: usize) -> Result<()> {
        if !(MIN_MAX_PATH..=MAX_LONG_PATH).contains(&max_path) {
            return Err(Error::Validation {
                field: "max_path".into(),
                message: format!("must be between {MIN_MAX_PATH} and {MAX_LONG_PATH}"),
            });
        }
        Ok(())
    }

    fn validate_host_name(host: &str) -> Result<()> {
        if host.trim().is_empty() {
            return Err(Error::Validation {
                field: "host_name".into(),
                message: "cannot be empty".into(),
            });
        }
        if host.len() > MAX_HOST_NAME_LEN {
            return Err(Error::Validation {
                field: "host_name".into(),
                message: format!("cannot exceed {MAX_HOST_NAME_LEN} characters"),
            });
        }
        if host.chars().any(|c| is_separator(c) || c.is_whitespace() || c.is_control()) {
            return Err(Error::Validation {
                field: "host_name".into(),
                message: "cannot contain separators, whitespace or control characters".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host(name: &str) -> Config {
        Config {
            host_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_empty_config() {
        assert!(ConfigValidator::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_max_path_bounds() {
        for ok in [4, 260, 32_767] {
            let config = Config {
                max_path: Some(ok),
                ..Default::default()
            };
            assert!(ConfigValidator::validate(&config).is_ok(), "{ok}");
        }
        for bad in [0, 3, 32_768] {
            let config = Config {
                max_path: Some(bad),
                ..Default::default()
            };
            let err = ConfigValidator::validate(&config).unwrap_err();
            assert!(matches!(err, Error::Validation { ref field, .. } if field == "max_path"));
        }
    }

    #[test]
    fn test_validate_host_name() {
        assert!(ConfigValidator::validate(&host("FILESRV-01")).is_ok());
        assert!(ConfigValidator::validate(&host("build.example.com")).is_ok());
        for bad in ["", "   ", r"a\b", "a/b", "two words"] {
            let err = ConfigValidator::validate(&host(bad)).unwrap_err();
            assert!(
                matches!(err, Error::Validation { ref field, .. } if field == "host_name"),
                "{bad:?}"
            );
        }
        assert!(ConfigValidator::validate(&host(&"h".repeat(256))).is_err());
    }
}
