//! Configuration for the longpath library.
//!
//! This module provides layered configuration with support for:
//! - A YAML user configuration file and explicit YAML files
//! - Environment variable overrides
//! - Programmatic configuration via builder pattern
//! - Validation of the merged result
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`LONGPATH_*`)
//! 3. Explicit files (via `ConfigBuilder::with_config_file`)
//! 4. User config (`~/.longpath/config.yaml`)
//! 5. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use longpath::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new().build().unwrap();
//! println!("long prefix from {} characters", config.full_path_options().max_path);
//! ```
//!
//! A user file looks like this:
//!
//! ```yaml
//! max_path: 260
//! host_name: FILESRV01
//! enumeration:
//!   recursive: true
//!   continue_on_exception: true
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource};
pub use merger::ConfigMerger;
pub use schema::{Config, EnumerationConfig, DEFAULT_MAX_PATH};
pub use validator::ConfigValidator;
