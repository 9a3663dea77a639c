//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::{Config, EnumerationConfig};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use longpath::config::{Config, ConfigMerger};
///
/// let low = Config { max_path: Some(260), ..Default::default() };
/// let high = Config { max_path: Some(200), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.max_path, Some(200));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into a final config.
    ///
    /// Sources are applied in order of ascending precedence.
    #[must_use]
    pub fn merge(mut sources: Vec<ConfigSource>) -> Config {
        sources.sort_by_key(|s| s.precedence);
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// Fields set in `source` overwrite `target`; the enumeration flags are
    /// merged flag by flag.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.max_path.is_some() {
            target.max_path = source.max_path;
        }

        if source.host_name.is_some() {
            target.host_name.clone_from(&source.host_name);
        }

        if let Some(ref enumeration) = source.enumeration {
            target.enumeration = Some(match target.enumeration {
                Some(ref existing) => Self::merge_enumeration(existing, enumeration),
                None => *enumeration,
            });
        }
    }

    fn merge_enumeration(
        target: &EnumerationConfig,
        source: &EnumerationConfig,
    ) -> EnumerationConfig {
        EnumerationConfig {
            recursive: source.recursive.or(target.recursive),
            files_only: source.files_only.or(target.files_only),
            folders_only: source.folders_only.or(target.folders_only),
            skip_reparse_points: source.skip_reparse_points.or(target.skip_reparse_points),
            continue_on_exception: source
                .continue_on_exception
                .or(target.continue_on_exception),
            basic_search: source.basic_search.or(target.basic_search),
            large_cache: source.large_cache.or(target.large_cache),
            follow_symbolic_links: source
                .follow_symbolic_links
                .or(target.follow_symbolic_links),
        }
    }
}
