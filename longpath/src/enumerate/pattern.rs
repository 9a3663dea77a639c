//! Search patterns for directory enumeration.

use std::fmt;

use globset::{GlobBuilder, GlobMatcher};

use crate::error::{Error, Result};
use crate::path::is_separator;

/// A file name pattern with `*` (any run) and `?` (any one character)
/// wildcards, matched case-insensitively.
///
/// `*.*` matches every name, including names without a dot. Every other
/// character is literal, so `[`, `{` and `!` carry no glob meaning.
///
/// # Examples
///
/// ```
/// use longpath::enumerate::SearchPattern;
///
/// let pattern = SearchPattern::new("*.TXT").unwrap();
/// assert!(pattern.matches("notes.txt"));
/// assert!(!pattern.matches("notes.md"));
///
/// assert!(SearchPattern::new("*.*").unwrap().is_match_all());
/// assert!(SearchPattern::new(r"dir\*").is_err());
/// ```
#[derive(Clone)]
pub struct SearchPattern {
    raw: String,
    matcher: Option<GlobMatcher>,
}

impl SearchPattern {
    /// The pattern text that matches every name.
    pub const MATCH_ALL: &'static str = "*";

    /// Parse a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the pattern is empty or contains a
    /// separator, a colon, a control character or one of `"<>|`.
    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(Error::invalid(pattern, "search pattern is empty"));
        }
        for c in pattern.chars() {
            if is_separator(c) {
                return Err(Error::invalid(
                    pattern,
                    "search pattern cannot contain a directory separator",
                ));
            }
            if u32::from(c) < 0x20 || matches!(c, '"' | '<' | '>' | '|' | ':') {
                return Err(Error::invalid(
                    pattern,
                    format!("illegal character '{}' in search pattern", c.escape_default()),
                ));
            }
        }

        if pattern == "*" || pattern == "*.*" {
            return Ok(Self {
                raw: pattern.to_string(),
                matcher: None,
            });
        }

        let glob = GlobBuilder::new(&escape_literals(pattern))
            .case_insensitive(true)
            .literal_separator(true)
            .backslash_escape(true)
            .build()
            .map_err(|e| Error::invalid(pattern, format!("invalid search pattern: {e}")))?;
        Ok(Self {
            raw: pattern.to_string(),
            matcher: Some(glob.compile_matcher()),
        })
    }

    /// The pattern that matches every name.
    #[must_use]
    pub fn match_all() -> Self {
        Self {
            raw: Self::MATCH_ALL.to_string(),
            matcher: None,
        }
    }

    /// The pattern text as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns `true` if the pattern matches every name.
    #[must_use]
    pub fn is_match_all(&self) -> bool {
        self.matcher.is_none()
    }

    /// Returns `true` if `name` matches the pattern.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.matcher
            .as_ref()
            .map_or(true, |matcher| matcher.is_match(name))
    }

    /// Returns `true` if either the long name or the 8.3 name of an entry
    /// matches, as a native search does. An empty `short_name` is ignored.
    #[must_use]
    pub fn matches_entry(&self, name: &str, short_name: &str) -> bool {
        self.matches(name) || (!short_name.is_empty() && self.matches(short_name))
    }
}

impl PartialEq for SearchPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for SearchPattern {}

impl Default for SearchPattern {
    fn default() -> Self {
        Self::match_all()
    }
}

impl fmt::Debug for SearchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SearchPattern").field(&self.raw).finish()
    }
}

impl fmt::Display for SearchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Escape the glob metacharacters that are plain name characters on
/// Windows. `*` and `?` stay wildcards.
fn escape_literals(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if matches!(c, '[' | ']' | '{' | '}' | '!') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
