//! Filename match patterns.
//!
//! One pattern does two jobs: it selects template files during discovery and
//! tells the output resolver which suffix to strip from their names.

use std::fmt;
use std::str::FromStr;

use glob::{MatchOptions, Pattern};

use crate::error::StencilError;

/// Default pattern for template discovery.
pub const DEFAULT_PATTERN: &str = "*.j2";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// A compiled filename glob such as `*.j2`.
///
/// A bare extension (`.j2`) is accepted and treated as `*.j2`.
#[derive(Debug, Clone)]
pub struct MatchPattern {
    raw: String,
    glob: Pattern,
}

impl MatchPattern {
    /// Compiles `pattern`.
    ///
    /// # Errors
    ///
    /// [`StencilError::Configuration`] if the pattern is empty or not a valid glob.
    pub fn new(pattern: &str) -> Result<Self, StencilError> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(StencilError::config("file pattern must not be empty"));
        }

        let raw = if is_bare_extension(trimmed) {
            format!("*{}", trimmed)
        } else {
            trimmed.to_string()
        };

        let glob = Pattern::new(&raw).map_err(|e| {
            StencilError::config(format!("invalid file pattern '{}': {}", raw, e))
        })?;

        Ok(Self { raw, glob })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether `file_name` (a single path component) matches.
    pub fn matches(&self, file_name: &str) -> bool {
        self.glob.matches_with(file_name, MATCH_OPTIONS)
    }

    /// The literal suffix after a leading `*`, if the pattern has one.
    ///
    /// `*.j2` gives `.j2`; `*` and `template.*` give `None`.
    pub fn strip_suffix(&self) -> Option<&str> {
        self.raw.strip_prefix('*').filter(|suffix| !suffix.is_empty())
    }

    /// Applies the suffix rule to a file name.
    ///
    /// The name is returned unchanged when the pattern has no leading
    /// wildcard, when the name does not end with the suffix, or when stripping
    /// would leave nothing.
    pub fn destination_name<'a>(&self, file_name: &'a str) -> &'a str {
        match self.strip_suffix().and_then(|s| file_name.strip_suffix(s)) {
            Some(stem) if !stem.is_empty() => stem,
            _ => file_name,
        }
    }
}

impl Default for MatchPattern {
    fn default() -> Self {
        Self {
            raw: DEFAULT_PATTERN.to_string(),
            glob: Pattern::new(DEFAULT_PATTERN).unwrap_or_default(),
        }
    }
}

impl PartialEq for MatchPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for MatchPattern {}

impl fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for MatchPattern {
    type Err = StencilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

fn is_bare_extension(pattern: &str) -> bool {
    pattern.starts_with('.')
        && pattern.len() > 1
        && !pattern.contains(['*', '?', '[', '/'])
}
