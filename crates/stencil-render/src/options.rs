//! Rendering options.

use crate::pattern::MatchPattern;

/// Options controlling discovery, rendering and failure handling.
///
/// Defaults match the action inputs: `*.j2`, non-recursive, best-effort,
/// block trimming and lstrip on, environment exposed, extension-keyed
/// autoescaping on.
///
/// ```rust
/// use stencil_render::RenderOptions;
///
/// let options = RenderOptions::default().recursive(true).strict(true);
/// assert!(options.recursive && options.strict);
/// assert!(options.trim_blocks);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Filename glob for discovery and suffix stripping.
    pub pattern: MatchPattern,
    /// Search subdirectories of the root.
    pub recursive: bool,
    /// Undefined variables fail the render, and any failure aborts the run.
    pub strict: bool,
    /// Remove the first newline after a block tag.
    pub trim_blocks: bool,
    /// Strip whitespace before a block tag at the start of a line.
    pub lstrip_blocks: bool,
    /// Attach the process environment as the reserved `env` variable.
    pub expose_environment: bool,
    /// HTML-escape output of `.html` and `.xml` templates.
    pub autoescape: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            pattern: MatchPattern::default(),
            recursive: false,
            strict: false,
            trim_blocks: true,
            lstrip_blocks: true,
            expose_environment: true,
            autoescape: true,
        }
    }
}

impl RenderOptions {
    pub fn pattern(mut self, pattern: MatchPattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn trim_blocks(mut self, trim_blocks: bool) -> Self {
        self.trim_blocks = trim_blocks;
        self
    }

    pub fn lstrip_blocks(mut self, lstrip_blocks: bool) -> Self {
        self.lstrip_blocks = lstrip_blocks;
        self
    }

    pub fn expose_environment(mut self, expose: bool) -> Self {
        self.expose_environment = expose;
        self
    }

    pub fn autoescape(mut self, autoescape: bool) -> Self {
        self.autoescape = autoescape;
        self
    }
}
