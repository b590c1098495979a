//! The configured set of variable sources for a run.

use std::path::PathBuf;

use tracing::info;

use super::format::VariablesFormat;
use super::loader::{load_file, load_str};
use super::merge::merge;
use super::set::VariableSet;
use crate::error::StencilError;
use crate::fs::FileSystem;

/// Variable sources in priority order: file first, inline string second.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSources {
    pub file: Option<PathBuf>,
    pub file_format: Option<VariablesFormat>,
    pub inline: Option<String>,
}

impl VariableSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn file_format(mut self, format: VariablesFormat) -> Self {
        self.file_format = Some(format);
        self
    }

    pub fn inline(mut self, text: impl Into<String>) -> Self {
        self.inline = Some(text.into());
        self
    }

    /// Loads every configured source and merges them, inline values winning.
    ///
    /// Any failure here is fatal to the run: nothing has been rendered yet.
    pub fn load(&self, fs: &dyn FileSystem) -> Result<VariableSet, StencilError> {
        let mut sets = Vec::with_capacity(2);

        if let Some(path) = &self.file {
            let vars = load_file(path, self.file_format, fs)?;
            info!(path = %path.display(), count = vars.len(), "loaded variables file");
            sets.push(vars);
        }

        if let Some(text) = self.inline.as_deref().filter(|t| !t.trim().is_empty()) {
            let vars = load_str(text)?;
            info!(count = vars.len(), "loaded inline variables");
            sets.push(vars);
        }

        Ok(merge(sets))
    }
}
