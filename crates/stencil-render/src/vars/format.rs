//! Variables file format resolution.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::StencilError;

/// On-disk format of a variables file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariablesFormat {
    /// `KEY=VALUE` lines with dotenv quoting and comments.
    Env,
    Yaml,
    Json,
}

impl VariablesFormat {
    /// Picks the format for `path`.
    ///
    /// An explicit format always wins. Otherwise `.env` (including a file
    /// named exactly `.env`) is a key/value file, `.yaml`/`.yml` is YAML, and
    /// `.json` or anything unrecognized is JSON.
    pub fn resolve(path: &Path, explicit: Option<VariablesFormat>) -> Self {
        if let Some(format) = explicit {
            return format;
        }

        if path.file_name().is_some_and(|name| name == ".env") {
            return VariablesFormat::Env;
        }

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("env") => VariablesFormat::Env,
            Some("yaml") | Some("yml") => VariablesFormat::Yaml,
            _ => VariablesFormat::Json,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VariablesFormat::Env => "env",
            VariablesFormat::Yaml => "yaml",
            VariablesFormat::Json => "json",
        }
    }
}

impl fmt::Display for VariablesFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariablesFormat {
    type Err = StencilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "env" | "dotenv" => Ok(VariablesFormat::Env),
            "yaml" | "yml" => Ok(VariablesFormat::Yaml),
            "json" => Ok(VariablesFormat::Json),
            other => Err(StencilError::config(format!(
                "unknown variables file format '{}' (expected env, yaml or json)",
                other
            ))),
        }
    }
}
