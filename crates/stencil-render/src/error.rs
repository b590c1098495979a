//! Error types for variable loading, discovery and rendering.
//!
//! [`StencilError`] is the single error type returned by every operation in
//! this crate. Variants map one-to-one onto the failure kinds a run can hit,
//! so callers can decide fatality by kind (see [`StencilError::is_per_template`]).

use std::io;
use std::path::PathBuf;

/// Error type for all stencil operations.
#[derive(Debug, thiserror::Error)]
pub enum StencilError {
    /// A required option is missing or an option value is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A variables file or template path does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// A variable source could not be parsed.
    #[error("failed to parse {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// Strict mode render referenced a variable that is not set.
    #[error("undefined variable in template {}: {message}", template.display())]
    UndefinedVariable { template: PathBuf, message: String },

    /// Any other template evaluation failure (syntax, unknown filter, ...).
    #[error("failed to render template {}: {message}", template.display())]
    Render { template: PathBuf, message: String },

    /// Destination could not be created or written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Filesystem error outside of writing (e.g. listing the template root).
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StencilError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a parse error for the named source.
    pub fn parse(source_name: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    /// Maps an engine error onto the error kinds of this crate.
    ///
    /// Undefined references become [`StencilError::UndefinedVariable`];
    /// everything else becomes [`StencilError::Render`].
    pub fn from_engine(template: impl Into<PathBuf>, err: minijinja::Error) -> Self {
        let template = template.into();
        let message = err.to_string();
        match err.kind() {
            minijinja::ErrorKind::UndefinedError => Self::UndefinedVariable { template, message },
            _ => Self::Render { template, message },
        }
    }

    /// Whether this error belongs to a single template rather than the run.
    ///
    /// Only these errors may be recovered under best-effort mode.
    pub fn is_per_template(&self) -> bool {
        matches!(
            self,
            Self::UndefinedVariable { .. } | Self::Render { .. } | Self::Write { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StencilError::FileNotFound {
            path: PathBuf::from("vars.yaml"),
        };
        assert!(err.to_string().contains("file not found"));
        assert!(err.to_string().contains("vars.yaml"));
    }

    #[test]
    fn test_from_engine_undefined() {
        let mj_err = minijinja::Error::new(minijinja::ErrorKind::UndefinedError, "missing");
        let err = StencilError::from_engine("a.j2", mj_err);
        assert!(matches!(err, StencilError::UndefinedVariable { .. }));
        assert!(err.to_string().contains("a.j2"));
    }

    #[test]
    fn test_from_engine_syntax() {
        let mj_err = minijinja::Error::new(minijinja::ErrorKind::SyntaxError, "unexpected end");
        let err = StencilError::from_engine("a.j2", mj_err);
        assert!(matches!(err, StencilError::Render { .. }));
    }

    #[test]
    fn test_per_template_classification() {
        let write = StencilError::Write {
            path: PathBuf::from("out/a"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(write.is_per_template());
        assert!(!StencilError::config("template_path is required").is_per_template());
        assert!(!StencilError::parse("inline variables", "no tokens").is_per_template());
    }
}
