//! Template engine abstraction.
//!
//! This module defines the [`TemplateEngine`] trait, the seam between the
//! pipeline and whatever evaluates template bodies. The default
//! implementation is [`MiniJinjaEngine`], which provides Jinja2-compatible
//! syntax with loops, conditionals, includes and filters.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use minijinja::{AutoEscape, Environment, Error, ErrorKind, UndefinedBehavior, Value};

use super::discover::TemplateRef;
use super::filters::register_filters;
use crate::error::StencilError;
use crate::fs::FileSystem;
use crate::options::RenderOptions;
use crate::vars::VariableSet;

/// Extensions whose output is HTML-escaped when autoescaping is on.
pub const ESCAPED_EXTENSIONS: &[&str] = &[".html", ".xml"];

/// A template engine that renders templates with a variable set.
///
/// Engines handle:
/// - Loading template sources (and anything they include)
/// - Variable substitution and undefined-reference policy
/// - Template logic (loops, conditionals) and filters
pub trait TemplateEngine: Send + Sync {
    /// Renders a discovered template.
    ///
    /// # Errors
    ///
    /// [`StencilError::UndefinedVariable`] for undefined references in strict
    /// mode, [`StencilError::Render`] for everything else.
    fn render(&self, template: &TemplateRef, vars: &VariableSet) -> Result<String, StencilError>;

    /// Renders a template given as a string, for ad-hoc and test use.
    fn render_str(&self, source: &str, vars: &VariableSet) -> Result<String, StencilError>;
}

/// MiniJinja-based template engine.
///
/// Templates are loaded by their `/`-separated name relative to the base
/// directory, through the [`FileSystem`] the engine was built with, so
/// `{% include "partials/header.j2" %}` resolves against the same base.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use stencil_render::fs::MemoryFs;
/// use stencil_render::template::{MiniJinjaEngine, TemplateEngine};
/// use stencil_render::{RenderOptions, VariableSet};
///
/// let engine = MiniJinjaEngine::new("/t", &RenderOptions::default(), Arc::new(MemoryFs::new()));
/// let vars = VariableSet::new().with("name", "World");
/// let output = engine.render_str("Hello, {{ name }}!", &vars).unwrap();
/// assert_eq!(output, "Hello, World!");
/// ```
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Creates an engine loading templates from `base`.
    pub fn new(base: impl Into<PathBuf>, options: &RenderOptions, fs: Arc<dyn FileSystem>) -> Self {
        let base = base.into();
        let mut env = Environment::new();

        env.set_trim_blocks(options.trim_blocks);
        env.set_lstrip_blocks(options.lstrip_blocks);
        env.set_undefined_behavior(if options.strict {
            UndefinedBehavior::Strict
        } else {
            UndefinedBehavior::Chainable
        });

        if options.autoescape {
            let suffix = options.pattern.strip_suffix().map(str::to_string);
            env.set_auto_escape_callback(move |name: &str| {
                autoescape_for(name, suffix.as_deref())
            });
        } else {
            env.set_auto_escape_callback(|_: &str| AutoEscape::None);
        }

        env.set_loader(move |name: &str| load_template(fs.as_ref(), &base, name));
        register_filters(&mut env);

        Self { env }
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(&self, template: &TemplateRef, vars: &VariableSet) -> Result<String, StencilError> {
        let to_error = |e| StencilError::from_engine(template.path(), e);
        let tmpl = self.env.get_template(&template.name()).map_err(to_error)?;
        tmpl.render(Value::from_serialize(vars)).map_err(to_error)
    }

    fn render_str(&self, source: &str, vars: &VariableSet) -> Result<String, StencilError> {
        self.env
            .render_str(source, Value::from_serialize(vars))
            .map_err(|e| StencilError::from_engine("<inline>", e))
    }
}

/// Escaping policy for a template name.
///
/// Both the template name and its destination name (after stripping the
/// pattern suffix) are checked, so `index.html` and `index.html.j2` escape
/// alike.
pub fn autoescape_for(name: &str, strip_suffix: Option<&str>) -> AutoEscape {
    let lower = name.to_ascii_lowercase();
    let destination = strip_suffix
        .map(|s| s.to_ascii_lowercase())
        .and_then(|s| lower.strip_suffix(s.as_str()).map(str::to_string));

    let escaped = |candidate: &str| ESCAPED_EXTENSIONS.iter().any(|ext| candidate.ends_with(ext));

    if escaped(&lower) || destination.as_deref().is_some_and(escaped) {
        AutoEscape::Html
    } else {
        AutoEscape::None
    }
}

/// Loader backing [`MiniJinjaEngine`].
///
/// Names that climb out of `base` are treated as missing.
fn load_template(fs: &dyn FileSystem, base: &Path, name: &str) -> Result<Option<String>, Error> {
    let Some(path) = join_template_name(base, name) else {
        return Ok(None);
    };
    if !fs.is_file(&path) {
        return Ok(None);
    }
    fs.read_to_string(&path).map(Some).map_err(|e| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("could not read template {}", path.display()),
        )
        .with_source(e)
    })
}

fn join_template_name(base: &Path, name: &str) -> Option<PathBuf> {
    let mut path = base.to_path_buf();
    for segment in name.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => path.push(part),
            _ => return None,
        }
    }
    Some(path)
}
