//! Rendering templates to their destinations.
//!
//! [`Renderer`] pairs a [`TemplateEngine`] with the [`FileSystem`] output is
//! written to. Rendering always completes in memory before anything is
//! written, so a template that fails never leaves a partial file behind.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use super::discover::TemplateRef;
use super::engine::{MiniJinjaEngine, TemplateEngine};
use crate::error::StencilError;
use crate::fs::FileSystem;
use crate::options::RenderOptions;
use crate::vars::VariableSet;

/// Renders templates and writes the results.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use std::sync::Arc;
/// use stencil_render::fs::MemoryFs;
/// use stencil_render::template::{Renderer, TemplateRef};
/// use stencil_render::{RenderOptions, VariableSet};
///
/// let fs = Arc::new(MemoryFs::new().with_file("/t/motd.j2", "Welcome to {{ host }}"));
/// let renderer = Renderer::new("/t", &RenderOptions::default(), fs.clone());
///
/// let template = TemplateRef::new("/t/motd.j2", "/t").unwrap();
/// let vars = VariableSet::new().with("host", "build-01");
/// renderer.render_to(&template, &vars, Path::new("/out/motd")).unwrap();
///
/// assert_eq!(fs.contents("/out/motd").as_deref(), Some("Welcome to build-01"));
/// ```
pub struct Renderer {
    engine: Box<dyn TemplateEngine>,
    fs: Arc<dyn FileSystem>,
}

impl Renderer {
    /// Creates a renderer using [`MiniJinjaEngine`] with templates under `base`.
    pub fn new(base: impl Into<PathBuf>, options: &RenderOptions, fs: Arc<dyn FileSystem>) -> Self {
        let engine = MiniJinjaEngine::new(base, options, fs.clone());
        Self::with_engine(Box::new(engine), fs)
    }

    /// Creates a renderer with a custom template engine.
    pub fn with_engine(engine: Box<dyn TemplateEngine>, fs: Arc<dyn FileSystem>) -> Self {
        Self { engine, fs }
    }

    /// Renders `template` to a string.
    pub fn render(&self, template: &TemplateRef, vars: &VariableSet) -> Result<String, StencilError> {
        self.engine.render(template, vars)
    }

    /// Renders `template` and writes it to `destination`.
    ///
    /// Parent directories of `destination` are created as needed.
    ///
    /// # Errors
    ///
    /// Render errors as for [`render`](Self::render);
    /// [`StencilError::Write`] when the directory or file cannot be written.
    pub fn render_to(
        &self,
        template: &TemplateRef,
        vars: &VariableSet,
        destination: &Path,
    ) -> Result<PathBuf, StencilError> {
        let rendered = self.render(template, vars)?;

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() && !self.fs.is_dir(parent) {
                self.fs
                    .create_dir_all(parent)
                    .map_err(|e| StencilError::Write {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
            }
        }

        self.fs
            .write(destination, &rendered)
            .map_err(|e| StencilError::Write {
                path: destination.to_path_buf(),
                source: e,
            })?;

        debug!(
            template = %template.path().display(),
            destination = %destination.display(),
            bytes = rendered.len(),
            "wrote rendered template"
        );
        Ok(destination.to_path_buf())
    }
}
