//! The pipeline driver.
//!
//! [`Pipeline::run`] sequences one batch: classify the output target, attach
//! the environment, discover templates, then resolve, render and write each
//! one. What happens when a template fails is decided once per run by the
//! [`FailurePolicy`].
//!
//! ```rust
//! use std::path::Path;
//! use std::sync::Arc;
//! use stencil_render::env::MockEnv;
//! use stencil_render::fs::MemoryFs;
//! use stencil_render::{Pipeline, RenderOptions, VariableSet};
//!
//! let fs = Arc::new(
//!     MemoryFs::new()
//!         .with_file("/t/app.conf.j2", "name={{ name }}")
//!         .with_file("/t/nginx/site.conf.j2", "listen {{ port }};"),
//! );
//! let vars = VariableSet::new().with("name", "api").with("port", 8080i64);
//!
//! let report = Pipeline::new(RenderOptions::default().recursive(true), fs.clone())
//!     .with_env(MockEnv::new())
//!     .run(Path::new("/t"), Path::new("/out"), vars)
//!     .unwrap();
//!
//! assert_eq!(report.written.len(), 2);
//! assert_eq!(fs.contents("/out/nginx/site.conf").as_deref(), Some("listen 8080;"));
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::env::{attach_environment, EnvReader, RealEnv, ENV_KEY};
use crate::error::StencilError;
use crate::fs::{FileSystem, RealFs};
use crate::options::RenderOptions;
use crate::output::{resolve_output_path, OutputTarget};
use crate::template::{discover, discovery_base, Renderer, TemplateRef};
use crate::vars::VariableSet;

/// What to do when a single template fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the run on the first failure.
    FailFast,
    /// Log and record the failure, then continue with the next template.
    BestEffort,
}

impl FailurePolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::BestEffort
        }
    }

    /// Applies the policy to one failure.
    ///
    /// Errors that are not scoped to a single template are returned under
    /// either policy.
    pub fn handle(&self, failure: TemplateFailure, report: &mut RunReport) -> Result<(), StencilError> {
        match self {
            FailurePolicy::BestEffort if failure.error.is_per_template() => {
                warn!(
                    template = %failure.template.display(),
                    error = %failure.error,
                    "template failed, continuing"
                );
                report.failures.push(failure);
                Ok(())
            }
            _ => {
                error!(
                    template = %failure.template.display(),
                    error = %failure.error,
                    "template failed, aborting"
                );
                Err(failure.error)
            }
        }
    }
}

/// Outcome of rendering one template.
#[derive(Debug)]
pub enum RenderResult {
    Written(PathBuf),
    Failed(TemplateFailure),
}

/// A template that could not be rendered or written.
#[derive(Debug)]
pub struct TemplateFailure {
    pub template: PathBuf,
    pub error: StencilError,
}

/// Summary of a completed run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Destinations written, in processing order.
    pub written: Vec<PathBuf>,
    /// Failures recovered under [`FailurePolicy::BestEffort`].
    pub failures: Vec<TemplateFailure>,
}

impl RunReport {
    /// True when every discovered template was written.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives a batch render.
pub struct Pipeline {
    options: RenderOptions,
    fs: Arc<dyn FileSystem>,
    env: Box<dyn EnvReader>,
}

impl Pipeline {
    /// Creates a pipeline reading the real process environment.
    pub fn new(options: RenderOptions, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            options,
            fs,
            env: Box::new(RealEnv),
        }
    }

    /// Creates a pipeline over the real filesystem and environment.
    pub fn real(options: RenderOptions) -> Self {
        Self::new(options, Arc::new(RealFs))
    }

    /// Replaces the environment source.
    pub fn with_env(mut self, env: impl EnvReader + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn policy(&self) -> FailurePolicy {
        FailurePolicy::from_strict(self.options.strict)
    }

    /// Renders every template under `root` into `output`.
    ///
    /// # Errors
    ///
    /// Discovery and output-root failures always abort. Per-template failures
    /// abort only under [`FailurePolicy::FailFast`]; otherwise they are
    /// collected in [`RunReport::failures`].
    pub fn run(&self, root: &Path, output: &Path, mut vars: VariableSet) -> Result<RunReport, StencilError> {
        let policy = self.policy();
        let templates = discover(
            root,
            &self.options.pattern,
            self.options.recursive,
            self.fs.as_ref(),
        )
        .inspect_err(|e| error!(root = %root.display(), error = %e, "template discovery failed"))?;

        let target = OutputTarget::classify(output, self.fs.as_ref());
        self.prepare_target(&target)?;

        if !target.is_dir() && templates.len() > 1 {
            warn!(
                output = %output.display(),
                count = templates.len(),
                "several templates share one output file; the last one wins"
            );
        }

        if self.options.expose_environment {
            let shadowed = attach_environment(&mut vars, self.env.as_ref());
            if shadowed.is_some() {
                warn!(key = ENV_KEY, "user variable shadowed by the environment mapping");
            }
        }

        let renderer = Renderer::new(
            discovery_base(root, self.fs.as_ref()),
            &self.options,
            self.fs.clone(),
        );

        info!(
            root = %root.display(),
            output = %output.display(),
            templates = templates.len(),
            ?policy,
            "rendering templates"
        );

        let mut report = RunReport::default();
        for template in &templates {
            match self.render_one(&renderer, template, &target, &vars) {
                RenderResult::Written(path) => report.written.push(path),
                RenderResult::Failed(failure) => policy.handle(failure, &mut report)?,
            }
        }

        info!(
            written = report.written.len(),
            failed = report.failures.len(),
            "render run finished"
        );
        Ok(report)
    }

    /// Resolves, renders and writes a single template.
    pub fn render_one(
        &self,
        renderer: &Renderer,
        template: &TemplateRef,
        target: &OutputTarget,
        vars: &VariableSet,
    ) -> RenderResult {
        let destination = resolve_output_path(template, target, &self.options.pattern);
        debug!(
            template = %template.path().display(),
            destination = %destination.display(),
            "resolved destination"
        );

        match renderer.render_to(template, vars, &destination) {
            Ok(path) => {
                info!(
                    template = %template.path().display(),
                    destination = %path.display(),
                    "rendered"
                );
                RenderResult::Written(path)
            }
            Err(error) => RenderResult::Failed(TemplateFailure {
                template: template.path().to_path_buf(),
                error,
            }),
        }
    }

    fn prepare_target(&self, target: &OutputTarget) -> Result<(), StencilError> {
        let OutputTarget::Directory(dir) = target else {
            return Ok(());
        };
        if self.fs.is_dir(dir) {
            return Ok(());
        }

        debug!(output = %dir.display(), "creating output directory");
        self.fs.create_dir_all(dir).map_err(|e| {
            error!(output = %dir.display(), error = %e, "cannot create output directory");
            StencilError::Write {
                path: dir.clone(),
                source: e,
            }
        })
    }
}
