//! # Stencil - batch template rendering from the command line
//!
//! The `stencil` binary wires [`stencil_render`] to a command line whose
//! every flag also reads an `INPUT_*` environment variable, so one binary
//! serves both interactive use and CI steps.
//!
//! ```text
//! stencil --template-path templates --output-path out \
//!         --variables-file vars.yaml --variables "replicas=3" --recursive
//! ```
//!
//! A run loads the variables file, then the inline variables (which win on
//! collision), renders every template found under the template path and
//! reports what was written.

pub mod cli;
pub mod config;
pub mod logging;
pub mod report;

use std::sync::Arc;

use anyhow::Context;
use stencil_render::fs::{FileSystem, RealFs};
use stencil_render::{Pipeline, RunReport};
use tracing::debug;

pub use cli::Args;
pub use config::Config;

/// Loads the variables and renders every template described by `config`.
pub fn run(config: &Config) -> anyhow::Result<RunReport> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFs);

    let vars = config
        .sources
        .load(fs.as_ref())
        .context("failed to load variables")?;
    debug!(keys = ?vars.keys().collect::<Vec<_>>(), "variables ready");

    let report = Pipeline::new(config.options.clone(), fs)
        .run(&config.template_path, &config.output_path, vars)
        .with_context(|| format!("failed to render {}", config.template_path.display()))?;

    if let Some(path) = &config.github_output {
        report::append_output(path, &report.written)?;
    }
    Ok(report)
}
