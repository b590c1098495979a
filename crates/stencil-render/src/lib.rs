//! # Stencil Render - Batch Template Rendering
//!
//! `stencil-render` renders a tree of Jinja templates against one variable
//! set assembled from several sources, writing the results to a mirrored
//! directory tree or a single file.
//!
//! This crate is the engine behind the `stencil` command, but has no
//! dependency on the command line and can be embedded directly.
//!
//! ## Core Concepts
//!
//! - [`VariableSet`]: merged mapping of names to typed [`Value`]s
//! - [`VariableSources`]: a variables file plus an inline string, loaded and merged
//! - [`MatchPattern`]: filename glob for discovery and suffix stripping
//! - [`OutputTarget`]: directory tree or single file
//! - [`Pipeline`]: discover, resolve, render and write, under a [`FailurePolicy`]
//!
//! ## Quick Start
//!
//! ```rust
//! use std::path::Path;
//! use std::sync::Arc;
//! use stencil_render::env::MockEnv;
//! use stencil_render::fs::MemoryFs;
//! use stencil_render::{Pipeline, RenderOptions, VariableSources};
//!
//! let fs = Arc::new(
//!     MemoryFs::new()
//!         .with_file("/vars.env", "REPLICAS=3\nDEBUG=no\n")
//!         .with_file("/t/deploy.yaml.j2", "replicas: {{ REPLICAS }}\ndebug: {{ DEBUG | bool_str }}\n"),
//! );
//!
//! let vars = VariableSources::new()
//!     .file("/vars.env")
//!     .inline("REPLICAS=5")
//!     .load(fs.as_ref())
//!     .unwrap();
//!
//! let report = Pipeline::new(RenderOptions::default(), fs.clone())
//!     .with_env(MockEnv::new())
//!     .run(Path::new("/t"), Path::new("/out"), vars)
//!     .unwrap();
//!
//! assert!(report.is_clean());
//! assert_eq!(
//!     fs.contents("/out/deploy.yaml").as_deref(),
//!     Some("replicas: 5\ndebug: false")
//! );
//! ```
//!
//! ## Failure Handling
//!
//! Configuration, missing files and unparseable variable sources always
//! abort. Per-template failures (undefined variables in strict mode, syntax
//! errors, unwritable destinations) abort under [`FailurePolicy::FailFast`]
//! and are collected in the [`RunReport`] under [`FailurePolicy::BestEffort`].
//!
//! ## Modules
//!
//! - [`vars`]: typed values, coercion, loading and merging
//! - [`template`]: discovery, engine and writer
//! - [`output`]: output target classification and path resolution
//! - [`fs`], [`env`]: filesystem and environment seams

pub mod env;
mod error;
pub mod fs;
mod options;
pub mod output;
mod pattern;
mod pipeline;
pub mod template;
pub mod vars;

pub use error::StencilError;
pub use options::RenderOptions;
pub use output::{resolve_output_path, OutputTarget};
pub use pattern::{MatchPattern, DEFAULT_PATTERN};
pub use pipeline::{FailurePolicy, Pipeline, RenderResult, RunReport, TemplateFailure};
pub use template::{discover, TemplateRef};
pub use vars::{coerce, merge, Value, VariableSet, VariableSources, VariablesFormat};
