//! Template discovery, evaluation and writing.
//!
//! ## Flow
//!
//! 1. [`discover`] lists the templates under a root as [`TemplateRef`]s.
//! 2. [`crate::output::resolve_output_path`] maps each one to a destination.
//! 3. [`Renderer::render_to`] evaluates it through a [`TemplateEngine`] and
//!    writes the result.
//!
//! ## Template Syntax
//!
//! Templates use Jinja2 syntax via MiniJinja: `{{ var }}`, `{% if %}`,
//! `{% for %}`, `{% include %}`, filters. Stencil adds one filter:
//!
//! | Filter | Effect |
//! |--------|--------|
//! | `bool_str` | `true` / `false` for booleans, plain text otherwise |
//!
//! Whitespace control (`trim_blocks`, `lstrip_blocks`), undefined handling
//! (strict vs. chainable) and autoescaping come from
//! [`RenderOptions`](crate::RenderOptions).

mod discover;
mod engine;
pub mod filters;
mod renderer;

pub use discover::{discover, discovery_base, TemplateRef};
pub use engine::{autoescape_for, MiniJinjaEngine, TemplateEngine, ESCAPED_EXTENSIONS};
pub use renderer::Renderer;
