//! Variable sources: typed values, coercion, loading and merging.
//!
//! ## Sources
//!
//! | Source | Entry point | Typing |
//! |--------|-------------|--------|
//! | `.json` / unknown extension | [`load_file`] | already typed |
//! | `.yaml` / `.yml` | [`load_file`] | already typed |
//! | `.env` | [`load_file`] | every value through [`coerce`] |
//! | inline JSON object | [`load_str`] | already typed |
//! | inline `key=value` tokens | [`load_str`] | every value through [`coerce_inline`] |
//!
//! ## Precedence
//!
//! Sets are combined with [`merge`], earliest lowest. The pipeline loads the
//! variables file first and the inline string second, so inline values win.

mod format;
mod loader;
mod merge;
mod set;
mod sources;
mod value;

pub use format::VariablesFormat;
pub use loader::{load_file, load_str, parse_content};
pub use merge::merge;
pub use set::VariableSet;
pub use sources::VariableSources;
pub use value::{coerce, coerce_inline, is_truthy, Value, FALSY, TRUTHY};
