//! Output destinations.
//!
//! [`OutputTarget::classify`] decides once per run whether the configured
//! output path is a directory tree or a single file. [`resolve_output_path`]
//! then maps every template onto its destination without touching the
//! filesystem.
//!
//! ## Directory targets
//!
//! ```text
//! templates/                 out/
//! ├── app.conf.j2      →     ├── app.conf
//! └── nginx/                 └── nginx/
//!     └── site.conf.j2 →         └── site.conf
//! ```
//!
//! ## File targets
//!
//! Every template renders to the same file and the last one written wins.
//! This is intended for the common single-template case.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::fs::FileSystem;
use crate::pattern::MatchPattern;
use crate::template::TemplateRef;

/// Where rendered output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Render into a tree mirroring the template layout.
    Directory(PathBuf),
    /// Render every template into this one file.
    File(PathBuf),
}

impl OutputTarget {
    /// Classifies `path`.
    ///
    /// Existing directories, paths ending in a separator and non-existent
    /// paths without an extension are directories. Existing files and
    /// non-existent paths with an extension are files.
    pub fn classify(path: &Path, fs: &dyn FileSystem) -> Self {
        let owned = path.to_path_buf();
        if fs.is_dir(path) {
            return OutputTarget::Directory(owned);
        }
        if fs.is_file(path) {
            return OutputTarget::File(owned);
        }

        let raw = path.as_os_str().to_string_lossy();
        if raw.ends_with('/') || raw.ends_with(MAIN_SEPARATOR) || path.extension().is_none() {
            OutputTarget::Directory(owned)
        } else {
            OutputTarget::File(owned)
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            OutputTarget::Directory(path) | OutputTarget::File(path) => path,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, OutputTarget::Directory(_))
    }
}

/// Computes where `template` is written.
///
/// For a directory target the template's directory relative to its base is
/// preserved and the pattern suffix is stripped from the file name, so
/// `root/sub/y.tpl` with `*.tpl` into `out/` becomes `out/sub/y`. A file
/// target is returned verbatim.
pub fn resolve_output_path(
    template: &TemplateRef,
    target: &OutputTarget,
    pattern: &MatchPattern,
) -> PathBuf {
    match target {
        OutputTarget::File(path) => path.clone(),
        OutputTarget::Directory(dir) => {
            let file_name = template.file_name();
            let dest_name = pattern.destination_name(&file_name);
            dir.join(template.relative_dir()).join(dest_name)
        }
    }
}
