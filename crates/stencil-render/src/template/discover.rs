//! Template discovery.
//!
//! [`discover`] turns a root path into the list of templates to render. Each
//! result is a [`TemplateRef`] that remembers the base directory it was found
//! under, so output paths and engine lookups are computed against the same
//! anchor.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::StencilError;
use crate::fs::FileSystem;
use crate::pattern::MatchPattern;

/// A discovered template file.
///
/// For a file at `/repo/templates/nginx/site.conf.j2` discovered under
/// `/repo/templates`:
///
/// ```rust,ignore
/// TemplateRef {
///     path: "/repo/templates/nginx/site.conf.j2",
///     base: "/repo/templates",
///     relative: "nginx/site.conf.j2",
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRef {
    path: PathBuf,
    base: PathBuf,
    relative: PathBuf,
}

impl TemplateRef {
    /// Builds a reference for `path` found under `base`.
    ///
    /// Returns `None` when `path` is not below `base`.
    pub fn new(path: impl Into<PathBuf>, base: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let base = base.into();
        let relative = path.strip_prefix(&base).ok()?.to_path_buf();
        if relative.as_os_str().is_empty() {
            return None;
        }
        Some(Self {
            path,
            base,
            relative,
        })
    }

    /// Reference for a root that is itself a file.
    ///
    /// The base degenerates to the file's containing directory.
    pub fn single_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let base = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let relative = path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.clone());
        Self {
            path,
            base,
            relative,
        }
    }

    /// Full location of the template file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The directory templates are loaded from.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Location relative to [`base`](Self::base).
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Directory part of [`relative`](Self::relative); empty directly under base.
    pub fn relative_dir(&self) -> &Path {
        self.relative.parent().unwrap_or_else(|| Path::new(""))
    }

    pub fn file_name(&self) -> String {
        self.relative
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Name the engine loads this template by: the relative path with `/`
    /// separators on every platform.
    pub fn name(&self) -> String {
        self.relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// The directory templates under `root` are loaded from.
///
/// `root` itself for a directory, its parent for a single file.
pub fn discovery_base(root: &Path, fs: &dyn FileSystem) -> PathBuf {
    if fs.is_file(root) {
        TemplateRef::single_file(root).base
    } else {
        root.to_path_buf()
    }
}

/// Finds the templates under `root`.
///
/// - `root` is a file: that one file, whatever the pattern says.
/// - `root` is a directory: files whose name matches `pattern`, in `root`
///   only, or at any depth when `recursive` is set.
///
/// Results are sorted by path.
///
/// # Errors
///
/// [`StencilError::FileNotFound`] when `root` does not exist, and
/// [`StencilError::Io`] when the directory cannot be listed.
pub fn discover(
    root: &Path,
    pattern: &MatchPattern,
    recursive: bool,
    fs: &dyn FileSystem,
) -> Result<Vec<TemplateRef>, StencilError> {
    if fs.is_file(root) {
        debug!(root = %root.display(), "template root is a single file");
        return Ok(vec![TemplateRef::single_file(root)]);
    }

    if !fs.is_dir(root) {
        return Err(StencilError::FileNotFound {
            path: root.to_path_buf(),
        });
    }

    let files = fs
        .list_files(root, recursive)
        .map_err(|e| StencilError::Io {
            path: root.to_path_buf(),
            source: e,
        })?;

    let mut templates: Vec<TemplateRef> = files
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| pattern.matches(name))
        })
        .filter_map(|path| TemplateRef::new(path, root))
        .collect();

    templates.sort_by(|a, b| a.path.cmp(&b.path));

    debug!(
        root = %root.display(),
        %pattern,
        recursive,
        count = templates.len(),
        "discovered templates"
    );
    Ok(templates)
}
