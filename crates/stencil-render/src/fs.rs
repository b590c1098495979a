//! Filesystem abstraction for testability.
//!
//! Every disk access made while loading variables, discovering templates,
//! loading template sources and writing output goes through [`FileSystem`].
//! [`RealFs`] talks to the operating system; [`MemoryFs`] keeps everything in
//! memory so path algebra and failure policies can be tested without touching
//! disk.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use walkdir::WalkDir;

/// Abstraction over the filesystem operations stencil needs.
pub trait FileSystem: Send + Sync {
    /// Whether `path` exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Whether `path` exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Lists the files below `root`, sorted by path.
    ///
    /// With `recursive` false only the immediate children of `root` are
    /// listed. Directories themselves are never returned.
    fn list_files(&self, root: &Path, recursive: bool) -> io::Result<Vec<PathBuf>>;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Writes `contents` to `path`, replacing any existing file.
    ///
    /// The parent directory must already exist.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

// === Real implementation ===

/// Filesystem backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl FileSystem for RealFs {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn list_files(&self, root: &Path, recursive: bool) -> io::Result<Vec<PathBuf>> {
        let max_depth = if recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| io::Error::other(e.to_string()))?;
            // symlinks are listed when they resolve to a file
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if is_file {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

// === In-memory implementation for testing ===

#[derive(Debug, Default)]
struct MemoryState {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
}

impl MemoryState {
    fn add_dir_chain(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }
}

/// In-memory filesystem for tests.
///
/// Paths are compared verbatim, so tests should use one consistent style
/// (usually absolute paths like `/work/templates`).
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use stencil_render::fs::{FileSystem, MemoryFs};
///
/// let fs = MemoryFs::new().with_file("/t/index.html.j2", "<h1>{{ title }}</h1>");
/// assert!(fs.is_dir(Path::new("/t")));
/// assert!(fs.is_file(Path::new("/t/index.html.j2")));
/// ```
#[derive(Debug, Default)]
pub struct MemoryFs {
    state: RwLock<MemoryState>,
    read_only: BTreeSet<PathBuf>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, creating its parent directories.
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        let path = path.as_ref();
        {
            let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
            if let Some(parent) = path.parent() {
                state.add_dir_chain(parent);
            }
            state.files.insert(path.to_path_buf(), contents.into());
        }
        self
    }

    /// Adds an empty directory (and its ancestors).
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.state
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .add_dir_chain(path.as_ref());
        self
    }

    /// Makes writes into `dir` (or below it) fail with `PermissionDenied`.
    pub fn with_read_only_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.read_only.insert(dir.as_ref().to_path_buf());
        self
    }

    /// Returns the contents of `path`, if it is a file.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .files
            .get(path.as_ref())
            .cloned()
    }

    /// All file paths currently stored, sorted.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .files
            .keys()
            .cloned()
            .collect()
    }

    fn check_writable(&self, path: &Path) -> io::Result<()> {
        if self.read_only.iter().any(|dir| path.starts_with(dir)) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("read-only location: {}", path.display()),
            ));
        }
        Ok(())
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file or directory: {}", path.display()),
    )
}

impl FileSystem for MemoryFs {
    fn is_file(&self, path: &Path) -> bool {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .files
            .contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .dirs
            .contains(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.contents(path).ok_or_else(|| not_found(path))
    }

    fn list_files(&self, root: &Path, recursive: bool) -> io::Result<Vec<PathBuf>> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        if !state.dirs.contains(root) {
            return Err(not_found(root));
        }

        Ok(state
            .files
            .keys()
            .filter(|path| {
                if recursive {
                    path.starts_with(root) && path.as_path() != root
                } else {
                    path.parent() == Some(root)
                }
            })
            .cloned()
            .collect())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check_writable(path)?;
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if state.files.contains_key(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("a file exists at {}", path.display()),
            ));
        }
        state.add_dir_chain(path);
        Ok(())
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.check_writable(path)?;
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !state.dirs.contains(parent) {
                return Err(not_found(parent));
            }
        }
        if state.dirs.contains(path) {
            return Err(io::Error::other(format!(
                "is a directory: {}",
                path.display()
            )));
        }
        state.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}
