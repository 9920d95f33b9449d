//! Source file discovery.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];
pub const SKIPPED_DIRS: &[&str] = &["node_modules", "dist", ".next", "coverage"];

pub trait FileDiscovery: Send + Sync {
    /// Absolute paths of analyzable files under `root`, sorted by path.
    fn discover(&self, root: &Path) -> std::io::Result<Vec<PathBuf>>;
}

#[derive(Debug, Clone, Default)]
pub struct WalkDirDiscovery {
    ignored_dirs: Vec<String>,
}

impl WalkDirDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra directory names to skip, on top of [`SKIPPED_DIRS`] and hidden
    /// directories.
    pub fn with_ignored_dirs(mut self, dirs: impl IntoIterator<Item = String>) -> Self {
        self.ignored_dirs.extend(dirs);
        self
    }

    fn is_skipped(&self, entry: &walkdir::DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }
        entry
            .file_name()
            .to_str()
            .map(|name| {
                name.starts_with('.')
                    || SKIPPED_DIRS.contains(&name)
                    || self.ignored_dirs.iter().any(|dir| dir == name)
            })
            .unwrap_or(false)
    }
}

impl FileDiscovery for WalkDirDiscovery {
    fn discover(&self, root: &Path) -> std::io::Result<Vec<PathBuf>> {
        let root = std::path::absolute(root)?;

        if root.is_file() {
            return Ok(if is_supported_file(&root) {
                vec![root]
            } else {
                Vec::new()
            });
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_skipped(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| is_supported_file(e.path()))
            .map(|e| e.into_path())
            .collect();

        files.sort();
        Ok(files)
    }
}

pub fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}
