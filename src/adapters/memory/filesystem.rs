//! In-memory filesystem adapter.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::ports::filesystem::FileSystem;

/// A filesystem holding a fixed set of files in memory.
///
/// Directories exist implicitly as ancestors of added files, or explicitly
/// through [`InMemoryFileSystem::add_dir`].
#[derive(Debug, Default, Clone)]
pub struct InMemoryFileSystem {
    files: BTreeMap<PathBuf, String>,
    dirs: Vec<PathBuf>,
}

impl InMemoryFileSystem {
    /// Creates an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a file.
    pub fn add_file(&mut self, path: impl AsRef<Path>, contents: &str) -> &mut Self {
        self.files.insert(path.as_ref().to_path_buf(), contents.to_string());
        self
    }

    /// Adds an empty directory.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.dirs.push(path.as_ref().to_path_buf());
        self
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.iter().any(|d| d == path)
            || self.files.keys().any(|f| f.starts_with(path) && f != path)
    }
}

impl FileSystem for InMemoryFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| format!("No such file: {}", path.display()).into())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.is_dir(path)
    }

    fn list_dir(
        &self,
        path: &Path,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        if !self.is_dir(path) {
            return Err(format!("Not a directory: {}", path.display()).into());
        }
        let mut names: Vec<String> = self
            .files
            .keys()
            .chain(self.dirs.iter())
            .filter_map(|p| p.strip_prefix(path).ok())
            .filter_map(|rel| rel.components().next())
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}
