//! In-memory File System Implementation
//!
//! Backs the whole pipeline in unit tests and embeddings that want to
//! post-process a virtual package tree. Paths are stored verbatim, so
//! callers should stick to absolute paths just as they would on disk.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::domain::ports::file_system::{FileSystem, FsError, FsResult};

/// Thread-safe in-memory file system
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RwLock<BTreeMap<PathBuf, String>>,
    dirs: RwLock<BTreeSet<PathBuf>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file, creating all parent directories
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        self.register_ancestors(&path);
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, content.into());
    }

    /// Register a directory (and its parents) without any files
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.register_ancestors(&path);
        self.dirs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path);
    }

    pub fn file_count(&self) -> usize {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn register_ancestors(&self, path: &Path) {
        let mut dirs = self.dirs.write().unwrap_or_else(PoisonError::into_inner);
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
    }
}

impl FileSystem for MemoryFileSystem {
    fn read(&self, path: &Path) -> FsResult<String> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, content: &str) -> FsResult<()> {
        self.add_file(path, content);
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(path)
    }

    fn read_dir(&self, path: &Path) -> FsResult<Vec<PathBuf>> {
        if !self.is_dir(path) {
            return Err(FsError::NotFound(path.to_path_buf()));
        }

        let mut children: BTreeSet<PathBuf> = BTreeSet::new();
        for file in self
            .files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
        {
            if file.parent() == Some(path) {
                children.insert(file.clone());
            }
        }
        for dir in self
            .dirs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
        {
            if dir.parent() == Some(path) {
                children.insert(dir.clone());
            }
        }

        Ok(children.into_iter().collect())
    }
}
