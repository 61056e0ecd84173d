//! On-disk file system backend

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::ports::file_system::{FileSystem, FsError, FsResult};

/// Real disk I/O.
///
/// Writes go through a temp file in the target directory followed by an
/// atomic rename, so an interrupted process never leaves a half-written
/// manifest or source file behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFileSystem {
    fn read(&self, path: &Path) -> FsResult<String> {
        std::fs::read_to_string(path).map_err(|e| FsError::from_io(e, path))
    }

    fn write(&self, path: &Path, content: &str) -> FsResult<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(|e| FsError::from_io(e, parent))?;

        // Temp file must live in the same directory for the rename to be atomic
        let mut tmp =
            tempfile::NamedTempFile::new_in(parent).map_err(|e| FsError::from_io(e, path))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| FsError::from_io(e, path))?;
        tmp.persist(path).map_err(|e| FsError::from_io(e.error, path))?;
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> FsResult<Vec<PathBuf>> {
        let entries = std::fs::read_dir(path).map_err(|e| FsError::from_io(e, path))?;
        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FsError::from_io(e, path))?;
            children.push(entry.path());
        }
        children.sort();
        Ok(children)
    }
}
