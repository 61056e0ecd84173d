//! File system port
//!
//! Scanner, resolver, repository and use case all go through this trait,
//! so the whole pipeline can run against an in-memory tree in tests and
//! embeddings.

use std::io;
use std::path::{Path, PathBuf};

pub type FsResult<T> = Result<T, FsError>;

/// Error from a [`FileSystem`] operation. The common kinds carry the path
/// they were raised for, which raw [`io::Error`] loses.
#[derive(Debug)]
pub enum FsError {
    NotFound(PathBuf),
    PermissionDenied(PathBuf),
    Io(io::Error),
    Other(String),
}

impl FsError {
    /// Attach a path to a raw I/O error
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_path_buf()),
            _ => FsError::Io(err),
        }
    }

    fn io_kind(&self) -> io::ErrorKind {
        match self {
            FsError::NotFound(_) => io::ErrorKind::NotFound,
            FsError::PermissionDenied(_) => io::ErrorKind::PermissionDenied,
            FsError::Io(err) => err.kind(),
            FsError::Other(_) => io::ErrorKind::Other,
        }
    }
}

impl std::fmt::Display for FsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FsError::NotFound(path) => write!(f, "no such file: {}", path.display()),
            FsError::PermissionDenied(path) => {
                write!(f, "permission denied: {}", path.display())
            }
            FsError::Io(err) => write!(f, "I/O failure: {err}"),
            FsError::Other(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for FsError {}

impl From<FsError> for io::Error {
    fn from(err: FsError) -> Self {
        match err {
            FsError::Io(inner) => inner,
            other => io::Error::new(other.io_kind(), other.to_string()),
        }
    }
}

impl From<FsError> for crate::error::RefitError {
    fn from(err: FsError) -> Self {
        crate::error::RefitError::Io(err.into())
    }
}

/// The file operations the pipeline needs, and nothing more.
///
/// `LocalFileSystem` backs real runs; `MemoryFileSystem` backs tests and
/// embedders that stage trees without touching disk.
pub trait FileSystem {
    fn read(&self, path: &Path) -> FsResult<String>;

    /// Write `content` to `path`, replacing the file in one step so a
    /// crashed run never leaves a half-written file behind.
    fn write(&self, path: &Path, content: &str) -> FsResult<()>;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    /// Immediate children of a directory, sorted by name
    fn read_dir(&self, path: &Path) -> FsResult<Vec<PathBuf>>;
}
