//! Transformer port - the per-format compilation strategy
//!
//! The orchestrator decides WHICH (entry point, format) pairs need work;
//! what "compiling" a format means is delegated to this trait. The
//! built-in implementation stamps a banner, real deployments plug in
//! their own rewriter.

use std::path::{Path, PathBuf};

use crate::domain::ports::file_system::{FileSystem, FsError};
use crate::domain::value_objects::ModuleFormat;

/// Result type for transform operations
pub type TransformResult = Result<String, TransformError>;

/// Transformation failure for a single format of a single entry point.
///
/// Never fatal to the run: the driver records it, abandons the entry
/// point and skips its dependents.
#[derive(Debug)]
pub enum TransformError {
    /// An import of the source file resolved to no file on disk
    UnresolvedImport { specifier: String, source: PathBuf },
    /// The source file could not be read
    Source(FsError),
    /// Strategy-specific failure
    Other(String),
}

impl From<FsError> for TransformError {
    fn from(err: FsError) -> Self {
        TransformError::Source(err)
    }
}

impl std::fmt::Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformError::UnresolvedImport { specifier, source } => {
                write!(
                    f,
                    "unresolved import '{}' in {}",
                    specifier,
                    source.display()
                )
            }
            TransformError::Source(err) => write!(f, "source unreadable: {}", err),
            TransformError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for TransformError {}

/// Compiles one format variant of one entry point.
///
/// Receives the format's entry file and the file system it lives on;
/// returns the new content for that file. Implementations must be pure
/// with respect to the file system snapshot so that re-running over
/// already-transformed output is a no-op.
pub trait Transformer {
    fn transform<F: FileSystem>(
        &self,
        source: &Path,
        format: ModuleFormat,
        fs: &F,
    ) -> TransformResult;
}
