//! Error types for refit
//!
//! Uses `thiserror` for library errors. Structural errors (cycles, bad
//! targets, held locks) abort a run; per-entry-point errors are isolated
//! and surface in the run report instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for refit operations
pub type RefitResult<T> = Result<T, RefitError>;

/// Main error type for refit operations
#[derive(Error, Debug)]
pub enum RefitError {
    /// Manifest is not well-formed JSON (entry point excluded, run continues)
    #[error("malformed manifest in {}: {message}", path.display())]
    ManifestParse { path: PathBuf, message: String },

    /// A declared format property does not resolve to an existing file
    #[error(
        "entry point {} declares '{property}' as '{value}' which does not resolve to a file",
        path.display()
    )]
    InvalidEntryPoint {
        path: PathBuf,
        property: String,
        value: String,
    },

    /// Entry points declare a dependency cycle (fatal, aborts the run)
    #[error("cyclic dependency between entry points: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    /// The requested target path is not a scanned entry point
    #[error("target entry point not found: {}", path.display())]
    TargetNotFound { path: PathBuf },

    /// A dependency of this entry point failed, so it was skipped
    #[error("dependency '{dependency}' of '{entry_point}' failed to compile")]
    DependencyFailed {
        entry_point: String,
        dependency: String,
    },

    /// The external transformer failed for one format of one entry point
    #[error("failed to transform '{property}' of '{entry_point}': {message}")]
    Transformation {
        entry_point: String,
        property: String,
        message: String,
    },

    /// Another refit process holds the lock on this package root
    #[error("{} is locked by another refit process ({holder})", path.display())]
    LockHeld { path: PathBuf, holder: String },

    /// Invalid configuration file
    #[error("invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RefitError {
    /// True for errors that must abort the whole run rather than exclude
    /// a single entry point.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RefitError::CyclicDependency { .. }
                | RefitError::TargetNotFound { .. }
                | RefitError::LockHeld { .. }
        )
    }
}
