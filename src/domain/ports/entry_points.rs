//! Entry Point Discovery Port
//!
//! Abstracts how entry points are found under a package root, so the
//! compile flow can be driven from an in-memory tree in tests.

use std::path::{Path, PathBuf};

use crate::domain::entities::EntryPoint;
use crate::error::{RefitError, RefitResult};

/// A candidate directory dropped from the run, with the reason
#[derive(Debug)]
pub struct Exclusion {
    pub path: PathBuf,
    pub error: RefitError,
}

/// Result of scanning a package root
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Qualified entry points, in walk (lexicographic) order
    pub entry_points: Vec<EntryPoint>,
    /// Candidates excluded by manifest or format problems
    pub exclusions: Vec<Exclusion>,
}

/// Port for discovering entry points under a package root.
///
/// Exclusions are collected, not raised: one broken manifest must not
/// take down the rest of the tree.
pub trait EntryPointRepository {
    fn discover(&self, root: &Path) -> RefitResult<ScanOutcome>;
}
