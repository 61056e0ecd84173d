//! Compile Result
//!
//! Result types describing the outcome of a compilation run.

use std::path::PathBuf;

use crate::domain::value_objects::FormatProperty;

/// An entry point whose formats were compiled
#[derive(Debug, Clone)]
pub struct CompiledEntryPoint {
    pub name: String,
    pub properties: Vec<FormatProperty>,
}

/// An entry point that could not be compiled
#[derive(Debug, Clone)]
pub struct FailedEntryPoint {
    pub name: String,
    pub error: String,
}

/// An entry point skipped because a dependency failed
#[derive(Debug, Clone)]
pub struct SkippedEntryPoint {
    pub name: String,
    pub dependency: String,
}

/// A package directory excluded during the scan
#[derive(Debug, Clone)]
pub struct ExcludedPackage {
    pub path: PathBuf,
    pub reason: String,
}

/// Report of a compilation run
#[derive(Debug, Clone, Default)]
pub struct CompileReport {
    /// Entry points compiled this run
    pub compiled: Vec<CompiledEntryPoint>,
    /// Entry points whose markers were already current
    pub up_to_date: Vec<String>,
    /// Entry points that failed
    pub failed: Vec<FailedEntryPoint>,
    /// Entry points skipped due to failed dependencies
    pub skipped: Vec<SkippedEntryPoint>,
    /// Package directories excluded during the scan
    pub excluded: Vec<ExcludedPackage>,
    /// Total entry points considered after target restriction
    pub entry_point_count: usize,
    /// Whether the run stopped early on an interrupt
    pub interrupted: bool,
}

impl CompileReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_compiled(&mut self, name: impl Into<String>, properties: Vec<FormatProperty>) {
        self.compiled.push(CompiledEntryPoint {
            name: name.into(),
            properties,
        });
    }

    pub fn add_up_to_date(&mut self, name: impl Into<String>) {
        self.up_to_date.push(name.into());
    }

    pub fn add_failed(&mut self, name: impl Into<String>, error: impl Into<String>) {
        self.failed.push(FailedEntryPoint {
            name: name.into(),
            error: error.into(),
        });
    }

    pub fn add_skipped(&mut self, name: impl Into<String>, dependency: impl Into<String>) {
        self.skipped.push(SkippedEntryPoint {
            name: name.into(),
            dependency: dependency.into(),
        });
    }

    pub fn add_excluded(&mut self, path: impl Into<PathBuf>, reason: impl Into<String>) {
        self.excluded.push(ExcludedPackage {
            path: path.into(),
            reason: reason.into(),
        });
    }

    /// True when nothing failed or was skipped
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}
