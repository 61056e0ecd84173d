//! Per-run options, assembled by the CLI or an embedder before
//! handing control to the use case.

use std::path::PathBuf;

use crate::domain::value_objects::FormatProperty;

/// Options for the compile use case
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Package root to scan (typically a node_modules directory)
    pub source: PathBuf,
    /// Format properties to process; empty means every recognized property
    pub properties: Vec<FormatProperty>,
    /// Restrict the run to one entry point directory and its dependencies
    pub target: Option<PathBuf>,
    /// Worker thread count
    pub jobs: usize,
    /// Version token recorded in processed markers
    pub compiler_version: String,
    /// Dry run (report pending work, write nothing)
    pub dry_run: bool,
}

impl CompileOptions {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            properties: Vec::new(),
            target: None,
            jobs: 1,
            compiler_version: crate::VERSION.to_string(),
            dry_run: false,
        }
    }

    pub fn with_properties(mut self, properties: Vec<FormatProperty>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_compiler_version(mut self, version: impl Into<String>) -> Self {
        self.compiler_version = version.into();
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
