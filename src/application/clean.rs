//! Clean Use Case
//!
//! Removes `__processed_by_refit__` markers from every discovered entry
//! point so the next compile starts from scratch. Marker removal goes
//! through the same atomic manifest rewrite as marker commits.

use std::path::PathBuf;

use crate::domain::ports::{EntryPointRepository, MarkerRepository};
use crate::error::RefitResult;

use super::compile::ExcludedPackage;

/// Options for the clean operation
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Package root to scan
    pub source: PathBuf,
}

impl CleanOptions {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Result of a clean run
#[derive(Debug, Clone, Default)]
pub struct CleanReport {
    /// Entry points whose marker was removed
    pub cleaned: Vec<String>,
    /// Entry points that had no marker
    pub unmarked: Vec<String>,
    /// Package directories excluded during the scan
    pub excluded: Vec<ExcludedPackage>,
}

impl CleanReport {
    pub fn is_noop(&self) -> bool {
        self.cleaned.is_empty()
    }
}

/// Clean use case - strips processed markers from manifests
pub struct CleanUseCase<ER, MR>
where
    ER: EntryPointRepository,
    MR: MarkerRepository,
{
    entry_points: ER,
    markers: MR,
}

impl<ER, MR> CleanUseCase<ER, MR>
where
    ER: EntryPointRepository,
    MR: MarkerRepository,
{
    pub fn new(entry_points: ER, markers: MR) -> Self {
        Self {
            entry_points,
            markers,
        }
    }

    pub fn execute(&self, options: &CleanOptions) -> RefitResult<CleanReport> {
        let mut report = CleanReport::default();

        let outcome = self.entry_points.discover(&options.source)?;
        for exclusion in &outcome.exclusions {
            report.excluded.push(ExcludedPackage {
                path: exclusion.path.clone(),
                reason: exclusion.error.to_string(),
            });
        }

        for ep in &outcome.entry_points {
            if self.markers.clear(ep.path())? {
                report.cleaned.push(ep.name().to_string());
            } else {
                report.unmarked.push(ep.name().to_string());
            }
        }

        Ok(report)
    }
}
