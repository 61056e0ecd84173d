//! List Use Case
//!
//! Scans a package root and reports every entry point in compilation
//! order, with the marker state of each declared format property.
//! Read-only; nothing is written.

use std::path::PathBuf;

use crate::domain::entities::DependencyGraph;
use crate::domain::ports::EntryPointRepository;
use crate::domain::services::{Planner, PropertyStatus};
use crate::domain::value_objects::FormatProperty;
use crate::error::RefitResult;

use super::compile::ExcludedPackage;

/// Options for the list operation
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Package root to scan
    pub source: PathBuf,
    /// Version markers are compared against
    pub compiler_version: String,
}

impl ListOptions {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            compiler_version: crate::VERSION.to_string(),
        }
    }

    pub fn with_compiler_version(mut self, version: impl Into<String>) -> Self {
        self.compiler_version = version.into();
        self
    }
}

/// One declared format property and its marker state
#[derive(Debug, Clone)]
pub struct PropertyListing {
    pub property: FormatProperty,
    pub status: PropertyStatus,
}

/// One scanned entry point
#[derive(Debug, Clone)]
pub struct ListedEntryPoint {
    pub name: String,
    pub path: PathBuf,
    pub properties: Vec<PropertyListing>,
}

impl ListedEntryPoint {
    /// True when every declared property carries a current marker
    pub fn is_fully_processed(&self) -> bool {
        self.properties
            .iter()
            .all(|p| p.status == PropertyStatus::UpToDate)
    }
}

/// Result of a list run
#[derive(Debug, Clone, Default)]
pub struct ListReport {
    /// Entry points in compilation order
    pub entry_points: Vec<ListedEntryPoint>,
    /// Package directories excluded during the scan
    pub excluded: Vec<ExcludedPackage>,
}

/// List use case - reports entry points and their marker state
pub struct ListUseCase<ER>
where
    ER: EntryPointRepository,
{
    entry_points: ER,
}

impl<ER> ListUseCase<ER>
where
    ER: EntryPointRepository,
{
    pub fn new(entry_points: ER) -> Self {
        Self { entry_points }
    }

    pub fn execute(&self, options: &ListOptions) -> RefitResult<ListReport> {
        let mut report = ListReport::default();

        let outcome = self.entry_points.discover(&options.source)?;
        for exclusion in &outcome.exclusions {
            report.excluded.push(ExcludedPackage {
                path: exclusion.path.clone(),
                reason: exclusion.error.to_string(),
            });
        }

        let graph = DependencyGraph::from_entry_points(outcome.entry_points);
        for ep in graph.compilation_order()? {
            let properties = FormatProperty::ALL
                .into_iter()
                .filter(|p| ep.declares(*p))
                .map(|property| PropertyListing {
                    property,
                    status: Planner::property_status(ep, property, &options.compiler_version),
                })
                .collect();

            report.entry_points.push(ListedEntryPoint {
                name: ep.name().to_string(),
                path: ep.path().to_path_buf(),
                properties,
            });
        }

        Ok(report)
    }
}
