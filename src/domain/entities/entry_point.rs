//! Entry point entity

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::domain::entities::ProcessedMarker;
use crate::domain::value_objects::FormatProperty;

/// Manifest file name looked for in every candidate directory
pub const MANIFEST_NAME: &str = "package.json";

/// A package (or nested sub-package) eligible for compilation.
///
/// An entry point is any directory whose manifest declares at least one
/// recognized format property. Scoped packages and secondary entry
/// points nested inside another package each count separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    name: String,
    path: PathBuf,
    formats: BTreeMap<FormatProperty, String>,
    dependencies: BTreeSet<String>,
    marker: ProcessedMarker,
}

impl EntryPoint {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            formats: BTreeMap::new(),
            dependencies: BTreeSet::new(),
            marker: ProcessedMarker::new(),
        }
    }

    /// Package name as declared in the manifest
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory containing the manifest
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path.join(MANIFEST_NAME)
    }

    /// Declared format properties and their manifest-relative paths
    pub fn formats(&self) -> &BTreeMap<FormatProperty, String> {
        &self.formats
    }

    pub fn declares(&self, property: FormatProperty) -> bool {
        self.formats.contains_key(&property)
    }

    /// Relative path declared for a property, if present
    pub fn format_path(&self, property: FormatProperty) -> Option<&str> {
        self.formats.get(&property).map(|s| s.as_str())
    }

    /// Absolute path of a declared format's entry file
    pub fn resolved_format_path(&self, property: FormatProperty) -> Option<PathBuf> {
        self.format_path(property).map(|rel| self.path.join(rel))
    }

    /// Names of packages this entry point depends on
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(|s| s.as_str())
    }

    pub fn depends_on(&self, name: &str) -> bool {
        self.dependencies.contains(name)
    }

    pub fn marker(&self) -> &ProcessedMarker {
        &self.marker
    }

    pub fn set_format(&mut self, property: FormatProperty, path: impl Into<String>) {
        self.formats.insert(property, path.into());
    }

    pub fn add_dependency(&mut self, name: impl Into<String>) {
        self.dependencies.insert(name.into());
    }

    pub fn set_marker(&mut self, marker: ProcessedMarker) {
        self.marker = marker;
    }

    /// Builder-style helpers used heavily by tests
    pub fn with_format(mut self, property: FormatProperty, path: impl Into<String>) -> Self {
        self.set_format(property, path);
        self
    }

    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.add_dependency(name);
        self
    }

    pub fn with_marker(mut self, marker: ProcessedMarker) -> Self {
        self.set_marker(marker);
        self
    }
}
