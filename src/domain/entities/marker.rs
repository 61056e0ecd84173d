//! Processed marker entity - records which formats were compiled, and by what version
//!
//! The marker is persisted as an object on the entry point's manifest.
//! It's a pure data structure - I/O is handled by ManifestRepository.

use std::collections::BTreeMap;

use crate::domain::value_objects::FormatProperty;

/// Manifest key the marker is stored under
pub const MARKER_KEY: &str = "__processed_by_refit__";

/// Per-entry-point record of compiled format properties.
///
/// Keys are format-property names, values are opaque version tokens.
/// Entries with keys that are not recognized properties are carried
/// along untouched so that newer refit versions never lose state
/// written by older ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedMarker {
    entries: BTreeMap<String, String>,
}

impl ProcessedMarker {
    /// Create an empty marker (entry point never processed)
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Build a marker from raw manifest entries
    pub fn from_entries(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The version token recorded for a property, if any
    pub fn version_of(&self, property: FormatProperty) -> Option<&str> {
        self.entries.get(property.as_str()).map(|s| s.as_str())
    }

    /// Whether a property was compiled by exactly this version
    pub fn is_current(&self, property: FormatProperty, version: &str) -> bool {
        self.version_of(property) == Some(version)
    }

    /// Record a freshly compiled property
    pub fn record(&mut self, property: FormatProperty, version: impl Into<String>) {
        self.entries.insert(property.as_str().to_string(), version.into());
    }

    /// Merge newly compiled properties into a copy of this marker.
    ///
    /// Entries for properties outside `properties` are preserved verbatim;
    /// a marker update never deletes state from earlier runs.
    pub fn merged(&self, properties: &[FormatProperty], version: &str) -> ProcessedMarker {
        let mut merged = self.clone();
        for property in properties {
            merged.record(*property, version);
        }
        merged
    }

    /// Drop the entry for a property (used by `refit clean`)
    pub fn remove(&mut self, property: FormatProperty) -> Option<String> {
        self.entries.remove(property.as_str())
    }

    /// All raw entries, sorted by property name
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Consume the marker into its raw map (for persistence)
    pub fn into_entries(self) -> BTreeMap<String, String> {
        self.entries
    }
}
