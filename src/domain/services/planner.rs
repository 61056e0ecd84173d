//! Format selection service
//!
//! Pure domain logic for deciding which format variants of an entry
//! point still need compiling. This service only inspects manifest
//! state already in memory, without performing any I/O.

use std::path::PathBuf;

use crate::domain::entities::EntryPoint;
use crate::domain::value_objects::{FormatProperty, ModuleFormat};

/// Why a format property is, or is not, scheduled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyStatus {
    /// Declared and never processed
    Pending,
    /// Declared but processed by a different compiler version
    Stale { recorded: String },
    /// Declared and processed by exactly this compiler version
    UpToDate,
    /// The entry point does not declare this property
    Undeclared,
}

impl PropertyStatus {
    /// Whether this status requires a compile
    pub fn needs_compile(&self) -> bool {
        matches!(self, PropertyStatus::Pending | PropertyStatus::Stale { .. })
    }
}

/// One unit of compilation work: a single format variant of a single
/// entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationTask {
    /// Manifest property being compiled
    pub property: FormatProperty,
    /// Module format family of that property
    pub format: ModuleFormat,
    /// Absolute path of the format's entry file
    pub source: PathBuf,
}

impl CompilationTask {
    pub fn new(property: FormatProperty, source: PathBuf) -> Self {
        Self {
            property,
            format: property.module_format(),
            source,
        }
    }
}

/// Pure selection service
///
/// Takes an entry point's declared formats and marker state to decide
/// what still needs compiling. No filesystem operations - all I/O is
/// done by the caller.
pub struct Planner;

impl Planner {
    /// Classify one property of one entry point
    pub fn property_status(
        entry_point: &EntryPoint,
        property: FormatProperty,
        compiler_version: &str,
    ) -> PropertyStatus {
        if !entry_point.declares(property) {
            return PropertyStatus::Undeclared;
        }
        match entry_point.marker().version_of(property) {
            None => PropertyStatus::Pending,
            Some(recorded) if recorded == compiler_version => PropertyStatus::UpToDate,
            Some(recorded) => PropertyStatus::Stale {
                recorded: recorded.to_string(),
            },
        }
    }

    /// Requested properties that still need compiling, in canonical
    /// property order.
    ///
    /// An empty `requested` slice means every recognized property.
    /// A property is pending iff the entry point declares it AND the
    /// marker lacks it or records a different compiler version.
    pub fn pending_properties(
        entry_point: &EntryPoint,
        requested: &[FormatProperty],
        compiler_version: &str,
    ) -> Vec<FormatProperty> {
        FormatProperty::ALL
            .into_iter()
            .filter(|p| requested.is_empty() || requested.contains(p))
            .filter(|p| {
                Self::property_status(entry_point, *p, compiler_version).needs_compile()
            })
            .collect()
    }

    /// Expand the pending set into concrete compilation tasks
    pub fn plan(
        entry_point: &EntryPoint,
        requested: &[FormatProperty],
        compiler_version: &str,
    ) -> Vec<CompilationTask> {
        Self::pending_properties(entry_point, requested, compiler_version)
            .into_iter()
            .filter_map(|property| {
                entry_point
                    .resolved_format_path(property)
                    .map(|source| CompilationTask::new(property, source))
            })
            .collect()
    }
}
