//! Domain entities

pub mod entry_point;
pub mod graph;
pub mod marker;

pub use entry_point::{EntryPoint, MANIFEST_NAME};
pub use graph::DependencyGraph;
pub use marker::{ProcessedMarker, MARKER_KEY};
