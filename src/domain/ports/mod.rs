//! Domain ports - interfaces to the outside world

pub mod entry_points;
pub mod events;
pub mod file_system;
pub mod markers;
pub mod transformer;

pub use entry_points::{EntryPointRepository, Exclusion, ScanOutcome};
pub use events::{CompileEvent, CompileEventSink, NoopEventSink};
pub use file_system::{FileSystem, FsError, FsResult};
pub use markers::MarkerRepository;
pub use transformer::{TransformError, TransformResult, Transformer};
