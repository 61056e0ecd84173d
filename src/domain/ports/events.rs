//! Events emitted while a run scans and compiles
//!
//! The use case publishes these through a sink owned by the caller; the
//! CLI installs a console or NDJSON sink, embedders bring their own.

use std::path::PathBuf;

/// Progress notification from a scan or compile run
#[derive(Debug, Clone)]
pub enum CompileEvent {
    /// Scan of the package root started
    ScanStarted { root: PathBuf },

    /// Scan finished
    ScanCompleted {
        entry_point_count: usize,
        excluded_count: usize,
    },

    /// A candidate directory was excluded from compilation
    EntryPointExcluded { path: PathBuf, reason: String },

    /// Dependency-ordered processing started
    CompileStarted { entry_point_count: usize },

    /// Work on one entry point started
    EntryPointStarted { index: usize, name: String },

    /// One format property of an entry point was compiled
    PropertyCompiled {
        index: usize,
        name: String,
        property: String,
        format: String,
    },

    /// Entry point fully compiled and its marker committed
    EntryPointCompiled {
        index: usize,
        name: String,
        properties: Vec<String>,
    },

    /// Entry point required no work
    EntryPointUpToDate { index: usize, name: String },

    /// A format failed; the entry point was abandoned
    EntryPointFailed {
        index: usize,
        name: String,
        error: String,
    },

    /// Entry point skipped because a dependency failed
    EntryPointSkipped {
        index: usize,
        name: String,
        dependency: String,
    },

    /// A shutdown signal stopped dispatch of further entry points
    Interrupted,

    /// Run completed
    Completed {
        compiled_count: usize,
        up_to_date_count: usize,
        failed_count: usize,
        skipped_count: usize,
    },
}

/// Receiver half of the event stream.
///
/// Sinks are shared across worker threads, so implementations must be
/// `Send + Sync` and should return quickly.
pub trait CompileEventSink: Send + Sync {
    fn on_event(&self, event: CompileEvent);

    /// Whether per-property events should be delivered at all.
    /// Summary-only sinks spare the dispatcher the formatting work.
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// Discards every event, for embedders that inspect the report instead.
pub struct NoopEventSink;

impl CompileEventSink for NoopEventSink {
    fn on_event(&self, _event: CompileEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}
