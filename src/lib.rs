//! Refit - dependency-aware package format post-processor
//!
//! Refit walks a tree of installed packages (`node_modules` layout),
//! discovers the entry points that ship ahead-of-time compilable module
//! formats, and transforms each pending format exactly once, dependencies
//! first. Processed markers stamped into every `package.json` make
//! repeated runs cheap no-ops.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

/// Compiler version recorded in processed markers by default
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-exports for convenience
pub use application::{
    CleanOptions, CleanReport, CleanUseCase, CompileOptions, CompileReport, CompileUseCase,
    ListOptions, ListReport, ListUseCase,
};
pub use config::Config;
pub use domain::entities::{DependencyGraph, EntryPoint, ProcessedMarker};
pub use domain::ports::{CompileEvent, CompileEventSink, FileSystem, Transformer};
pub use domain::services::{ModuleResolver, Planner};
pub use domain::value_objects::{FormatProperty, ModuleFormat};
pub use error::{RefitError, RefitResult};
pub use infrastructure::fs::{LocalFileSystem, MemoryFileSystem};
pub use infrastructure::repositories::ManifestRepository;
pub use infrastructure::scanner::EntryPointScanner;
pub use infrastructure::transform::BannerTransformer;
