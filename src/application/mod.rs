//! Use cases wiring the domain to concrete ports.
//!
//! `CompileUseCase` drives a full run (scan, order, select, transform,
//! mark), `ListUseCase` reports entry points and their marker state, and
//! `CleanUseCase` strips processed markers so the next run starts fresh.
//! Business rules live in `domain`; this layer only sequences them.

pub mod clean;
pub mod compile;
pub mod list;

pub use clean::{CleanOptions, CleanReport, CleanUseCase};
pub use compile::{
    CompiledEntryPoint, CompileOptions, CompileReport, CompileUseCase, ExcludedPackage,
    FailedEntryPoint, SkippedEntryPoint,
};
pub use list::{ListedEntryPoint, ListOptions, ListReport, ListUseCase, PropertyListing};
