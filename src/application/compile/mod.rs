//! The compile use case: scan a package root, order entry points by
//! dependency, and transform every pending format exactly once.
//!
//! ```ignore
//! use refit::application::compile::{CompileOptions, CompileUseCase};
//!
//! let use_case = CompileUseCase::new(scanner, manifests, &fs, transformer);
//! let report = use_case.execute(&CompileOptions::new(source))?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::CompileOptions;
pub use result::{
    CompiledEntryPoint, CompileReport, ExcludedPackage, FailedEntryPoint, SkippedEntryPoint,
};
pub use use_case::CompileUseCase;
