//! Shared helpers for the CLI test binaries: `TestEnv` builds an isolated
//! package tree in a temp directory, `TestResult` captures one refit
//! invocation, and `fixtures` holds reusable manifest and source content.

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
