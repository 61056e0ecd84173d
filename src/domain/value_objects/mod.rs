//! Domain Value Objects
//!
//! Small immutable types with no identity of their own.

pub mod format_property;
pub mod module_format;

pub use format_property::FormatProperty;
pub use module_format::ModuleFormat;
