//! CompileEventSink implementations

pub mod console;
pub mod json;

pub use console::ConsoleEventSink;
pub use json::JsonEventSink;
