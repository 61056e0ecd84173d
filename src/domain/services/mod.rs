//! Domain services - pure logic over entities and ports

pub mod planner;
pub mod resolver;

pub use planner::{CompilationTask, Planner, PropertyStatus};
pub use resolver::ModuleResolver;
