//! Infrastructure layer - adapters binding the domain ports to the world

pub mod events;
pub mod fs;
pub mod imports;
pub mod lock;
pub mod repositories;
pub mod scanner;
pub mod transform;
