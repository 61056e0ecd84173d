//! Persistence adapters

pub mod manifest;

pub use manifest::ManifestRepository;
