//! Transformer port implementations

pub mod banner;

pub use banner::BannerTransformer;
