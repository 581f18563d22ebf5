//! Service implementations
//!
//! Real implementations of the image service traits

pub mod claid_client;
pub mod image_optimizer;
pub mod image_utils;

// Re-export service implementations
pub use claid_client::ClaidClient;
pub use image_optimizer::ImageOptimizer;
pub use image_utils::StoredImage;

#[cfg(test)]
mod tests;
