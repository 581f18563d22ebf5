//! JSON bodies exchanged with HTTP clients
//!
//! - `text_generation`: text optimization request and response
//! - `image_optimization`: image upscaling request and response
//! - `error`: error body shared by every endpoint

pub mod text_generation;
pub mod image_optimization;
pub mod error;

pub use text_generation::{TextGenerationInput, TextGenerationOutput};

pub use image_optimization::{ImageOptimizationInput, ImageOptimizationOutput, ImageSource};

pub use error::ErrorDetail;
