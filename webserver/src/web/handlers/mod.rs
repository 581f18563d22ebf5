//! Route handlers

pub mod health;
pub mod image_optimization;
pub mod text_generation;

pub use health::{health, root};
pub use image_optimization::upscale;
pub use text_generation::generate;
