//! Shared types for the text and image optimization backend
//!
//! Contains the types that cross crate boundaries: provider identifiers,
//! the finish-status taxonomy, provider failure values and the JSON bodies
//! exchanged with HTTP clients.

pub mod types;
pub mod errors;
pub mod logging;
pub mod messages;

pub use types::*;
pub use errors::*;

pub use messages::{
    // Text generation endpoint
    TextGenerationInput, TextGenerationOutput,

    // Image optimization endpoint
    ImageOptimizationInput, ImageOptimizationOutput, ImageSource,

    // Error bodies
    ErrorDetail,
};
