//! Service trait definitions for dependency injection
//!
//! All outbound I/O sits behind these traits so handlers can be tested with mocks.

use async_trait::async_trait;

use shared::ImageOptimizationInput;
use crate::error::WebServerResult;
use crate::services::image_utils::StoredImage;

/// Full upscale flow behind `POST /api/v1/image-optimization/upscale`
#[mockall::automock]
#[async_trait]
pub trait ImageOptimizationService: Send + Sync {
    /// Validate and store the input image, then return the upscaled image URL
    async fn upscale(&self, input: ImageOptimizationInput) -> WebServerResult<String>;
}

/// External image upscaling API
#[mockall::automock]
#[async_trait]
pub trait ImageUpscaler: Send + Sync {
    /// Upload a stored image and return the URL of the upscaled result
    async fn upscale(&self, image: &StoredImage) -> WebServerResult<String>;
}
