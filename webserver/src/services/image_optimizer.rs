//! Upscale flow: resolve the input image, validate, store, upscale

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use shared::{ImageOptimizationInput, ImageSource};
use tracing::debug;

use crate::error::WebServerResult;
use crate::services::image_utils::{decode_base64, download_image, store_image, validate_image};
use crate::traits::{ImageOptimizationService, ImageUpscaler};

pub struct ImageOptimizer {
    images_dir: PathBuf,
    size_limit: u32,
    http: reqwest::Client,
    upscaler: Arc<dyn ImageUpscaler>,
}

impl ImageOptimizer {
    pub fn new(images_dir: PathBuf, size_limit: u32, http: reqwest::Client, upscaler: Arc<dyn ImageUpscaler>) -> Self {
        Self {
            images_dir,
            size_limit,
            http,
            upscaler,
        }
    }
}

#[async_trait]
impl ImageOptimizationService for ImageOptimizer {
    async fn upscale(&self, input: ImageOptimizationInput) -> WebServerResult<String> {
        let bytes = match input.source()? {
            ImageSource::Url(url) => {
                debug!(url = %url, "Downloading input image");
                download_image(&self.http, &url).await?
            }
            ImageSource::Base64(data) => decode_base64(&data)?,
        };

        let format = validate_image(&bytes, self.size_limit)?;
        let stored = store_image(&self.images_dir, &bytes, format).await?;

        self.upscaler.upscale(&stored).await
    }
}
