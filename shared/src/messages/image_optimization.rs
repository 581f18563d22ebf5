//! Image optimization endpoint messages

use serde::{Deserialize, Serialize};

use crate::errors::SharedError;

const BOTH_SOURCES: &str = "Input image can only be passed through either 'image_url' or 'image_data', \
both fields cannot be existed at the same time.";
const NO_SOURCE: &str = "Missing image input: input image must be either passed through image's URL \
(via 'image_url' field) or encoded Base64 data (via 'image_data' field).";

/// Body of `POST /api/v1/image-optimization/upscale`
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ImageOptimizationInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
}

/// Where the input image comes from, once validated
#[derive(Clone, Debug, PartialEq)]
pub enum ImageSource {
    Url(String),
    Base64(String),
}

impl ImageOptimizationInput {
    /// Exactly one of `image_url` and `image_data` must be set
    pub fn source(&self) -> Result<ImageSource, SharedError> {
        match (&self.image_url, &self.image_data) {
            (Some(_), Some(_)) => Err(SharedError::InvalidInput {
                message: BOTH_SOURCES.to_string(),
            }),
            (None, None) => Err(SharedError::InvalidInput {
                message: NO_SOURCE.to_string(),
            }),
            (Some(url), None) => Ok(ImageSource::Url(url.clone())),
            (None, Some(data)) => Ok(ImageSource::Base64(data.clone())),
        }
    }
}

/// Successful upscale response
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ImageOptimizationOutput {
    pub image_output: String,
}
