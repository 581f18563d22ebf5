//! Claid.ai image editing client

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::{info, warn};

use crate::error::{WebServerError, WebServerResult};
use crate::services::image_utils::StoredImage;
use crate::traits::ImageUpscaler;

const UPLOAD_PATH: &str = "/v1-beta1/image/edit/upload";

#[derive(Clone)]
pub struct ClaidClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ClaidClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        if api_key.is_none() {
            warn!("CLAID_API_KEY is not set, image upscaling will fail");
        }

        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    pub fn upload_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), UPLOAD_PATH)
    }
}

/// Upscale operations: smart enhance, then double both sides
pub fn upscale_operations(jpeg_output: bool) -> serde_json::Value {
    let format = if jpeg_output {
        serde_json::json!({ "type": "jpeg", "quality": 85 })
    } else {
        serde_json::json!({ "type": "png", "compression": "optimal" })
    };

    serde_json::json!({
        "operations": {
            "restorations": {
                "decompress": "auto",
                "upscale": "smart_enhance"
            },
            "resizing": {
                "width": "200%",
                "height": "200%",
                "fit": "bounds"
            }
        },
        "output": {
            "format": format
        }
    })
}

fn service_error(message: impl Into<String>) -> WebServerError {
    WebServerError::ImageService { message: message.into() }
}

#[async_trait]
impl ImageUpscaler for ClaidClient {
    async fn upscale(&self, image: &StoredImage) -> WebServerResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| service_error("CLAID_API_KEY is not set"))?;

        let bytes = tokio::fs::read(&image.path).await?;
        let data = Part::text(upscale_operations(image.is_jpeg()).to_string())
            .mime_str("application/json")
            .map_err(|e| service_error(e.to_string()))?;
        let file = Part::bytes(bytes).file_name(image.file_name());
        let form = Form::new().part("file", file).part("data", data);

        let response = self
            .client
            .post(self.upload_url())
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| service_error(format!("upload failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(service_error(format!("Error: {} - {}", status.as_u16(), body)));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| service_error(format!("invalid response: {e}")))?;

        let tmp_url = body
            .get("data")
            .and_then(|data| data.get("output"))
            .and_then(|output| output.get("tmp_url"))
            .and_then(|url| url.as_str())
            .ok_or_else(|| service_error("no data.output.tmp_url in response"))?;

        info!(file = %image.file_name(), "Image upscaled");
        Ok(tmp_url.to_string())
    }
}
