//! Image input validation and local storage

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{ImageFormat, ImageReader};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::error::{WebServerError, WebServerResult};

const INVALID_BASE64: &str = "Input string is not a valid Base64 image.";
const UNSUPPORTED_FORMAT: &str = "Image is not valid, only 'Base64' image (jpg, jpeg, png) is valid.";
const INVALID_URL_IMAGE: &str = "Invalid image data from input URL.";

/// Image saved under the images directory
#[derive(Debug, Clone, PartialEq)]
pub struct StoredImage {
    pub path: PathBuf,
    pub format: ImageFormat,
}

impl StoredImage {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn is_jpeg(&self) -> bool {
        self.format == ImageFormat::Jpeg
    }
}

fn invalid(message: impl Into<String>) -> WebServerError {
    WebServerError::InvalidImage { message: message.into() }
}

/// Decode standard base64 image data
pub fn decode_base64(data: &str) -> WebServerResult<Vec<u8>> {
    BASE64.decode(data.trim()).map_err(|_| invalid(INVALID_BASE64))
}

/// Check the bytes are a JPEG or PNG strictly smaller than `size_limit` in both dimensions
pub fn validate_image(bytes: &[u8], size_limit: u32) -> WebServerResult<ImageFormat> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|_| invalid(INVALID_BASE64))?;

    let format = reader.format().ok_or_else(|| invalid(INVALID_BASE64))?;
    if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
        return Err(invalid(UNSUPPORTED_FORMAT));
    }

    let (width, height) = reader.into_dimensions().map_err(|_| invalid(INVALID_BASE64))?;
    if width >= size_limit || height >= size_limit {
        return Err(invalid(format!(
            "Image size exceeded, width and height must be less than {size_limit} pixels."
        )));
    }

    Ok(format)
}

pub fn extension(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        _ => "png",
    }
}

/// Write the image as `<dir>/image_<uuid>.<ext>`
pub async fn store_image(dir: &Path, bytes: &[u8], format: ImageFormat) -> WebServerResult<StoredImage> {
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(format!("image_{}.{}", Uuid::new_v4(), extension(format)));
    tokio::fs::write(&path, bytes).await?;

    debug!(path = %path.display(), "Stored input image");
    Ok(StoredImage { path, format })
}

/// Fetch image bytes from an http(s) or file URL
pub async fn download_image(client: &reqwest::Client, image_url: &str) -> WebServerResult<Vec<u8>> {
    let url = Url::parse(image_url).map_err(|e| WebServerError::InvalidRequest {
        details: format!("image_url is not a valid URL: {e}"),
    })?;

    match url.scheme() {
        "http" | "https" => {
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|_| invalid(INVALID_URL_IMAGE))?;
            if !response.status().is_success() {
                return Err(invalid(INVALID_URL_IMAGE));
            }
            let bytes = response.bytes().await.map_err(|_| invalid(INVALID_URL_IMAGE))?;
            Ok(bytes.to_vec())
        }
        "file" => {
            let path = url.to_file_path().map_err(|_| invalid(INVALID_URL_IMAGE))?;
            tokio::fs::read(&path).await.map_err(|_| invalid(INVALID_URL_IMAGE))
        }
        scheme => Err(WebServerError::InvalidRequest {
            details: format!("image_url must use http, https or file, got '{scheme}'"),
        }),
    }
}
