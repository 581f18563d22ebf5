//! Tests for the Claid.ai client

use std::path::PathBuf;

use image::ImageFormat;
use serde_json::json;
use wiremock::matchers::{header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::fixtures::image_bytes;
use crate::error::WebServerError;
use crate::services::claid_client::{upscale_operations, ClaidClient};
use crate::services::image_utils::StoredImage;
use crate::traits::ImageUpscaler;

async fn stored_png(dir: &tempfile::TempDir) -> StoredImage {
    let path: PathBuf = dir.path().join("image_test.png");
    tokio::fs::write(&path, image_bytes(8, 8, ImageFormat::Png)).await.unwrap();
    StoredImage {
        path,
        format: ImageFormat::Png,
    }
}

#[test]
fn test_output_format_follows_input() {
    let png = upscale_operations(false);
    assert_eq!(png["output"]["format"]["type"], "png");
    assert_eq!(png["output"]["format"]["compression"], "optimal");
    assert_eq!(png["operations"]["restorations"]["upscale"], "smart_enhance");
    assert_eq!(png["operations"]["resizing"]["width"], "200%");

    let jpeg = upscale_operations(true);
    assert_eq!(jpeg["output"]["format"]["type"], "jpeg");
    assert_eq!(jpeg["output"]["format"]["quality"], 85);
}

#[tokio::test]
async fn test_upscale_returns_tmp_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1-beta1/image/edit/upload"))
        .and(header("authorization", "Bearer claid-key"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "input": { "ext": "png" },
                "output": { "tmp_url": "https://storage.claid.ai/tmp/upscaled.png" }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = stored_png(&dir).await;
    let client = ClaidClient::new(reqwest::Client::new(), server.uri(), Some("claid-key".to_string()));

    let url = client.upscale(&image).await.unwrap();

    assert_eq!(url, "https://storage.claid.ai/tmp/upscaled.png");
}

#[tokio::test]
async fn test_upstream_failure_is_image_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = stored_png(&dir).await;
    let client = ClaidClient::new(reqwest::Client::new(), server.uri(), Some("claid-key".to_string()));

    let result = client.upscale(&image).await;
    assert!(matches!(result, Err(WebServerError::ImageService { .. })));
}

#[tokio::test]
async fn test_missing_key_fails_without_calling_service() {
    let dir = tempfile::tempdir().unwrap();
    let image = stored_png(&dir).await;
    let client = ClaidClient::new(reqwest::Client::new(), "http://127.0.0.1:9", None);

    let result = client.upscale(&image).await;
    assert!(matches!(result, Err(WebServerError::ImageService { .. })));
}
