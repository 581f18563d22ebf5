//! Tests for image validation and storage

use image::ImageFormat;

use super::fixtures::{image_bytes, png_base64};
use crate::error::WebServerError;
use crate::services::image_utils::{decode_base64, download_image, store_image, validate_image};

#[test]
fn test_valid_png_and_jpeg_accepted() {
    let png = decode_base64(&png_base64(8, 8)).unwrap();
    assert_eq!(validate_image(&png, 1920).unwrap(), ImageFormat::Png);

    let jpeg = image_bytes(16, 9, ImageFormat::Jpeg);
    assert_eq!(validate_image(&jpeg, 1920).unwrap(), ImageFormat::Jpeg);
}

#[test]
fn test_invalid_base64_rejected() {
    let result = decode_base64("not base64 at all!");
    assert!(matches!(result, Err(WebServerError::InvalidImage { .. })));

    let result = validate_image(b"plain text, not an image", 1920);
    assert!(matches!(result, Err(WebServerError::InvalidImage { .. })));
}

#[test]
fn test_unsupported_format_rejected() {
    let bmp = image_bytes(4, 4, ImageFormat::Bmp);
    match validate_image(&bmp, 1920) {
        Err(WebServerError::InvalidImage { message }) => assert!(message.contains("jpg, jpeg, png")),
        other => panic!("expected invalid image, got {other:?}"),
    }
}

#[test]
fn test_size_limit_is_exclusive() {
    let square = image_bytes(32, 32, ImageFormat::Png);
    assert!(validate_image(&square, 33).is_ok());

    match validate_image(&square, 32) {
        Err(WebServerError::InvalidImage { message }) => assert!(message.contains("less than 32 pixels")),
        other => panic!("expected size error, got {other:?}"),
    }

    let wide = image_bytes(40, 2, ImageFormat::Png);
    assert!(validate_image(&wide, 40).is_err());
}

#[tokio::test]
async fn test_store_image_names_file_by_format() {
    let dir = tempfile::tempdir().unwrap();
    let images_dir = dir.path().join("images");
    let bytes = image_bytes(4, 4, ImageFormat::Jpeg);

    let stored = store_image(&images_dir, &bytes, ImageFormat::Jpeg).await.unwrap();

    let name = stored.file_name();
    assert!(name.starts_with("image_"));
    assert!(name.ends_with(".jpeg"));
    assert!(stored.is_jpeg());
    assert_eq!(tokio::fs::read(&stored.path).await.unwrap(), bytes);
}

#[tokio::test]
async fn test_download_from_file_url_and_bad_scheme() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.png");
    let bytes = image_bytes(4, 4, ImageFormat::Png);
    tokio::fs::write(&path, &bytes).await.unwrap();

    let client = reqwest::Client::new();
    let url = url::Url::from_file_path(&path).unwrap();
    assert_eq!(download_image(&client, url.as_str()).await.unwrap(), bytes);

    let result = download_image(&client, "ftp://example.com/a.png").await;
    assert!(matches!(result, Err(WebServerError::InvalidRequest { .. })));

    let result = download_image(&client, "not a url").await;
    assert!(matches!(result, Err(WebServerError::InvalidRequest { .. })));
}
