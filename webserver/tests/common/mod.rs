//! Common test utilities for webserver route tests

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use generator::{MockTextGenerationService, TextGenerationService};
use serde_json::Value;
use tower::ServiceExt;
use webserver::traits::MockImageOptimizationService;
use webserver::{AppState, ImageOptimizationService, WebServer};

pub const API_KEY: &str = "test-api-key";

pub fn router(
    text: impl TextGenerationService + 'static,
    image: impl ImageOptimizationService + 'static,
    images_dir: &Path,
) -> Router {
    let state = AppState::new(Arc::new(text), Arc::new(image), Some(API_KEY.to_string()));
    WebServer::new(state, images_dir).build_router()
}

/// Router whose services must not be reached
pub fn idle_router(images_dir: &Path) -> Router {
    router(MockTextGenerationService::new(), MockImageOptimizationService::new(), images_dir)
}

pub fn post_json(path: &str, body: &Value, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(path: &str, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::empty()).unwrap()
}

/// Send one request and return the status with the raw body
pub async fn send_raw(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

/// Send one request and parse the body as JSON
pub async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(router, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}
