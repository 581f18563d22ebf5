//! API key check applied to every protected route

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::error::WebServerError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

const OPEN_PATHS: [&str; 2] = ["/", "/health"];

pub async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(expected) = state.api_key.as_deref() else {
        return next.run(request).await;
    };

    if OPEN_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if provided == Some(expected) {
        next.run(request).await
    } else {
        warn!(path = %request.uri().path(), "Rejected request with missing or wrong API key");
        WebServerError::InvalidApiKey.into_response()
    }
}
