//! JSON-over-HTTP plumbing shared by the provider adapters

use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use reqwest::RequestBuilder;
use shared::ApiFailure;
use tracing::debug;

use crate::error::{GenerationError, GenerationResult};

/// Successful JSON reply from a provider
#[derive(Debug, Clone)]
pub struct JsonReply {
    pub body: serde_json::Value,
    pub headers: HeaderMap,
    pub latency: Duration,
}

/// One reqwest client per adapter, reused for every call
pub fn build_client(timeout: Duration) -> GenerationResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| GenerationError::ConfigError {
            message: format!("failed to build HTTP client: {e}"),
        })
}

/// Send a JSON body and decode a JSON reply, mapping every failure to [`ApiFailure`]
pub async fn post_json(request: RequestBuilder, body: &serde_json::Value) -> Result<JsonReply, ApiFailure> {
    let start = Instant::now();

    let response = request
        .header("Content-Type", "application/json")
        .json(body)
        .send()
        .await
        .map_err(transport_failure)?;

    let latency = start.elapsed();
    let status = response.status();
    let headers = response.headers().clone();

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "Provider returned error status");
        return Err(ApiFailure::from_status(status.as_u16(), &text));
    }

    let body = response
        .json::<serde_json::Value>()
        .await
        .map_err(|e| ApiFailure::MalformedResponse(format!("Failed to parse response: {e}")))?;

    Ok(JsonReply { body, headers, latency })
}

fn transport_failure(e: reqwest::Error) -> ApiFailure {
    if e.is_timeout() {
        ApiFailure::Timeout
    } else {
        ApiFailure::NetworkError(e.to_string())
    }
}

/// Read an unsigned integer header, if present and well-formed
pub fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

/// Fail fast when a credential is missing
pub fn require_key(value: &Option<String>, variable: &str) -> GenerationResult<String> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(key.clone()),
        _ => Err(GenerationError::ConfigError {
            message: format!("{variable} is not set"),
        }),
    }
}
