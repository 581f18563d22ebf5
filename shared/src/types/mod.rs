//! Core types used throughout the backend

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SharedError;

/// Text generation providers available to the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    #[default]
    OpenAI,
    Cohere,
    /// Anthropic models served through Amazon Bedrock
    Anthropic,
}

impl ProviderId {
    pub const ALL: [ProviderId; 3] = [ProviderId::OpenAI, ProviderId::Cohere, ProviderId::Anthropic];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenAI => "openai",
            ProviderId::Cohere => "cohere",
            ProviderId::Anthropic => "anthropic",
        }
    }

    /// Prefix used for this provider's environment variables
    pub fn env_prefix(&self) -> &'static str {
        match self {
            ProviderId::OpenAI => "OPENAI",
            ProviderId::Cohere => "COHERE",
            ProviderId::Anthropic => "BEDROCK",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderId::OpenAI),
            "cohere" => Ok(ProviderId::Cohere),
            "anthropic" | "bedrock" => Ok(ProviderId::Anthropic),
            _ => Err(SharedError::UnknownProvider { input: s.to_string() }),
        }
    }
}

/// Token usage reported by a provider for one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    pub fn total(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Provider-independent reason why a generation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishStatus {
    /// Generation completed normally
    Success,
    /// Output hit the max token limit
    Truncated,
    /// Output was blocked by the provider's content filter
    Filtered,
    /// Provider signaled a rate limit or a transient generation error
    RateLimited,
    /// Generation was cancelled on the provider side
    UserCancelled,
    /// No usable finish signal
    Ambiguous,
}

impl FinishStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinishStatus::Success => "success",
            FinishStatus::Truncated => "truncated",
            FinishStatus::Filtered => "filtered",
            FinishStatus::RateLimited => "rate_limited",
            FinishStatus::UserCancelled => "user_cancelled",
            FinishStatus::Ambiguous => "ambiguous",
        }
    }
}

impl fmt::Display for FinishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// API failure types for provider calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiFailure {
    /// Authentication failed (invalid or missing credentials)
    AuthenticationFailed,
    /// Rate limit exceeded
    RateLimitExceeded,
    /// Invalid request format or parameters, rejected by the provider
    InvalidRequest(String),
    /// Model not found or unavailable
    ModelUnavailable(String),
    /// Network/connection error
    NetworkError(String),
    /// Server error from provider
    ServerError(String),
    /// Request timeout
    Timeout,
    /// Service temporarily unavailable
    ServiceUnavailable,
    /// Response arrived but could not be turned into candidates
    MalformedResponse(String),
    /// Unknown or unhandled error
    Unknown(String),
}

/// How the retry controller should treat an [`ApiFailure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Worth another attempt after the backoff delay
    Transient,
    /// Worth another attempt, no delay needed
    RetryNow,
    /// Credentials problem, never retried
    Auth,
    /// Provider rejected the request, never retried
    Fatal,
    /// Not part of any provider's typed error set
    Unclassified,
}

impl ApiFailure {
    pub fn class(&self) -> FailureClass {
        match self {
            ApiFailure::RateLimitExceeded
            | ApiFailure::NetworkError(_)
            | ApiFailure::ServerError(_)
            | ApiFailure::Timeout
            | ApiFailure::ServiceUnavailable => FailureClass::Transient,
            ApiFailure::MalformedResponse(_) => FailureClass::RetryNow,
            ApiFailure::AuthenticationFailed => FailureClass::Auth,
            ApiFailure::InvalidRequest(_) | ApiFailure::ModelUnavailable(_) => FailureClass::Fatal,
            ApiFailure::Unknown(_) => FailureClass::Unclassified,
        }
    }

    /// Map a non-success HTTP status from a provider to a failure
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => ApiFailure::AuthenticationFailed,
            408 => ApiFailure::Timeout,
            429 => ApiFailure::RateLimitExceeded,
            404 => ApiFailure::ModelUnavailable(body.to_string()),
            400 | 413 | 422 => ApiFailure::InvalidRequest(body.to_string()),
            503 => ApiFailure::ServiceUnavailable,
            500..=599 => ApiFailure::ServerError(format!("HTTP {status}: {body}")),
            _ => ApiFailure::Unknown(format!("HTTP {status}: {body}")),
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailure::AuthenticationFailed => write!(f, "authentication failed"),
            ApiFailure::RateLimitExceeded => write!(f, "rate limit exceeded"),
            ApiFailure::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            ApiFailure::ModelUnavailable(msg) => write!(f, "model unavailable: {msg}"),
            ApiFailure::NetworkError(msg) => write!(f, "network error: {msg}"),
            ApiFailure::ServerError(msg) => write!(f, "server error: {msg}"),
            ApiFailure::Timeout => write!(f, "request timed out"),
            ApiFailure::ServiceUnavailable => write!(f, "service unavailable"),
            ApiFailure::MalformedResponse(msg) => write!(f, "malformed response: {msg}"),
            ApiFailure::Unknown(msg) => write!(f, "unknown error: {msg}"),
        }
    }
}

impl std::error::Error for ApiFailure {}
