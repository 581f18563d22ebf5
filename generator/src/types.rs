//! Generator data types

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{FinishStatus, ProviderId, TokenUsage};

use crate::config::InputLimits;
use crate::error::{GenerationError, GenerationResult};

/// One caller request, owned by a single dispatch cycle
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub input_text: String,
    pub user: Option<String>,
    pub provider: ProviderId,
}

impl GenerationRequest {
    /// Validate input bounds and resolve the provider
    pub fn new(
        input_text: impl Into<String>,
        user: Option<String>,
        provider: Option<ProviderId>,
        default_provider: ProviderId,
        limits: &InputLimits,
    ) -> GenerationResult<Self> {
        let input_text = input_text.into();
        let length = input_text.trim().chars().count();

        if length == 0 {
            return Err(GenerationError::InvalidInput {
                message: "Input text must not be empty.".to_string(),
            });
        }
        if length > limits.max_input_chars {
            return Err(GenerationError::InvalidInput {
                message: format!("Input text must be at most {} characters.", limits.max_input_chars),
            });
        }
        if let Some(user) = &user {
            if user.chars().count() > limits.max_user_chars {
                return Err(GenerationError::InvalidInput {
                    message: format!("User identifier must be at most {} characters.", limits.max_user_chars),
                });
            }
        }

        Ok(Self {
            input_text,
            user,
            provider: provider.unwrap_or(default_provider),
        })
    }
}

/// Provider-specific request ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub provider: ProviderId,
    pub url: String,
    pub body: serde_json::Value,
    pub choice_count: u32,
}

/// Raw provider reply before parsing
#[derive(Debug, Clone, PartialEq)]
pub struct RawProviderResponse {
    pub body: serde_json::Value,
    pub latency: Duration,
    /// Usage reported out of band (Bedrock reports token counts in headers)
    pub header_usage: Option<TokenUsage>,
}

impl RawProviderResponse {
    pub fn new(body: serde_json::Value, latency: Duration) -> Self {
        Self {
            body,
            latency,
            header_usage: None,
        }
    }
}

/// Output of one provider attempt
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResult {
    pub candidates: Vec<String>,
    pub finish: FinishStatus,
    /// Provider's raw finish reason, kept for telemetry
    pub raw_finish_reason: Option<String>,
    /// Some generations failed but the rest are usable as-is
    pub partial: bool,
    pub usage: TokenUsage,
    pub latency: Duration,
    pub provider_timestamp: DateTime<Utc>,
}

impl NormalizedResult {
    pub fn new(finish: FinishStatus, latency: Duration) -> Self {
        Self {
            candidates: Vec::new(),
            finish,
            raw_finish_reason: None,
            partial: false,
            usage: TokenUsage::default(),
            latency,
            provider_timestamp: Utc::now(),
        }
    }
}

/// Telemetry record for one provider attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub created_timestamp: DateTime<Utc>,
    pub task: String,
    pub provider: ProviderId,
    pub model: String,
    pub user: Option<String>,
    pub input_messages: Vec<String>,
    pub execution_time_ms: u64,
    pub prompt_tokens_count: u64,
    pub completion_tokens_count: u64,
    pub generated_texts: Vec<String>,
    pub finish_reason: String,
}

pub const TEXT_GENERATION_TASK: &str = "text_generation";
