//! OpenAI chat completions adapter

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{ApiFailure, FinishStatus, ProviderId, TokenUsage};
use tiktoken_rs::CoreBPE;
use tracing::debug;

use crate::config::ProviderSettings;
use crate::core::classifier::classify_openai;
use crate::core::prompt::{parse_messages, render_prompt};
use crate::error::{GenerationError, GenerationResult};
use crate::services::http::{build_client, post_json, require_key};
use crate::traits::ProviderAdapter;
use crate::types::{NormalizedResult, ProviderRequest, RawProviderResponse};

/// Framing tokens added by the chat format around the two messages
pub const MESSAGE_OVERHEAD_TOKENS: u32 = 11;

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

pub struct OpenAiAdapter {
    settings: ProviderSettings,
    client: reqwest::Client,
    api_key: String,
    tokenizer: CoreBPE,
}

impl OpenAiAdapter {
    pub fn new(settings: ProviderSettings, timeout: Duration) -> GenerationResult<Self> {
        let api_key = require_key(&settings.credentials.api_key, "OPENAI_API_KEY")?;
        let tokenizer = tokenizer_for(&settings.model)?;

        Ok(Self {
            client: build_client(timeout)?,
            settings,
            api_key,
            tokenizer,
        })
    }

    fn system_prompt(&self, choice_count: u32) -> String {
        render_prompt(&self.settings.prompt_template, choice_count)
    }

    fn count_tokens(&self, text: &str) -> u32 {
        self.tokenizer.encode_with_special_tokens(text).len() as u32
    }
}

/// Tokenizer for the model, `cl100k_base` when the model is unknown
fn tokenizer_for(model: &str) -> GenerationResult<CoreBPE> {
    tiktoken_rs::get_bpe_from_model(model)
        .or_else(|_| tiktoken_rs::cl100k_base())
        .map_err(|e| GenerationError::ConfigError {
            message: format!("failed to load tokenizer for {model}: {e}"),
        })
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::OpenAI
    }

    fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    async fn estimate_tokens(&self, input_text: &str, choice_count: u32) -> Result<u32, ApiFailure> {
        let system = self.count_tokens(&self.system_prompt(choice_count));
        let user = self.count_tokens(input_text);
        Ok(system + user + MESSAGE_OVERHEAD_TOKENS)
    }

    fn build_request(&self, input_text: &str, choice_count: u32) -> ProviderRequest {
        let body = serde_json::json!({
            "model": self.settings.model,
            "messages": [
                {
                    "role": "system",
                    "content": self.system_prompt(choice_count)
                },
                {
                    "role": "user",
                    "content": input_text
                }
            ],
            "temperature": self.settings.temperature,
            "max_tokens": self.settings.max_output_tokens,
            "response_format": { "type": "json_object" }
        });

        ProviderRequest {
            provider: ProviderId::OpenAI,
            url: self.settings.endpoint(COMPLETIONS_PATH),
            body,
            choice_count,
        }
    }

    async fn send(&self, request: &ProviderRequest) -> Result<RawProviderResponse, ApiFailure> {
        let mut builder = self.client.post(&request.url).bearer_auth(&self.api_key);
        if let Some(organization) = &self.settings.credentials.organization {
            builder = builder.header("OpenAI-Organization", organization);
        }

        let reply = post_json(builder, &request.body).await?;
        Ok(RawProviderResponse::new(reply.body, reply.latency))
    }

    fn parse(&self, raw: RawProviderResponse, _choice_count: u32) -> Result<NormalizedResult, ApiFailure> {
        let choice = raw
            .body
            .get("choices")
            .and_then(|choices| choices.get(0))
            .ok_or_else(|| ApiFailure::MalformedResponse("No choices in response".to_string()))?;

        let reason = choice.get("finish_reason").and_then(|r| r.as_str());
        let mut result = NormalizedResult::new(classify_openai(reason), raw.latency);
        result.raw_finish_reason = reason.map(str::to_string);

        let usage = raw.body.get("usage");
        let prompt_tokens = usage
            .and_then(|u| u.get("prompt_tokens"))
            .and_then(|t| t.as_u64())
            .unwrap_or(0);
        let completion_tokens = usage
            .and_then(|u| u.get("completion_tokens"))
            .and_then(|t| t.as_u64())
            .unwrap_or(0);
        result.usage = TokenUsage::new(prompt_tokens, completion_tokens);

        if let Some(created) = raw
            .body
            .get("created")
            .and_then(|c| c.as_i64())
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        {
            result.provider_timestamp = created;
        }

        if result.finish == FinishStatus::Success {
            let content = choice
                .get("message")
                .and_then(|message| message.get("content"))
                .and_then(|content| content.as_str())
                .ok_or_else(|| ApiFailure::MalformedResponse("No content in response".to_string()))?;
            result.candidates = parse_messages(content)?;
        }

        debug!(finish = %result.finish, candidates = result.candidates.len(), "Parsed OpenAI response");
        Ok(result)
    }
}
