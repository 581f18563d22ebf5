//! Anthropic text completions through Amazon Bedrock
//!
//! Authenticates with a Bedrock API key sent as a bearer token. Token counts
//! for the reply come back in response headers; prompt estimates use the
//! Bedrock `count-tokens` operation.

use std::time::Duration;

use async_trait::async_trait;
use shared::{ApiFailure, FinishStatus, ProviderId, TokenUsage};
use tracing::debug;

use crate::config::ProviderSettings;
use crate::core::classifier::classify_anthropic;
use crate::core::prompt::{anthropic_turns, parse_anthropic_completion, render_prompt, ANTHROPIC_STOP_SEQUENCE};
use crate::error::GenerationResult;
use crate::services::http::{build_client, header_u64, post_json, require_key};
use crate::traits::ProviderAdapter;
use crate::types::{NormalizedResult, ProviderRequest, RawProviderResponse};

pub const INPUT_TOKENS_HEADER: &str = "x-amzn-bedrock-input-token-count";
pub const OUTPUT_TOKENS_HEADER: &str = "x-amzn-bedrock-output-token-count";

pub struct BedrockAdapter {
    settings: ProviderSettings,
    client: reqwest::Client,
    api_key: String,
}

impl BedrockAdapter {
    pub fn new(settings: ProviderSettings, timeout: Duration) -> GenerationResult<Self> {
        let api_key = require_key(&settings.credentials.api_key, "AWS_BEARER_TOKEN_BEDROCK")?;

        Ok(Self {
            client: build_client(timeout)?,
            settings,
            api_key,
        })
    }

    fn invoke_body(&self, input_text: &str, choice_count: u32) -> serde_json::Value {
        let system = render_prompt(&self.settings.prompt_template, choice_count);
        serde_json::json!({
            "prompt": anthropic_turns(&system, input_text),
            "max_tokens_to_sample": self.settings.max_output_tokens,
            "temperature": self.settings.temperature,
            "stop_sequences": [ANTHROPIC_STOP_SEQUENCE]
        })
    }

    fn model_url(&self, operation: &str) -> String {
        self.settings
            .endpoint(&format!("/model/{}/{}", self.settings.model, operation))
    }
}

#[async_trait]
impl ProviderAdapter for BedrockAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    async fn estimate_tokens(&self, input_text: &str, choice_count: u32) -> Result<u32, ApiFailure> {
        let body = serde_json::json!({
            "input": {
                "invokeModel": {
                    "body": self.invoke_body(input_text, choice_count).to_string()
                }
            }
        });

        let builder = self.client.post(self.model_url("count-tokens")).bearer_auth(&self.api_key);
        let reply = post_json(builder, &body).await?;

        reply
            .body
            .get("inputTokens")
            .and_then(|t| t.as_u64())
            .map(|t| t as u32)
            .ok_or_else(|| ApiFailure::MalformedResponse("No inputTokens in count-tokens response".to_string()))
    }

    fn build_request(&self, input_text: &str, choice_count: u32) -> ProviderRequest {
        ProviderRequest {
            provider: ProviderId::Anthropic,
            url: self.model_url("invoke"),
            body: self.invoke_body(input_text, choice_count),
            choice_count,
        }
    }

    async fn send(&self, request: &ProviderRequest) -> Result<RawProviderResponse, ApiFailure> {
        let builder = self
            .client
            .post(&request.url)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json");
        let reply = post_json(builder, &request.body).await?;

        let mut raw = RawProviderResponse::new(reply.body, reply.latency);
        raw.header_usage = match (
            header_u64(&reply.headers, INPUT_TOKENS_HEADER),
            header_u64(&reply.headers, OUTPUT_TOKENS_HEADER),
        ) {
            (None, None) => None,
            (input, output) => Some(TokenUsage::new(input.unwrap_or(0), output.unwrap_or(0))),
        };
        Ok(raw)
    }

    fn parse(&self, raw: RawProviderResponse, _choice_count: u32) -> Result<NormalizedResult, ApiFailure> {
        let completion = raw
            .body
            .get("completion")
            .and_then(|c| c.as_str())
            .ok_or_else(|| ApiFailure::MalformedResponse("No completion in response".to_string()))?;

        let reason = raw.body.get("stop_reason").and_then(|r| r.as_str());
        let mut result = NormalizedResult::new(classify_anthropic(reason), raw.latency);
        result.raw_finish_reason = reason.map(str::to_string);
        result.usage = raw.header_usage.unwrap_or_default();

        if result.finish == FinishStatus::Success {
            result.candidates = parse_anthropic_completion(completion)?;
        }

        debug!(finish = %result.finish, candidates = result.candidates.len(), "Parsed Bedrock response");
        Ok(result)
    }
}
