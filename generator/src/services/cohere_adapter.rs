//! Cohere generate adapter

use std::time::Duration;

use async_trait::async_trait;
use shared::{ApiFailure, FinishStatus, ProviderId, TokenUsage};
use tracing::{debug, warn};

use crate::config::ProviderSettings;
use crate::core::classifier::classify_cohere_generations;
use crate::core::prompt::{extract_fenced, render_prompt};
use crate::error::GenerationResult;
use crate::services::http::{build_client, post_json, require_key};
use crate::traits::ProviderAdapter;
use crate::types::{NormalizedResult, ProviderRequest, RawProviderResponse};

const GENERATE_PATH: &str = "/v1/generate";
const TOKENIZE_PATH: &str = "/v1/tokenize";
/// Stand-in for a generation without `finish_reason`; classifies as ambiguous
const MISSING_FINISH_REASON: &str = "UNKNOWN";

pub struct CohereAdapter {
    settings: ProviderSettings,
    client: reqwest::Client,
    api_key: String,
}

impl CohereAdapter {
    pub fn new(settings: ProviderSettings, timeout: Duration) -> GenerationResult<Self> {
        let api_key = require_key(&settings.credentials.api_key, "COHERE_API_KEY")?;

        Ok(Self {
            client: build_client(timeout)?,
            settings,
            api_key,
        })
    }

    /// Each generation carries one fenced candidate
    fn prompt(&self, input_text: &str) -> String {
        format!("{}\n\nText: {}", render_prompt(&self.settings.prompt_template, 1), input_text)
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.post(url).bearer_auth(&self.api_key);
        if let Some(client_name) = &self.settings.credentials.client_name {
            builder = builder.header("X-Client-Name", client_name);
        }
        builder
    }
}

fn as_count(value: Option<&serde_json::Value>) -> u64 {
    value
        .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f as u64)))
        .unwrap_or(0)
}

#[async_trait]
impl ProviderAdapter for CohereAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Cohere
    }

    fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    async fn estimate_tokens(&self, input_text: &str, _choice_count: u32) -> Result<u32, ApiFailure> {
        let body = serde_json::json!({
            "text": self.prompt(input_text),
            "model": self.settings.model
        });

        let reply = post_json(self.post(&self.settings.endpoint(TOKENIZE_PATH)), &body).await?;
        let tokens = reply
            .body
            .get("tokens")
            .and_then(|tokens| tokens.as_array())
            .ok_or_else(|| ApiFailure::MalformedResponse("No tokens in tokenize response".to_string()))?;

        Ok(tokens.len() as u32)
    }

    fn build_request(&self, input_text: &str, choice_count: u32) -> ProviderRequest {
        let body = serde_json::json!({
            "model": self.settings.model,
            "prompt": self.prompt(input_text),
            "num_generations": choice_count,
            "max_tokens": self.settings.max_output_tokens,
            "temperature": self.settings.temperature
        });

        ProviderRequest {
            provider: ProviderId::Cohere,
            url: self.settings.endpoint(GENERATE_PATH),
            body,
            choice_count,
        }
    }

    async fn send(&self, request: &ProviderRequest) -> Result<RawProviderResponse, ApiFailure> {
        let reply = post_json(self.post(&request.url), &request.body).await?;
        Ok(RawProviderResponse::new(reply.body, reply.latency))
    }

    fn parse(&self, raw: RawProviderResponse, _choice_count: u32) -> Result<NormalizedResult, ApiFailure> {
        let generations = raw
            .body
            .get("generations")
            .and_then(|g| g.as_array())
            .ok_or_else(|| ApiFailure::MalformedResponse("No generations in response".to_string()))?;

        let reasons: Vec<&str> = generations
            .iter()
            .map(|g| g.get("finish_reason").and_then(|r| r.as_str()).unwrap_or(MISSING_FINISH_REASON))
            .collect();
        let (finish, partial) = classify_cohere_generations(&reasons);

        let mut result = NormalizedResult::new(finish, raw.latency);
        result.partial = partial;
        result.raw_finish_reason = Some(reasons.join(","));

        let billed = raw.body.get("meta").and_then(|m| m.get("billed_units"));
        result.usage = TokenUsage::new(
            as_count(billed.and_then(|b| b.get("input_tokens"))),
            as_count(billed.and_then(|b| b.get("output_tokens"))),
        );

        if finish == FinishStatus::Success {
            for (generation, reason) in generations.iter().zip(&reasons) {
                if *reason != "COMPLETE" {
                    continue;
                }
                let text = generation.get("text").and_then(|t| t.as_str()).unwrap_or_default();
                match extract_fenced(text) {
                    Some(candidate) => result.candidates.push(candidate),
                    None => warn!("Cohere generation without a fenced candidate"),
                }
            }
        }

        debug!(finish = %result.finish, partial, candidates = result.candidates.len(), "Parsed Cohere response");
        Ok(result)
    }
}
