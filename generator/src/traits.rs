//! Generator trait definitions for dependency injection

use async_trait::async_trait;

use shared::{ApiFailure, ProviderId, TextGenerationInput};
use crate::config::ProviderSettings;
use crate::error::GenerationResult;
use crate::types::{ExecutionRecord, NormalizedResult, ProviderRequest, RawProviderResponse};

/// Provider-specific request building, sending and response parsing
#[mockall::automock]
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider this adapter talks to
    fn provider(&self) -> ProviderId;

    /// Settings the adapter was built from
    fn settings(&self) -> &ProviderSettings;

    /// Estimate prompt tokens for the rendered prompt plus user input
    async fn estimate_tokens(&self, input_text: &str, choice_count: u32) -> Result<u32, ApiFailure>;

    /// Build the provider request for one attempt
    fn build_request(&self, input_text: &str, choice_count: u32) -> ProviderRequest;

    /// Send a request and return the raw reply
    async fn send(&self, request: &ProviderRequest) -> Result<RawProviderResponse, ApiFailure>;

    /// Turn a raw reply into candidates and a classified finish status
    fn parse(&self, raw: RawProviderResponse, choice_count: u32) -> Result<NormalizedResult, ApiFailure>;
}

/// Destination for per-attempt telemetry records
#[mockall::automock]
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    async fn record(&self, record: ExecutionRecord) -> GenerationResult<()>;
}

/// Text generation entry point used by the HTTP layer
#[mockall::automock]
#[async_trait]
pub trait TextGenerationService: Send + Sync {
    async fn generate(&self, input: TextGenerationInput) -> GenerationResult<Vec<String>>;
}
