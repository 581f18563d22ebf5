//! Request dispatch: validate, resolve provider, admit, run retries

use std::sync::Arc;

use async_trait::async_trait;
use shared::TextGenerationInput;
use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::core::budget::TokenBudgetChecker;
use crate::core::retry::RetryController;
use crate::error::{GenerationError, GenerationResult};
use crate::services::{FileTelemetrySink, ProviderRegistry, SentenceChecker};
use crate::traits::{TelemetrySink, TextGenerationService};
use crate::types::GenerationRequest;

/// Entry point for text generation
///
/// Never retries on its own; it forwards the retry controller's terminal outcome.
pub struct Dispatcher {
    config: Arc<GeneratorConfig>,
    registry: Arc<ProviderRegistry>,
    checker: Arc<SentenceChecker>,
    budget: TokenBudgetChecker,
    retry: RetryController,
}

impl Dispatcher {
    pub fn new(config: Arc<GeneratorConfig>, registry: Arc<ProviderRegistry>, checker: Arc<SentenceChecker>) -> Self {
        let retry = RetryController::new(config.retry.clone());
        Self {
            config,
            registry,
            checker,
            budget: TokenBudgetChecker::new(),
            retry,
        }
    }

    /// Attach a telemetry sink for per-attempt records
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.retry = self.retry.with_telemetry(telemetry);
        self
    }

    /// Build a dispatcher with live adapters, the configured dictionary and file telemetry
    pub async fn from_config(config: GeneratorConfig) -> GenerationResult<Self> {
        let checker = match &config.words_file {
            Some(path) => SentenceChecker::from_file(path).await?,
            None => SentenceChecker::embedded(),
        };
        let telemetry = FileTelemetrySink::new(config.telemetry_dir.clone());

        let config = Arc::new(config);
        let registry = Arc::new(ProviderRegistry::new(config.clone()));

        Ok(Self::new(config, registry, Arc::new(checker)).with_telemetry(Arc::new(telemetry)))
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run one generation cycle for a validated request
    pub async fn dispatch(&self, request: GenerationRequest) -> GenerationResult<Vec<String>> {
        if self.checker.is_meaningless(&request.input_text) {
            warn!(provider = %request.provider, "Rejected meaningless input");
            return Err(GenerationError::MeaninglessInput);
        }

        let adapter = self.registry.adapter(request.provider).await?;
        let choice_count = adapter.settings().choice_count;

        self.budget
            .admit(adapter.as_ref(), &request.input_text, choice_count)
            .await?;

        let result = self.retry.run(adapter.as_ref(), &request).await?;

        info!(
            provider = %request.provider,
            candidates = result.candidates.len(),
            prompt_tokens = result.usage.prompt_tokens,
            completion_tokens = result.usage.completion_tokens,
            "Text generation completed"
        );

        Ok(result.candidates)
    }
}

#[async_trait]
impl TextGenerationService for Dispatcher {
    async fn generate(&self, input: TextGenerationInput) -> GenerationResult<Vec<String>> {
        let request = GenerationRequest::new(
            input.input_text,
            input.user,
            input.provider,
            self.config.default_provider,
            &self.config.limits,
        )?;

        self.dispatch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use shared::{FinishStatus, ProviderId};

    use crate::config::ProviderSettings;
    use crate::traits::{MockProviderAdapter, ProviderAdapter};
    use crate::types::{NormalizedResult, ProviderRequest, RawProviderResponse};

    fn untouched_adapter(provider: ProviderId) -> MockProviderAdapter {
        let mut adapter = MockProviderAdapter::new();
        adapter.expect_provider().return_const(provider);
        adapter
            .expect_settings()
            .return_const(ProviderSettings::with_defaults(provider));
        adapter.expect_estimate_tokens().never();
        adapter.expect_send().never();
        adapter
    }

    fn dispatcher_with(provider: ProviderId, adapter: MockProviderAdapter) -> Dispatcher {
        let config = Arc::new(GeneratorConfig::default());
        let adapter: Arc<dyn ProviderAdapter> = Arc::new(adapter);
        let registry = Arc::new(ProviderRegistry::new(config.clone()).with_adapter(provider, adapter));
        Dispatcher::new(config, registry, Arc::new(SentenceChecker::embedded()))
    }

    fn input(text: &str, provider: Option<ProviderId>) -> TextGenerationInput {
        TextGenerationInput {
            input_text: text.to_string(),
            user: None,
            provider,
        }
    }

    #[tokio::test]
    async fn test_meaningless_input_rejected_before_provider() {
        let dispatcher = dispatcher_with(ProviderId::OpenAI, untouched_adapter(ProviderId::OpenAI));

        let result = dispatcher.generate(input("asdkj qwoeiru", None)).await;

        assert_eq!(result, Err(GenerationError::MeaninglessInput));
        assert_eq!(result.unwrap_err().status_code(), 422);
    }

    #[tokio::test]
    async fn test_over_budget_prompt_never_sent() {
        let mut adapter = MockProviderAdapter::new();
        let mut settings = ProviderSettings::with_defaults(ProviderId::Cohere);
        settings.max_prompt_tokens = 50;
        adapter.expect_provider().return_const(ProviderId::Cohere);
        adapter.expect_settings().return_const(settings);
        adapter.expect_estimate_tokens().times(1).returning(|_, _| Ok(51));
        adapter.expect_build_request().never();
        adapter.expect_send().never();

        let dispatcher = dispatcher_with(ProviderId::Cohere, adapter);
        let result = dispatcher
            .generate(input("Salon U is an award-winning salon", Some(ProviderId::Cohere)))
            .await;

        assert!(matches!(result, Err(GenerationError::PromptTooLarge { estimated: 51, limit: 50, .. })));
    }

    #[tokio::test]
    async fn test_default_provider_returns_candidates() {
        let mut adapter = MockProviderAdapter::new();
        adapter.expect_provider().return_const(ProviderId::OpenAI);
        adapter
            .expect_settings()
            .return_const(ProviderSettings::with_defaults(ProviderId::OpenAI));
        adapter.expect_estimate_tokens().times(1).returning(|_, _| Ok(120));
        adapter.expect_build_request().times(1).returning(|_, n| ProviderRequest {
            provider: ProviderId::OpenAI,
            url: "http://localhost/v1/chat/completions".to_string(),
            body: serde_json::json!({}),
            choice_count: n,
        });
        adapter
            .expect_send()
            .times(1)
            .returning(|_| Ok(RawProviderResponse::new(serde_json::json!({}), Duration::from_millis(8))));
        adapter.expect_parse().times(1).returning(|_, _| {
            let mut result = NormalizedResult::new(FinishStatus::Success, Duration::from_millis(8));
            result.candidates = vec![
                "Salon U: award-winning style.".to_string(),
                "Discover award-winning Salon U.".to_string(),
            ];
            Ok(result)
        });

        let dispatcher = dispatcher_with(ProviderId::OpenAI, adapter);
        let texts = dispatcher
            .generate(input("Salon U is an award-winning salon", None))
            .await
            .unwrap();

        assert_eq!(texts.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_checks() {
        let dispatcher = dispatcher_with(ProviderId::OpenAI, untouched_adapter(ProviderId::OpenAI));

        let result = dispatcher.generate(input("", None)).await;

        assert!(matches!(result, Err(GenerationError::InvalidInput { .. })));
    }
}
