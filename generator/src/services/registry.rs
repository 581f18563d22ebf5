//! Lazily built, shared provider adapters

use std::collections::HashMap;
use std::sync::Arc;

use shared::ProviderId;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::GeneratorConfig;
use crate::error::GenerationResult;
use crate::services::{BedrockAdapter, CohereAdapter, OpenAiAdapter};
use crate::traits::ProviderAdapter;

/// One adapter per provider, built on first use and shared afterwards
///
/// Concurrent first use of the same provider builds the adapter exactly once.
pub struct ProviderRegistry {
    config: Arc<GeneratorConfig>,
    adapters: HashMap<ProviderId, OnceCell<Arc<dyn ProviderAdapter>>>,
}

impl ProviderRegistry {
    pub fn new(config: Arc<GeneratorConfig>) -> Self {
        let adapters = ProviderId::ALL.iter().map(|p| (*p, OnceCell::new())).collect();
        Self { config, adapters }
    }

    /// Pre-seed an adapter, replacing lazy construction for that provider
    pub fn with_adapter(mut self, provider: ProviderId, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(provider, OnceCell::new_with(Some(adapter)));
        self
    }

    /// Shared adapter for `provider`, building it on first call
    pub async fn adapter(&self, provider: ProviderId) -> GenerationResult<Arc<dyn ProviderAdapter>> {
        let cell = match self.adapters.get(&provider) {
            Some(cell) => cell,
            None => {
                return Err(shared::SharedError::UnknownProvider {
                    input: provider.to_string(),
                }
                .into())
            }
        };

        cell.get_or_try_init(|| async { self.build(provider) })
            .await
            .cloned()
    }

    /// Whether the adapter for `provider` has been built yet
    pub fn is_initialized(&self, provider: ProviderId) -> bool {
        self.adapters
            .get(&provider)
            .map(|cell| cell.initialized())
            .unwrap_or(false)
    }

    fn build(&self, provider: ProviderId) -> GenerationResult<Arc<dyn ProviderAdapter>> {
        let settings = self.config.provider(provider)?.clone();
        let timeout = self.config.request_timeout;

        let adapter: Arc<dyn ProviderAdapter> = match provider {
            ProviderId::OpenAI => Arc::new(OpenAiAdapter::new(settings, timeout)?),
            ProviderId::Cohere => Arc::new(CohereAdapter::new(settings, timeout)?),
            ProviderId::Anthropic => Arc::new(BedrockAdapter::new(settings, timeout)?),
        };

        info!(provider = %provider, model = %adapter.settings().model, "Provider adapter initialized");
        Ok(adapter)
    }
}
