//! Prompt token admission gate

use tracing::{debug, warn};

use crate::core::classifier::AttemptOutcome;
use crate::core::retry::outcome_for_failure;
use crate::error::{GenerationError, GenerationResult};
use crate::traits::ProviderAdapter;

/// Rejects requests whose estimated prompt exceeds the provider ceiling
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenBudgetChecker;

impl TokenBudgetChecker {
    pub fn new() -> Self {
        Self
    }

    /// Estimate the prompt size and compare it to `max_prompt_tokens`
    ///
    /// Runs once per request, before any generation call. Returns the estimate.
    pub async fn admit(&self, adapter: &dyn ProviderAdapter, input_text: &str, choice_count: u32) -> GenerationResult<u32> {
        let provider = adapter.provider();
        let limit = adapter.settings().max_prompt_tokens;

        let estimated = adapter
            .estimate_tokens(input_text, choice_count)
            .await
            .map_err(|failure| match outcome_for_failure(provider, failure) {
                AttemptOutcome::Fail(err) => {
                    warn!(provider = %provider, error = %err, "Token estimation failed");
                    err
                }
                // Estimation is not retried; a transient estimator failure surfaces as rate limiting
                _ => {
                    warn!(provider = %provider, "Token estimation unavailable");
                    GenerationError::RateLimited { provider }
                }
            })?;

        debug!(provider = %provider, estimated, limit, "Prompt token estimate");

        if estimated > limit {
            warn!(provider = %provider, estimated, limit, "Prompt exceeds token budget");
            return Err(GenerationError::PromptTooLarge { provider, estimated, limit });
        }

        Ok(estimated)
    }
}
