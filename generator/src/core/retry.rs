//! Retry controller: build, send, classify, decide
//!
//! The controller is the single place that decides whether a provider attempt
//! is retried or surfaced. States per request:
//! `Idle -> Attempting -> {Success | Fatal | Exhausted}`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use shared::{ApiFailure, FailureClass, ProviderId};
use tracing::{debug, error, info, warn};

use crate::core::classifier::{decide, AttemptOutcome};
use crate::error::{GenerationError, GenerationResult};
use crate::traits::{ProviderAdapter, TelemetrySink};
use crate::types::{ExecutionRecord, GenerationRequest, NormalizedResult, TEXT_GENERATION_TASK};

/// Retry policy for provider attempts
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retry: u32,
    /// Delay before the first retry of a transient failure
    pub base_delay: Duration,
    /// Growth factor per retry; 1.0 keeps the delay fixed
    pub backoff_multiplier: f32,
}

impl RetryPolicy {
    pub fn new(max_retry: u32, base_delay: Duration, backoff_multiplier: f32) -> Self {
        Self {
            max_retry,
            base_delay,
            backoff_multiplier,
        }
    }

    /// Total attempts allowed, first one included
    pub fn max_attempts(&self) -> u32 {
        self.max_retry + 1
    }

    /// Backoff before the retry that follows failed attempt number `attempt` (1-based)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let multiplier = self.backoff_multiplier.powi(exponent) as f64;
        Duration::from_millis((self.base_delay.as_millis() as f64 * multiplier) as u64)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(2, Duration::from_secs(3), 1.0)
    }
}

/// Lifecycle of one retry session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Attempting,
    Success,
    Fatal,
    Exhausted,
}

/// Mutable state scoped to one request
#[derive(Debug, Clone)]
pub struct RetrySession {
    pub provider: ProviderId,
    pub attempt: u32,
    pub state: SessionState,
    pub last_reason: Option<String>,
}

impl RetrySession {
    pub fn new(provider: ProviderId) -> Self {
        Self {
            provider,
            attempt: 0,
            state: SessionState::Idle,
            last_reason: None,
        }
    }

    fn begin_attempt(&mut self) {
        self.state = SessionState::Attempting;
        self.attempt += 1;
    }

    fn finish(&mut self, state: SessionState) {
        self.state = state;
    }
}

/// Runs the attempt loop for one request against one adapter
#[derive(Clone)]
pub struct RetryController {
    policy: RetryPolicy,
    telemetry: Option<Arc<dyn TelemetrySink>>,
}

impl RetryController {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy, telemetry: None }
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Attempt generation until success, a fatal outcome or exhaustion
    pub async fn run(&self, adapter: &dyn ProviderAdapter, request: &GenerationRequest) -> GenerationResult<NormalizedResult> {
        let provider = adapter.provider();
        let choice_count = adapter.settings().choice_count;
        let mut session = RetrySession::new(provider);

        loop {
            session.begin_attempt();
            debug!(provider = %provider, attempt = session.attempt, "Sending provider request");

            let provider_request = adapter.build_request(&request.input_text, choice_count);
            let outcome = match adapter.send(&provider_request).await {
                Err(failure) => {
                    self.record_failure(adapter, request, &failure, Duration::ZERO).await;
                    outcome_for_failure(provider, failure)
                }
                Ok(raw) => {
                    let latency = raw.latency;
                    match adapter.parse(raw, choice_count) {
                        Err(failure) => {
                            self.record_failure(adapter, request, &failure, latency).await;
                            outcome_for_failure(provider, failure)
                        }
                        Ok(result) => {
                            self.record_result(adapter, request, &result).await;
                            match decide(provider, &result, choice_count) {
                                AttemptOutcome::Accept => {
                                    session.finish(SessionState::Success);
                                    info!(
                                        provider = %provider,
                                        attempt = session.attempt,
                                        candidates = result.candidates.len(),
                                        partial = result.partial,
                                        latency_ms = result.latency.as_millis() as u64,
                                        "Generation succeeded"
                                    );
                                    return Ok(result);
                                }
                                other => other,
                            }
                        }
                    }
                }
            };

            match outcome {
                AttemptOutcome::Accept => unreachable!("accepted attempts return early"),
                AttemptOutcome::Fail(err) => {
                    session.finish(SessionState::Fatal);
                    warn!(provider = %provider, attempt = session.attempt, error = %err, "Generation failed");
                    return Err(err);
                }
                AttemptOutcome::Retry { backoff, reason } => {
                    session.last_reason = Some(reason);

                    if session.attempt > self.policy.max_retry {
                        session.finish(SessionState::Exhausted);
                        warn!(
                            provider = %provider,
                            attempts = session.attempt,
                            last_reason = session.last_reason.as_deref().unwrap_or_default(),
                            "Retries exhausted"
                        );
                        return Err(GenerationError::RetriesExhausted {
                            provider,
                            attempts: session.attempt,
                        });
                    }

                    info!(
                        provider = %provider,
                        attempt = session.attempt,
                        reason = session.last_reason.as_deref().unwrap_or_default(),
                        backoff,
                        "Retrying generation"
                    );

                    if backoff {
                        tokio::time::sleep(self.policy.delay_for_attempt(session.attempt)).await;
                    }
                }
            }
        }
    }

    fn base_record(adapter: &dyn ProviderAdapter, request: &GenerationRequest) -> ExecutionRecord {
        ExecutionRecord {
            created_timestamp: Utc::now(),
            task: TEXT_GENERATION_TASK.to_string(),
            provider: adapter.provider(),
            model: adapter.settings().model.clone(),
            user: request.user.clone(),
            input_messages: vec![request.input_text.clone()],
            execution_time_ms: 0,
            prompt_tokens_count: 0,
            completion_tokens_count: 0,
            generated_texts: Vec::new(),
            finish_reason: String::new(),
        }
    }

    async fn record_result(&self, adapter: &dyn ProviderAdapter, request: &GenerationRequest, result: &NormalizedResult) {
        let mut record = Self::base_record(adapter, request);
        record.execution_time_ms = result.latency.as_millis() as u64;
        record.prompt_tokens_count = result.usage.prompt_tokens;
        record.completion_tokens_count = result.usage.completion_tokens;
        record.generated_texts = result.candidates.clone();
        record.finish_reason = result
            .raw_finish_reason
            .clone()
            .unwrap_or_else(|| result.finish.to_string());

        self.emit(record).await;
    }

    /// Attempts that failed in transport or parsing carry the failure text and zero counts
    async fn record_failure(
        &self,
        adapter: &dyn ProviderAdapter,
        request: &GenerationRequest,
        failure: &ApiFailure,
        latency: Duration,
    ) {
        let mut record = Self::base_record(adapter, request);
        record.execution_time_ms = latency.as_millis() as u64;
        record.finish_reason = failure.to_string();

        self.emit(record).await;
    }

    async fn emit(&self, record: ExecutionRecord) {
        let Some(telemetry) = &self.telemetry else {
            return;
        };

        if let Err(e) = telemetry.record(record).await {
            warn!(error = %e, "Failed to record telemetry");
        }
    }
}

/// Map a typed provider failure to the controller's next step (pure function)
pub fn outcome_for_failure(provider: ProviderId, failure: ApiFailure) -> AttemptOutcome {
    match failure.class() {
        FailureClass::Transient => AttemptOutcome::Retry {
            backoff: true,
            reason: failure.to_string(),
        },
        FailureClass::RetryNow => AttemptOutcome::Retry {
            backoff: false,
            reason: failure.to_string(),
        },
        FailureClass::Auth => AttemptOutcome::Fail(GenerationError::ProviderAuth { provider }),
        FailureClass::Fatal => AttemptOutcome::Fail(GenerationError::ProviderRejected {
            provider,
            message: failure.to_string(),
        }),
        FailureClass::Unclassified => {
            error!(provider = %provider, failure = %failure, "Unclassified provider failure");
            AttemptOutcome::Fail(GenerationError::Unclassified {
                message: failure.to_string(),
            })
        }
    }
}
