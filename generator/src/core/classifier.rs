//! Finish-reason classification
//!
//! Maps each provider's native finish vocabulary onto [`FinishStatus`] and
//! decides what the retry controller does with an attempt.

use shared::{FinishStatus, ProviderId};

use crate::error::GenerationError;
use crate::types::NormalizedResult;

/// What to do with one attempt's result
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// Terminal success, return candidates
    Accept,
    /// Try again; `backoff` requests the delay before the next attempt
    Retry { backoff: bool, reason: String },
    /// Terminal failure, surface immediately
    Fail(GenerationError),
}

/// OpenAI `finish_reason`
pub fn classify_openai(reason: Option<&str>) -> FinishStatus {
    match reason {
        Some("stop") => FinishStatus::Success,
        Some("length") => FinishStatus::Truncated,
        Some("content_filter") => FinishStatus::Filtered,
        // null, function_call, tool_calls and anything new
        _ => FinishStatus::Ambiguous,
    }
}

/// Cohere per-generation `finish_reason`
pub fn classify_cohere(reason: &str) -> FinishStatus {
    match reason {
        "COMPLETE" => FinishStatus::Success,
        "MAX_TOKENS" => FinishStatus::Truncated,
        "ERROR_TOXIC" => FinishStatus::Filtered,
        "ERROR" | "ERROR_LIMIT" => FinishStatus::RateLimited,
        "USER_CANCEL" => FinishStatus::UserCancelled,
        _ => FinishStatus::Ambiguous,
    }
}

/// Anthropic `stop_reason` as returned by Bedrock text completions
pub fn classify_anthropic(reason: Option<&str>) -> FinishStatus {
    match reason {
        Some("stop_sequence") => FinishStatus::Success,
        Some("max_tokens") => FinishStatus::Truncated,
        _ => FinishStatus::Ambiguous,
    }
}

/// Aggregate status of a multi-generation Cohere reply
///
/// Returns the status and whether the remaining candidates form a partial
/// success. A single `ERROR_LIMIT` among several generations is tolerated;
/// two or more make the whole attempt rate-limited.
pub fn classify_cohere_generations(reasons: &[&str]) -> (FinishStatus, bool) {
    if reasons.is_empty() {
        return (FinishStatus::Ambiguous, false);
    }

    let limit_count = reasons.iter().filter(|r| **r == "ERROR_LIMIT").count();
    let statuses: Vec<FinishStatus> = reasons
        .iter()
        .filter(|r| **r != "ERROR_LIMIT")
        .map(|r| classify_cohere(r))
        .collect();

    // Fatal statuses win over everything else
    for fatal in [FinishStatus::Filtered, FinishStatus::UserCancelled] {
        if statuses.contains(&fatal) {
            return (fatal, false);
        }
    }

    if limit_count > 1 || (limit_count == 1 && reasons.len() == 1) {
        return (FinishStatus::RateLimited, false);
    }

    for status in [FinishStatus::RateLimited, FinishStatus::Ambiguous, FinishStatus::Truncated] {
        if statuses.contains(&status) {
            return (status, false);
        }
    }

    (FinishStatus::Success, limit_count == 1)
}

/// Decide the retry controller's next step for a parsed attempt
pub fn decide(provider: ProviderId, result: &NormalizedResult, requested: u32) -> AttemptOutcome {
    match result.finish {
        FinishStatus::Success => {
            let count = result.candidates.len();
            if result.partial && count > 0 {
                AttemptOutcome::Accept
            } else if count == requested as usize {
                AttemptOutcome::Accept
            } else {
                AttemptOutcome::Retry {
                    backoff: false,
                    reason: format!("expected {requested} candidates, got {count}"),
                }
            }
        }
        FinishStatus::Truncated => AttemptOutcome::Retry {
            backoff: false,
            reason: "output truncated at max tokens".to_string(),
        },
        FinishStatus::RateLimited => AttemptOutcome::Retry {
            backoff: true,
            reason: "provider signaled rate limit or transient error".to_string(),
        },
        FinishStatus::Filtered => AttemptOutcome::Fail(GenerationError::ContentFiltered { provider }),
        FinishStatus::UserCancelled => AttemptOutcome::Fail(GenerationError::UserCancelled { provider }),
        FinishStatus::Ambiguous => AttemptOutcome::Fail(GenerationError::AmbiguousFinish { provider }),
    }
}
