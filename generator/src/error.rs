//! Generation error types
//!
//! Every terminal outcome a caller can see. The HTTP layer turns these into
//! status codes through [`GenerationError::status_code`] and
//! [`GenerationError::user_message`].

use thiserror::Error;
use shared::{ProviderId, SharedError};

/// Result type for generation operations
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Generation error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Input text contains no recognizable words")]
    MeaninglessInput,

    #[error("Prompt too large for {provider}: {estimated} tokens, limit {limit}")]
    PromptTooLarge { provider: ProviderId, estimated: u32, limit: u32 },

    #[error("Authentication with {provider} failed")]
    ProviderAuth { provider: ProviderId },

    #[error("{provider} rejected the request: {message}")]
    ProviderRejected { provider: ProviderId, message: String },

    #[error("{provider} is rate limiting requests")]
    RateLimited { provider: ProviderId },

    #[error("Retries exhausted for {provider} after {attempts} attempts")]
    RetriesExhausted { provider: ProviderId, attempts: u32 },

    #[error("Content filtered by {provider}")]
    ContentFiltered { provider: ProviderId },

    #[error("Generation cancelled by {provider}")]
    UserCancelled { provider: ProviderId },

    #[error("{provider} stopped without a usable finish reason")]
    AmbiguousFinish { provider: ProviderId },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Unclassified failure: {message}")]
    Unclassified { message: String },
}

impl GenerationError {
    /// HTTP status the error surfaces as
    pub fn status_code(&self) -> u16 {
        match self {
            GenerationError::InvalidInput { .. }
            | GenerationError::MeaninglessInput
            | GenerationError::PromptTooLarge { .. }
            | GenerationError::ContentFiltered { .. } => 422,
            GenerationError::UserCancelled { .. } => 400,
            GenerationError::ProviderAuth { .. } | GenerationError::ProviderRejected { .. } => 424,
            GenerationError::RateLimited { .. } | GenerationError::RetriesExhausted { .. } => 429,
            GenerationError::AmbiguousFinish { .. } => 502,
            GenerationError::ConfigError { .. } | GenerationError::Unclassified { .. } => 418,
        }
    }

    /// Message safe to show to the caller; never includes provider internals
    pub fn user_message(&self) -> String {
        match self {
            GenerationError::InvalidInput { message } => message.clone(),
            GenerationError::MeaninglessInput => {
                "Input text does not contain any recognizable words, please provide a meaningful text.".to_string()
            }
            GenerationError::PromptTooLarge { .. } => {
                "Input text is too long, please reduce the input length and try again.".to_string()
            }
            GenerationError::ProviderAuth { .. } | GenerationError::ProviderRejected { .. } => {
                "Text generation service is unavailable, please contact the administrator.".to_string()
            }
            GenerationError::RateLimited { .. } | GenerationError::RetriesExhausted { .. } => {
                "Too many requests, please try again later.".to_string()
            }
            GenerationError::ContentFiltered { .. } | GenerationError::UserCancelled { .. } => {
                "Generated content was rejected, please resend with different content.".to_string()
            }
            GenerationError::AmbiguousFinish { .. } => {
                "Text generation returned an inconclusive result, please try again.".to_string()
            }
            GenerationError::ConfigError { .. } | GenerationError::Unclassified { .. } => {
                "Text generation failed, please contact the administrator.".to_string()
            }
        }
    }
}

impl From<SharedError> for GenerationError {
    fn from(err: SharedError) -> Self {
        match err {
            SharedError::InvalidInput { message } => GenerationError::InvalidInput { message },
            other => GenerationError::ConfigError { message: other.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let provider = ProviderId::OpenAI;
        assert_eq!(GenerationError::MeaninglessInput.status_code(), 422);
        assert_eq!(GenerationError::PromptTooLarge { provider, estimated: 10, limit: 5 }.status_code(), 422);
        assert_eq!(GenerationError::ProviderAuth { provider }.status_code(), 424);
        assert_eq!(GenerationError::RetriesExhausted { provider, attempts: 3 }.status_code(), 429);
        assert_eq!(GenerationError::RateLimited { provider }.status_code(), 429);
        assert_eq!(GenerationError::ContentFiltered { provider }.status_code(), 422);
        assert_eq!(GenerationError::UserCancelled { provider }.status_code(), 400);
        assert_eq!(GenerationError::Unclassified { message: "boom".into() }.status_code(), 418);
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = GenerationError::Unclassified {
            message: "secret stack detail".into(),
        };
        assert!(!err.user_message().contains("secret"));

        let err = GenerationError::ProviderRejected {
            provider: ProviderId::Cohere,
            message: "invalid model command-x".into(),
        };
        assert!(!err.user_message().contains("command-x"));
    }
}
