//! Text generation endpoint messages

use serde::{Deserialize, Serialize};

use crate::types::ProviderId;

/// Body of `POST /api/v1/text-generation/generate`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TextGenerationInput {
    pub input_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderId>,
}

/// Successful text generation response
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TextGenerationOutput {
    pub generated_texts: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_default_to_none() {
        let input: TextGenerationInput = serde_json::from_str(r#"{"input_text": "hello"}"#).unwrap();
        assert_eq!(input.input_text, "hello");
        assert!(input.user.is_none());
        assert!(input.provider.is_none());
    }

    #[test]
    fn test_provider_field_parses() {
        let input: TextGenerationInput =
            serde_json::from_str(r#"{"input_text": "hello", "user": "u1", "provider": "cohere"}"#).unwrap();
        assert_eq!(input.provider, Some(ProviderId::Cohere));
        assert_eq!(input.user.as_deref(), Some("u1"));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let result = serde_json::from_str::<TextGenerationInput>(r#"{"input_text": "hello", "provider": "gemini"}"#);
        assert!(result.is_err());
    }
}
