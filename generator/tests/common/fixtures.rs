//! Canned provider replies and configuration for scenario tests

use std::collections::HashMap;

use generator::GeneratorConfig;
use serde_json::json;

pub struct TestFixtures;

impl TestFixtures {
    pub const SALON_TEXT: &'static str = "Salon U is an award-winning salon";
    pub const GIBBERISH: &'static str = "asdkj qwoeiru";

    /// Configuration with every provider pointed at `base_url` and a short retry delay
    pub fn config(base_url: &str, telemetry_dir: &str, extra: &[(&str, &str)]) -> GeneratorConfig {
        let mut env: HashMap<String, String> = [
            ("OPENAI_API_KEY", "sk-test"),
            ("COHERE_API_KEY", "co-test"),
            ("AWS_BEARER_TOKEN_BEDROCK", "bedrock-test"),
            ("TEXT_RETRY_DELAY_MS", "20"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        for prefix in ["OPENAI", "COHERE", "BEDROCK"] {
            env.insert(format!("{prefix}_BASE_URL"), base_url.to_string());
        }
        env.insert("TELEMETRY_DIR".to_string(), telemetry_dir.to_string());
        for (k, v) in extra {
            env.insert(k.to_string(), v.to_string());
        }

        GeneratorConfig::from_lookup(move |key| env.get(key).cloned()).unwrap()
    }

    pub fn openai_completion(finish_reason: &str, messages: &[&str]) -> serde_json::Value {
        let content = json!({ "messages": messages }).to_string();
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "gpt-3.5-turbo-1106",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": finish_reason
            }],
            "usage": { "prompt_tokens": 61, "completion_tokens": 35, "total_tokens": 96 }
        })
    }

    pub fn cohere_generations(items: &[(&str, &str)]) -> serde_json::Value {
        let generations: Vec<serde_json::Value> = items
            .iter()
            .map(|(text, reason)| json!({ "id": "g", "text": text, "finish_reason": reason }))
            .collect();
        json!({
            "id": "resp",
            "generations": generations,
            "meta": { "billed_units": { "input_tokens": 70, "output_tokens": 22 } }
        })
    }

    pub fn cohere_tokens(count: usize) -> serde_json::Value {
        json!({ "tokens": vec![1; count] })
    }
}
