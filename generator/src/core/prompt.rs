//! Prompt rendering and candidate extraction helpers

use serde::Deserialize;
use shared::ApiFailure;

use crate::config::CHOICES_PLACEHOLDER;

/// Fence wrapped around each Cohere candidate
pub const FENCE: &str = "```";

/// Bedrock text completions stop on this sequence
pub const ANTHROPIC_STOP_SEQUENCE: &str = "}}";

/// Render a prompt template for the requested number of candidates (pure function)
pub fn render_prompt(template: &str, choice_count: u32) -> String {
    template.replace(CHOICES_PLACEHOLDER, &choice_count.to_string())
}

/// Build an Anthropic human/assistant turn prompt whose reply starts with `{`
pub fn anthropic_turns(system_prompt: &str, input_text: &str) -> String {
    format!("\n\nHuman: {system_prompt}\n\n<text>{input_text}</text>\n\nAssistant: {{")
}

/// Extract the candidate between exactly two fences, if well-formed
pub fn extract_fenced(text: &str) -> Option<String> {
    let parts: Vec<&str> = text.split(FENCE).collect();
    if parts.len() != 3 {
        return None;
    }

    let candidate = parts[1].trim();
    if candidate.is_empty() {
        None
    } else {
        Some(candidate.to_string())
    }
}

#[derive(Deserialize)]
struct MessagesBody {
    messages: Vec<String>,
}

/// Parse a `{"messages": [...]}` JSON body into candidates
pub fn parse_messages(content: &str) -> Result<Vec<String>, ApiFailure> {
    serde_json::from_str::<MessagesBody>(content.trim())
        .map(|body| body.messages)
        .map_err(|e| ApiFailure::MalformedResponse(format!("expected a JSON object with 'messages': {e}")))
}

/// Rebuild the JSON object of an Anthropic completion that was forced to start
/// with `{` and cut at the `}}` stop sequence
pub fn parse_anthropic_completion(completion: &str) -> Result<Vec<String>, ApiFailure> {
    let body = format!("{{{}", completion.trim_end());

    // The stop sequence removes up to two closing braces
    let mut last_error = None;
    for suffix in ["", "}", "}}"] {
        match parse_messages(&format!("{body}{suffix}")) {
            Ok(messages) => return Ok(messages),
            Err(e) => last_error = Some(e),
        }
    }

    Err(last_error.unwrap_or_else(|| ApiFailure::MalformedResponse("empty completion".to_string())))
}
