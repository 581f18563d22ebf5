pub mod bedrock_adapter;
pub mod cohere_adapter;
pub mod http;
pub mod openai_adapter;
pub mod registry;
pub mod sentence_checker;
pub mod telemetry;

pub use bedrock_adapter::BedrockAdapter;
pub use cohere_adapter::CohereAdapter;
pub use openai_adapter::OpenAiAdapter;
pub use registry::ProviderRegistry;
pub use sentence_checker::SentenceChecker;
pub use telemetry::FileTelemetrySink;

#[cfg(test)]
mod tests;
