//! Tests for generator services
//!
//! Provider adapters run against local wiremock servers standing in for the
//! provider APIs.

pub mod bedrock_adapter;

use shared::ProviderId;

use crate::config::ProviderSettings;

/// Provider settings pointed at a mock server, with a test credential
pub fn mock_settings(provider: ProviderId, base_url: &str) -> ProviderSettings {
    let mut settings = ProviderSettings::with_defaults(provider);
    settings.base_url = base_url.to_string();
    settings.credentials.api_key = Some("test-key".to_string());
    settings
}
