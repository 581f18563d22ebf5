//! Generator configuration loaded once at startup
//!
//! Environment variables (per provider, `<P>` is `OPENAI`, `COHERE` or `BEDROCK`):
//! - `<P>_MODEL`, `<P>_PROMPT`, `<P>_CHOICES`, `<P>_TEMPERATURE`, `<P>_MAX_TOKENS`,
//!   `<P>_MAX_PROMPT_TOKENS`, `<P>_BASE_URL`
//! - credentials: `OPENAI_API_KEY`, `OPENAI_ORGANIZATION_ID`, `COHERE_API_KEY`,
//!   `COHERE_CLIENT_NAME`, `AWS_BEARER_TOKEN_BEDROCK`, `AWS_DEFAULT_REGION`
//!
//! Global settings: `TEXT_MAX_RETRY`, `TEXT_RETRY_DELAY_MS`, `TEXT_BACKOFF_MULTIPLIER`,
//! `TEXT_MAX_INPUT_CHARS`, `TEXT_MAX_USER_CHARS`, `TEXT_DEFAULT_PROVIDER`,
//! `TELEMETRY_DIR`, `WORDS_FILE`, `PROVIDER_TIMEOUT_SECS`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use shared::{ProviderId, SharedError, SharedResult};

use crate::core::retry::RetryPolicy;

/// Placeholder replaced by the requested number of candidates
pub const CHOICES_PLACEHOLDER: &str = "{n_choices}";

const OPENAI_PROMPT: &str = "You are a marketing copywriter for beauty and wellness businesses. \
Rewrite the user's text into {n_choices} improved, engaging versions that keep the original meaning. \
Reply with a JSON object of the form {\"messages\": [\"<version 1>\", \"<version 2>\"]} and nothing else.";

const COHERE_PROMPT: &str = "You are a marketing copywriter for beauty and wellness businesses. \
Rewrite the text below into {n_choices} improved, engaging version that keeps the original meaning. \
Wrap the rewritten text in triple backticks (```) and write nothing else.";

const BEDROCK_PROMPT: &str = "You are a marketing copywriter for beauty and wellness businesses. \
Rewrite the text inside <text></text> into {n_choices} improved, engaging versions that keep the original meaning. \
Reply with a JSON object of the form {\"messages\": [\"<version 1>\", \"<version 2>\"]} and nothing else.";

/// Credentials for one provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credentials {
    pub api_key: Option<String>,
    /// OpenAI organization id
    pub organization: Option<String>,
    /// Cohere client name header
    pub client_name: Option<String>,
}

/// Per-provider settings, read-only after startup
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub provider: ProviderId,
    pub model: String,
    pub prompt_template: String,
    pub choice_count: u32,
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Admission ceiling for the estimated prompt size
    pub max_prompt_tokens: u32,
    pub base_url: String,
    pub credentials: Credentials,
}

impl ProviderSettings {
    pub fn with_defaults(provider: ProviderId) -> Self {
        let (model, prompt, base_url) = match provider {
            ProviderId::OpenAI => ("gpt-3.5-turbo-1106", OPENAI_PROMPT, "https://api.openai.com".to_string()),
            ProviderId::Cohere => ("command", COHERE_PROMPT, "https://api.cohere.ai".to_string()),
            ProviderId::Anthropic => ("anthropic.claude-v2", BEDROCK_PROMPT, bedrock_url("us-east-1")),
        };

        Self {
            provider,
            model: model.to_string(),
            prompt_template: prompt.to_string(),
            choice_count: 2,
            temperature: 0.7,
            max_output_tokens: 512,
            max_prompt_tokens: 1024,
            base_url,
            credentials: Credentials::default(),
        }
    }

    /// Base URL with no trailing slash
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn bedrock_url(region: &str) -> String {
    format!("https://bedrock-runtime.{region}.amazonaws.com")
}

/// Bounds applied to caller input before any provider work
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLimits {
    pub max_input_chars: usize,
    pub max_user_chars: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_input_chars: 2000,
            max_user_chars: 100,
        }
    }
}

/// Full generator configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub providers: HashMap<ProviderId, ProviderSettings>,
    pub default_provider: ProviderId,
    pub retry: RetryPolicy,
    pub limits: InputLimits,
    pub telemetry_dir: PathBuf,
    pub words_file: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let providers = ProviderId::ALL
            .iter()
            .map(|p| (*p, ProviderSettings::with_defaults(*p)))
            .collect();

        Self {
            providers,
            default_provider: ProviderId::OpenAI,
            retry: RetryPolicy::default(),
            limits: InputLimits::default(),
            telemetry_dir: PathBuf::from("./records"),
            words_file: None,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> SharedResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> SharedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        for provider in ProviderId::ALL {
            let settings = load_provider(provider, &lookup)?;
            config.providers.insert(provider, settings);
        }

        if let Some(value) = lookup("TEXT_DEFAULT_PROVIDER") {
            config.default_provider = value.parse()?;
        }

        config.retry = RetryPolicy::new(
            parse_or(&lookup, "TEXT_MAX_RETRY", config.retry.max_retry)?,
            Duration::from_millis(parse_or(&lookup, "TEXT_RETRY_DELAY_MS", config.retry.base_delay.as_millis() as u64)?),
            parse_or(&lookup, "TEXT_BACKOFF_MULTIPLIER", config.retry.backoff_multiplier)?,
        );
        if config.retry.backoff_multiplier < 1.0 {
            return Err(SharedError::InvalidConfig {
                field: "TEXT_BACKOFF_MULTIPLIER".to_string(),
                value: config.retry.backoff_multiplier.to_string(),
            });
        }

        config.limits = InputLimits {
            max_input_chars: parse_or(&lookup, "TEXT_MAX_INPUT_CHARS", config.limits.max_input_chars)?,
            max_user_chars: parse_or(&lookup, "TEXT_MAX_USER_CHARS", config.limits.max_user_chars)?,
        };

        if let Some(dir) = lookup("TELEMETRY_DIR") {
            config.telemetry_dir = PathBuf::from(dir);
        }
        config.words_file = lookup("WORDS_FILE").map(PathBuf::from);
        config.request_timeout = Duration::from_secs(parse_or(&lookup, "PROVIDER_TIMEOUT_SECS", 60u64)?);

        Ok(config)
    }

    /// Settings for a provider; every provider always has an entry
    pub fn provider(&self, provider: ProviderId) -> SharedResult<&ProviderSettings> {
        self.providers.get(&provider).ok_or_else(|| SharedError::MissingConfig {
            field: format!("{}_MODEL", provider.env_prefix()),
        })
    }
}

fn load_provider<F>(provider: ProviderId, lookup: &F) -> SharedResult<ProviderSettings>
where
    F: Fn(&str) -> Option<String>,
{
    let prefix = provider.env_prefix();
    let key = |name: &str| format!("{prefix}_{name}");
    let mut settings = ProviderSettings::with_defaults(provider);

    if let Some(model) = lookup(&key("MODEL")) {
        settings.model = model;
    }
    if let Some(prompt) = lookup(&key("PROMPT")) {
        settings.prompt_template = prompt;
    }
    settings.choice_count = parse_or(lookup, &key("CHOICES"), settings.choice_count)?;
    settings.temperature = parse_or(lookup, &key("TEMPERATURE"), settings.temperature)?;
    settings.max_output_tokens = parse_or(lookup, &key("MAX_TOKENS"), settings.max_output_tokens)?;
    settings.max_prompt_tokens = parse_or(lookup, &key("MAX_PROMPT_TOKENS"), settings.max_prompt_tokens)?;

    if settings.choice_count == 0 {
        return Err(SharedError::InvalidConfig {
            field: key("CHOICES"),
            value: "0".to_string(),
        });
    }

    settings.credentials = match provider {
        ProviderId::OpenAI => Credentials {
            api_key: lookup("OPENAI_API_KEY"),
            organization: lookup("OPENAI_ORGANIZATION_ID"),
            client_name: None,
        },
        ProviderId::Cohere => Credentials {
            api_key: lookup("COHERE_API_KEY"),
            organization: None,
            client_name: lookup("COHERE_CLIENT_NAME"),
        },
        ProviderId::Anthropic => {
            if let Some(region) = lookup("AWS_DEFAULT_REGION") {
                settings.base_url = bedrock_url(&region);
            }
            Credentials {
                api_key: lookup("AWS_BEARER_TOKEN_BEDROCK"),
                organization: None,
                client_name: None,
            }
        }
    };

    if let Some(base_url) = lookup(&key("BASE_URL")) {
        settings.base_url = base_url;
    }

    Ok(settings)
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> SharedResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| SharedError::InvalidConfig {
            field: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}
