//! Webserver configuration from environment variables

use std::path::PathBuf;

use crate::error::{WebServerError, WebServerResult};

pub const DEFAULT_CLAID_HOST: &str = "https://api.claid.ai";
pub const DEFAULT_IMAGE_SIZE_LIMIT: u32 = 1920;

#[derive(Debug, Clone, PartialEq)]
pub struct WebServerConfig {
    /// Expected `X-API-KEY` value; `None` disables the check
    pub api_key: Option<String>,
    pub images_dir: PathBuf,
    pub claid_api_key: Option<String>,
    pub claid_api_host: String,
    /// Images must be strictly smaller than this in both dimensions
    pub image_size_limit: u32,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            images_dir: PathBuf::from("images"),
            claid_api_key: None,
            claid_api_host: DEFAULT_CLAID_HOST.to_string(),
            image_size_limit: DEFAULT_IMAGE_SIZE_LIMIT,
        }
    }
}

impl WebServerConfig {
    pub fn from_env() -> WebServerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> WebServerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.api_key = lookup("API_KEY").filter(|key| !key.is_empty());
        if let Some(dir) = lookup("IMAGES_PATH") {
            config.images_dir = PathBuf::from(dir);
        }
        config.claid_api_key = lookup("CLAID_API_KEY").filter(|key| !key.is_empty());
        if let Some(host) = lookup("CLAID_API_HOST") {
            config.claid_api_host = host;
        }
        if let Some(limit) = lookup("IMAGE_SIZE_LIMIT") {
            config.image_size_limit = limit
                .trim()
                .parse()
                .map_err(|_| WebServerError::config(format!("IMAGE_SIZE_LIMIT must be a positive integer, got '{limit}'")))?;
        }

        Ok(config)
    }
}
