use anyhow::{Context, Result};
use std::time::Duration;

/// Placeholder value shipped in sample `.env` files; treated as "no key".
pub const PLACEHOLDER_API_KEY: &str = "your_deepl_api_key";

pub const DEFAULT_DEEPL_API_URL: &str = "https://api-free.deepl.com/v2";

#[derive(Debug, Clone)]
pub struct Config {
    // DeepL
    pub deepl_api_key: Option<String>,
    pub deepl_api_url: String,
    pub provider_timeout: Duration,

    // Web server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // DeepL - a missing key is the supported "translation disabled" mode
            deepl_api_key: std::env::var("DEEPL_API_KEY").ok(),
            deepl_api_url: std::env::var("DEEPL_API_URL")
                .unwrap_or_else(|_| DEFAULT_DEEPL_API_URL.to_string()),
            provider_timeout: Duration::from_secs(
                std::env::var("PROVIDER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5),
            ),

            // Web server
            port: match std::env::var("PORT") {
                Ok(v) => v.parse().context("PORT must be a valid port number")?,
                Err(_) => 3000,
            },
        })
    }

    /// The configured key, or `None` when it is absent, blank, or the placeholder.
    pub fn usable_api_key(&self) -> Option<&str> {
        usable_api_key(self.deepl_api_key.as_deref())
    }
}

pub(crate) fn usable_api_key(key: Option<&str>) -> Option<&str> {
    key.map(str::trim)
        .filter(|k| !k.is_empty() && *k != PLACEHOLDER_API_KEY)
}
