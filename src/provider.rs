use crate::config::{usable_api_key, Config};
use crate::error::ProviderError;
use crate::metrics::TranslationMetrics;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Something that can translate a single text.
///
/// The endpoint delegates through this trait. An `Err` means the delegation
/// itself broke; ordinary provider trouble is absorbed by the implementation.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> anyhow::Result<String>;
}

/// DeepL form-encoded request body
#[derive(Debug, Serialize)]
struct DeepLRequest<'a> {
    text: &'a str,
    target_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeepLResponse {
    translations: Vec<DeepLTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeepLTranslation {
    #[serde(default)]
    #[allow(dead_code)]
    detected_source_language: Option<String>,
    text: String,
}

/// Stateless client for the DeepL translation API.
///
/// [`ProviderClient::translate`] never fails: without a usable key it returns
/// the input unchanged, and every transport or API problem is logged and
/// answered with the input as well. One round trip per call, no retries.
#[derive(Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    api_key: Option<String>,
    api_url: String,
    metrics: Arc<TranslationMetrics>,
}

impl ProviderClient {
    pub fn new(
        api_key: Option<String>,
        api_url: impl Into<String>,
        timeout: Duration,
        metrics: Arc<TranslationMetrics>,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            api_key: usable_api_key(api_key.as_deref()).map(str::to_string),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            metrics,
        })
    }

    pub fn from_config(config: &Config, metrics: Arc<TranslationMetrics>) -> anyhow::Result<Self> {
        Self::new(
            config.deepl_api_key.clone(),
            config.deepl_api_url.clone(),
            config.provider_timeout,
            metrics,
        )
    }

    /// Whether a usable credential is configured.
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn metrics(&self) -> &Arc<TranslationMetrics> {
        &self.metrics
    }

    /// Translate `text` into `target_lang`, falling back to `text` on any failure.
    pub async fn translate(&self, text: &str, target_lang: &str, source_lang: Option<&str>) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("Translation disabled (no DeepL API key), returning original text");
            self.metrics.record_disabled_skip();
            return text.to_string();
        };

        self.metrics.record_api_call();

        match self.request_translation(api_key, text, target_lang, source_lang).await {
            Ok(translated) => translated,
            Err(e) => {
                self.metrics.record_api_failure();
                warn!(
                    "Translation to {} failed, returning original text: {}",
                    target_lang, e
                );
                text.to_string()
            }
        }
    }

    async fn request_translation(
        &self,
        api_key: &str,
        text: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> Result<String, ProviderError> {
        let request = DeepLRequest {
            text,
            target_lang: target_lang.to_uppercase(),
            source_lang: source_lang.map(str::to_uppercase),
        };

        let response = self
            .http
            .post(format!("{}/translate", self.api_url))
            .header("Authorization", format!("DeepL-Auth-Key {}", api_key))
            .form(&request)
            .send()
            .await
            .map_err(ProviderError::Transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(ProviderError::Status { status, body });
        }

        let parsed: DeepLResponse = response.json().await.map_err(ProviderError::Decode)?;

        let first = parsed
            .translations
            .into_iter()
            .next()
            .ok_or(ProviderError::NoCandidates)?;

        if first.text.is_empty() {
            return Err(ProviderError::EmptyTranslation);
        }

        Ok(first.text)
    }
}

#[async_trait]
impl Translator for ProviderClient {
    async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        source_lang: Option<&str>,
    ) -> anyhow::Result<String> {
        Ok(ProviderClient::translate(self, text, target_lang, source_lang).await)
    }
}
