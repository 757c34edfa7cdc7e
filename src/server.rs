//! HTTP surface of the translation subsystem.
//!
//! `POST /api/translate` validates the request and delegates to a
//! [`Translator`]. Validation failures are reported to the caller; everything
//! below validation is the translator's business.

use crate::error::ApiError;
use crate::metrics::{MetricsReport, TranslationMetrics};
use crate::provider::Translator;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

/// Largest `text` accepted, matching the provider's request size limit.
pub const MAX_TEXT_BYTES: usize = 128 * 1024;

pub const TRANSLATE_PATH: &str = "/api/translate";

#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<dyn Translator>,
    pub metrics: Arc<TranslationMetrics>,
}

/// Incoming translation request. Every field is optional here so that a
/// missing field produces a field-specific error instead of a generic rejection.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub target_lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub translated_text: String,
    pub original_text: String,
    pub target_lang: String,
    pub source_lang: Option<String>,
}

/// A request that passed validation.
#[derive(Debug, PartialEq, Eq)]
struct ValidRequest {
    text: String,
    target_lang: String,
    source_lang: Option<String>,
}

impl TranslateRequest {
    fn validate(self) -> Result<ValidRequest, ApiError> {
        let text = self
            .text
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::MissingText)?;

        let target_lang = self
            .target_lang
            .filter(|t| !t.trim().is_empty())
            .ok_or(ApiError::MissingTargetLang)?;

        if text.len() > MAX_TEXT_BYTES {
            return Err(ApiError::TextTooLong {
                max: MAX_TEXT_BYTES,
            });
        }

        let source_lang = self.source_lang.filter(|s| !s.trim().is_empty());

        Ok(ValidRequest {
            text,
            target_lang,
            source_lang,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(TRANSLATE_PATH, post(translate_handler))
        .route("/api/translate/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn translate_handler(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))?;
    let request = request.validate()?;

    debug!(
        "Translating {} bytes to {} (source: {:?})",
        request.text.len(),
        request.target_lang,
        request.source_lang
    );

    let translated_text = state
        .translator
        .translate(
            &request.text,
            &request.target_lang,
            request.source_lang.as_deref(),
        )
        .await
        .map_err(ApiError::Internal)?;

    Ok(Json(TranslateResponse {
        translated_text,
        original_text: request.text,
        target_lang: request.target_lang,
        source_lang: request.source_lang,
    }))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Json<MetricsReport> {
    Json(state.metrics.report())
}

pub async fn health_handler() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: Option<&str>, target: Option<&str>, source: Option<&str>) -> TranslateRequest {
        TranslateRequest {
            text: text.map(str::to_string),
            target_lang: target.map(str::to_string),
            source_lang: source.map(str::to_string),
        }
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_validate_missing_text() {
        let err = request(None, Some("en"), None).validate().unwrap_err();
        assert!(matches!(err, ApiError::MissingText));
    }

    #[test]
    fn test_validate_empty_text() {
        let err = request(Some(""), Some("en"), None).validate().unwrap_err();
        assert!(matches!(err, ApiError::MissingText));
    }

    #[test]
    fn test_validate_text_checked_before_target() {
        let err = request(None, None, None).validate().unwrap_err();
        assert!(matches!(err, ApiError::MissingText));
    }

    #[test]
    fn test_validate_missing_target() {
        let err = request(Some("hello"), None, None).validate().unwrap_err();
        assert!(matches!(err, ApiError::MissingTargetLang));

        let err = request(Some("hello"), Some("  "), None).validate().unwrap_err();
        assert!(matches!(err, ApiError::MissingTargetLang));
    }

    #[test]
    fn test_validate_text_too_long() {
        let long = "a".repeat(MAX_TEXT_BYTES + 1);
        let err = request(Some(&long), Some("fr"), None).validate().unwrap_err();
        assert!(matches!(err, ApiError::TextTooLong { .. }));
    }

    #[test]
    fn test_validate_success_drops_blank_source() {
        let valid = request(Some("hello"), Some("fr"), Some(""))
            .validate()
            .expect("Should validate");
        assert_eq!(
            valid,
            ValidRequest {
                text: "hello".to_string(),
                target_lang: "fr".to_string(),
                source_lang: None,
            }
        );
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn test_request_deserializes_camel_case() {
        let parsed: TranslateRequest =
            serde_json::from_str(r#"{"text":"abc","targetLang":"fr","sourceLang":"ja"}"#)
                .expect("Should parse");
        assert_eq!(parsed.text.as_deref(), Some("abc"));
        assert_eq!(parsed.target_lang.as_deref(), Some("fr"));
        assert_eq!(parsed.source_lang.as_deref(), Some("ja"));
    }

    #[test]
    fn test_request_missing_fields_deserialize_as_none() {
        let parsed: TranslateRequest =
            serde_json::from_str(r#"{"targetLang":"en"}"#).expect("Should parse");
        assert!(parsed.text.is_none());
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let response = TranslateResponse {
            translated_text: "cba".to_string(),
            original_text: "abc".to_string(),
            target_lang: "fr".to_string(),
            source_lang: None,
        };

        let json = serde_json::to_value(&response).expect("Should serialize");
        assert_eq!(json["translatedText"], "cba");
        assert_eq!(json["originalText"], "abc");
        assert_eq!(json["targetLang"], "fr");
        assert!(json["sourceLang"].is_null());
    }
}
