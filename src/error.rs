//! Error types for the translation pipeline.
//!
//! Only [`ApiError`] ever reaches a caller. [`ProviderError`] and
//! [`BackendError`] are absorbed by the provider client and the controller
//! respectively and turned into "show the original text".

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::error;

/// Failure talking to the external translation provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("failed to send request to translation provider: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("translation provider error ({status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to parse translation provider response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("translation provider response contained no translations")]
    NoCandidates,

    #[error("translation provider returned an empty translation")]
    EmptyTranslation,
}

/// Failure reaching the translation endpoint from a controller.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("translation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("translation endpoint returned {0}")]
    Status(reqwest::StatusCode),

    #[error("{0}")]
    Other(String),
}

/// Error returned by the translation endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Text is required")]
    MissingText,

    #[error("Target language is required")]
    MissingTargetLang,

    #[error("Text exceeds the maximum length of {max} bytes")]
    TextTooLong { max: usize },

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Translation failed")]
    Internal(#[source] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingText
            | ApiError::MissingTargetLang
            | ApiError::TextTooLong { .. }
            | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(e) = &self {
            error!("Translation API error: {:#}", e);
        }

        let status = self.status();
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_client_errors() {
        assert_eq!(ApiError::MissingText.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingTargetLang.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::TextTooLong { max: 10 }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidBody("eof".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = ApiError::Internal(anyhow::anyhow!("socket closed"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Translation failed");
    }

    #[test]
    fn test_messages_name_the_missing_field() {
        assert!(ApiError::MissingText.to_string().contains("Text"));
        assert!(ApiError::MissingTargetLang
            .to_string()
            .contains("Target language"));
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::MissingTargetLang.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Internal(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_provider_status_error_mentions_code() {
        let err = ProviderError::Status {
            status: reqwest::StatusCode::FORBIDDEN,
            body: "Wrong auth key".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("403"));
        assert!(message.contains("Wrong auth key"));
    }
}
