//! Client side of the translation endpoint.

use crate::error::BackendError;
use crate::language::LanguageCode;
use crate::server::TRANSLATE_PATH;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One text to translate, as sent to the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRequest {
    pub text: String,
    pub target_lang: LanguageCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<String>,
}

/// Issues translation requests on behalf of a controller.
///
/// `Ok(None)` means the endpoint answered but carried no translated text.
#[async_trait]
pub trait TranslateBackend: Send + Sync {
    async fn request(&self, request: &TranslationRequest) -> Result<Option<String>, BackendError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EndpointReply {
    #[serde(default)]
    translated_text: Option<String>,
}

/// Talks to `POST /api/translate` over HTTP.
#[derive(Debug, Clone)]
pub struct EndpointClient {
    http: reqwest::Client,
    url: String,
}

impl EndpointClient {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: format!("{}{}", base_url.trim_end_matches('/'), TRANSLATE_PATH),
        })
    }
}

#[async_trait]
impl TranslateBackend for EndpointClient {
    async fn request(&self, request: &TranslationRequest) -> Result<Option<String>, BackendError> {
        let response = self.http.post(&self.url).json(request).send().await?;

        if !response.status().is_success() {
            return Err(BackendError::Status(response.status()));
        }

        let reply: EndpointReply = response.json().await?;
        Ok(reply.translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn request(text: &str) -> TranslationRequest {
        TranslationRequest {
            text: text.to_string(),
            target_lang: LanguageCode::new("EN-US"),
            source_lang: Some("ja".to_string()),
        }
    }

    #[test]
    fn test_request_serialization() {
        let json = serde_json::to_value(request("質問")).expect("Should serialize");
        assert_eq!(json["text"], "質問");
        assert_eq!(json["targetLang"], "EN-US");
        assert_eq!(json["sourceLang"], "ja");

        let mut without_source = request("質問");
        without_source.source_lang = None;
        let json = serde_json::to_string(&without_source).expect("Should serialize");
        assert!(!json.contains("sourceLang"));
    }

    #[tokio::test]
    async fn test_endpoint_client_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/translate"))
            .and(body_json(serde_json::json!({
                "text": "質問",
                "targetLang": "EN-US",
                "sourceLang": "ja"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "translatedText": "Question",
                "originalText": "質問",
                "targetLang": "EN-US",
                "sourceLang": "ja"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = EndpointClient::new(&format!("{}/", mock_server.uri()), Duration::from_secs(2))
            .expect("Client should build");

        let result = client.request(&request("質問")).await.expect("Should succeed");
        assert_eq!(result.as_deref(), Some("Question"));
    }

    #[tokio::test]
    async fn test_endpoint_client_missing_field() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/translate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let client = EndpointClient::new(&mock_server.uri(), Duration::from_secs(2))
            .expect("Client should build");

        let result = client.request(&request("質問")).await.expect("Should succeed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_endpoint_client_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/translate"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(serde_json::json!({ "error": "Translation failed" })),
            )
            .mount(&mock_server)
            .await;

        let client = EndpointClient::new(&mock_server.uri(), Duration::from_secs(2))
            .expect("Client should build");

        let err = client.request(&request("質問")).await.unwrap_err();
        assert!(matches!(err, BackendError::Status(s) if s.as_u16() == 500));
    }
}
