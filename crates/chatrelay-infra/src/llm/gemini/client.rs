//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google Gemini.
//!
//! Sends requests to `v1beta/models/{model}:generateContent`. The API key is
//! wrapped in [`secrecy::SecretString`] and only exposed when building the
//! request header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use chatrelay_core::llm::LlmProvider;
use chatrelay_types::llm::{GenerationRequest, GenerationResponse, LlmError};

use super::types::{GeminiErrorResponse, GeminiRequest, GeminiResponse};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini provider.
///
/// Deliberately not `Debug`: the struct holds the API key.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a provider for `model` with an overall per-request `timeout`.
    pub fn new(api_key: SecretString, model: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
        })
    }

    /// Override the base URL (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Map a non-2xx response to an [`LlmError`].
    ///
    /// The upstream's own message is kept so that the caller's substring
    /// classification sees it.
    fn status_error(status: reqwest::StatusCode, body: &str) -> LlmError {
        let message = serde_json::from_str::<GeminiErrorResponse>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string());

        match status.as_u16() {
            401 | 403 => LlmError::AuthenticationFailed(message),
            429 => LlmError::RateLimited(message),
            _ => LlmError::Provider {
                message: format!("[{}] {message}", status.as_u16()),
            },
        }
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, LlmError> {
        let body = GeminiRequest::from(request);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, "upstream returned an error status");
            return Err(Self::status_error(status, &error_body));
        }

        let gemini_resp: GeminiResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        if let Some(reason) = gemini_resp
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            return Err(LlmError::Blocked(reason));
        }

        let candidate = gemini_resp
            .candidates
            .first()
            .ok_or(LlmError::EmptyResponse)?;

        let text = match candidate.text() {
            Some(text) => text,
            None => {
                return Err(match candidate.finish_reason.as_deref() {
                    Some(reason @ ("SAFETY" | "RECITATION" | "BLOCKLIST")) => {
                        LlmError::Blocked(reason.to_string())
                    }
                    _ => LlmError::EmptyResponse,
                });
            }
        };

        Ok(GenerationResponse {
            text,
            model: gemini_resp.model_version.unwrap_or_else(|| self.model.clone()),
            finish_reason: candidate.finish_reason.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::Json;
    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use chatrelay_types::llm::ErrorClass;
    use serde_json::{Value, json};

    use super::*;

    #[derive(Clone)]
    struct Canned {
        status: StatusCode,
        body: Value,
    }

    async fn canned(
        State(canned): State<Canned>,
        headers: HeaderMap,
        Json(request): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        // Echo the prompt back when the key and body look right.
        if canned.status == StatusCode::OK && canned.body.is_null() {
            let key = headers
                .get("x-goog-api-key")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            let prompt = request["contents"][0]["parts"][0]["text"]
                .as_str()
                .unwrap_or_default();
            let text = format!("{key}:{prompt}");
            return (
                StatusCode::OK,
                Json(json!({
                    "candidates": [{"content": {"parts": [{"text": text}]}, "finishReason": "STOP"}]
                })),
            );
        }
        (canned.status, Json(canned.body))
    }

    async fn provider_for(status: StatusCode, body: Value) -> GeminiProvider {
        let app = Router::new()
            .route(
                "/v1beta/models/{model_action}",
                post(canned),
            )
            .with_state(Canned { status, body });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        GeminiProvider::new(
            SecretString::from("test-key"),
            "gemini-1.5-flash".to_string(),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url(format!("http://{addr}/"))
    }

    #[test]
    fn test_url_targets_generate_content() {
        let provider = GeminiProvider::new(
            SecretString::from("k"),
            "gemini-1.5-flash".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(
            provider.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_generate_returns_candidate_text() {
        let provider = provider_for(StatusCode::OK, Value::Null).await;
        let response = provider
            .generate(&GenerationRequest::for_prompt("Hello"))
            .await
            .unwrap();

        assert_eq!(response.text, "test-key:Hello");
        assert_eq!(response.model, "gemini-1.5-flash");
        assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
    }

    #[tokio::test]
    async fn test_invalid_key_message_classifies_as_authentication() {
        let provider = provider_for(
            StatusCode::BAD_REQUEST,
            json!({"error": {"code": 400, "message": "API key not valid. Please pass a valid API key.", "status": "INVALID_ARGUMENT"}}),
        )
        .await;

        let err = provider
            .generate(&GenerationRequest::for_prompt("Hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Provider { .. }));
        assert_eq!(ErrorClass::from(&err), ErrorClass::Authentication);
    }

    #[tokio::test]
    async fn test_forbidden_maps_to_authentication_failed() {
        let provider = provider_for(
            StatusCode::FORBIDDEN,
            json!({"error": {"code": 403, "message": "Permission denied", "status": "PERMISSION_DENIED"}}),
        )
        .await;

        let err = provider
            .generate(&GenerationRequest::for_prompt("Hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::AuthenticationFailed(_)));
        // No "API key" in the upstream message.
        assert_eq!(ErrorClass::from(&err), ErrorClass::Unexpected);
    }

    #[tokio::test]
    async fn test_too_many_requests_maps_to_rate_limited() {
        let provider = provider_for(
            StatusCode::TOO_MANY_REQUESTS,
            json!({"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}}),
        )
        .await;

        let err = provider
            .generate(&GenerationRequest::for_prompt("Hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::RateLimited(_)));
        assert_eq!(err.to_string(), "Resource has been exhausted");
        assert_eq!(ErrorClass::from(&err), ErrorClass::Unexpected);
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_reported() {
        let provider = provider_for(
            StatusCode::OK,
            json!({"promptFeedback": {"blockReason": "SAFETY"}}),
        )
        .await;

        let err = provider
            .generate(&GenerationRequest::for_prompt("Hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Blocked(reason) if reason == "SAFETY"));
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty_response() {
        let provider = provider_for(StatusCode::OK, json!({"candidates": []})).await;

        let err = provider
            .generate(&GenerationRequest::for_prompt("Hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
        assert_eq!(ErrorClass::from(&err), ErrorClass::Unexpected);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_unexpected() {
        let provider = GeminiProvider::new(
            SecretString::from("k"),
            "gemini-1.5-flash".to_string(),
            Duration::from_secs(2),
        )
        .unwrap()
        .with_base_url("http://127.0.0.1:1");

        let err = provider
            .generate(&GenerationRequest::for_prompt("Hello"))
            .await
            .unwrap_err();
        assert_eq!(ErrorClass::from(&err), ErrorClass::Unexpected);
    }
}
