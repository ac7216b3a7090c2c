//! Application error type mapping to HTTP status codes and JSON bodies.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chatrelay_types::llm::{ErrorClass, LlmError};

pub const INVALID_INPUT_MESSAGE: &str = "Invalid input. Please provide a valid text prompt.";
pub const GENERIC_ERROR_MESSAGE: &str = "Something broke!";

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Missing, empty, or non-string prompt.
    InvalidInput,
    /// The upstream model call failed.
    Upstream(LlmError),
    /// Anything else: unparseable body, panics.
    Internal(String),
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Upstream(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidInput => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": INVALID_INPUT_MESSAGE })),
            )
                .into_response(),
            AppError::Upstream(err) => {
                let class = ErrorClass::from(&err);
                tracing::error!(error = %err, class = ?class, "upstream call failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": class.public_message(), "status": "error" })),
                )
                    .into_response()
            }
            AppError::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": GENERIC_ERROR_MESSAGE, "status": "error" })),
                )
                    .into_response()
            }
        }
    }
}

/// Response for a panic caught by `CatchPanicLayer`.
pub fn panic_response(payload: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "handler panicked".to_string());
    AppError::Internal(detail).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_input_is_400_without_status_field() {
        let response = AppError::InvalidInput.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Invalid input. Please provide a valid text prompt." })
        );
    }

    #[tokio::test]
    async fn test_upstream_errors_use_classified_messages() {
        let cases = [
            (
                LlmError::AuthenticationFailed("API key not valid".into()),
                "API authentication failed",
            ),
            (
                LlmError::RateLimited("rate limit hit".into()),
                "Rate limit exceeded. Please try again later",
            ),
            (
                LlmError::RateLimited("Resource has been exhausted".into()),
                "An unexpected error occurred",
            ),
            (LlmError::EmptyResponse, "An unexpected error occurred"),
        ];

        for (err, expected) in cases {
            let response = AppError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                body_json(response).await,
                json!({ "error": expected, "status": "error" })
            );
        }
    }

    #[tokio::test]
    async fn test_panic_payload_becomes_generic_500() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Something broke!", "status": "error" })
        );
    }
}
