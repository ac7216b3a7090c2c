//! POST /chat: relay one prompt to the upstream model.
//!
//! Request: `{"prompt": string, "sessionId"?: string}`.
//! Response: `{"response": string, "status": "success"}`.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use serde_json::{Value, json};

use crate::http::error::AppError;
use crate::state::AppState;

/// Validated chat request.
#[derive(Debug, PartialEq, Eq)]
pub struct ChatRequest {
    pub prompt: String,
    pub session_id: Option<String>,
}

impl ChatRequest {
    /// Validate a raw request body.
    ///
    /// Bodies that are not JSON-typed count as empty, so they fail prompt
    /// validation. A JSON-typed body that does not parse is an internal error.
    pub fn parse(headers: &HeaderMap, body: &[u8]) -> Result<Self, AppError> {
        let value = if is_json(headers) && !body.is_empty() {
            serde_json::from_slice::<Value>(body)
                .map_err(|e| AppError::Internal(format!("malformed JSON body: {e}")))?
        } else {
            Value::Null
        };

        let prompt = value
            .get("prompt")
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
            .ok_or(AppError::InvalidInput)?;

        // A non-string sessionId is treated as absent.
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Self {
            prompt: prompt.to_string(),
            session_id,
        })
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

pub async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let request = ChatRequest::parse(&headers, &body)?;

    let reply = state
        .chat_service
        .respond(&request.prompt, request.session_id.as_deref())
        .await?;

    Ok(Json(json!({ "response": reply, "status": "success" })))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn test_valid_request_with_session() {
        let request =
            ChatRequest::parse(&json_headers(), br#"{"prompt":"hi","sessionId":"s1"}"#).unwrap();
        assert_eq!(
            request,
            ChatRequest {
                prompt: "hi".into(),
                session_id: Some("s1".into())
            }
        );
    }

    #[test]
    fn test_whitespace_prompt_is_accepted() {
        let request = ChatRequest::parse(&json_headers(), br#"{"prompt":"  "}"#).unwrap();
        assert_eq!(request.prompt, "  ");
    }

    #[test]
    fn test_invalid_prompts_are_rejected() {
        for body in [
            r#"{"prompt":123}"#,
            r#"{"prompt":""}"#,
            r#"{"prompt":null}"#,
            r#"{"sessionId":"s1"}"#,
            r#"["prompt"]"#,
            "",
        ] {
            let result = ChatRequest::parse(&json_headers(), body.as_bytes());
            assert!(
                matches!(result, Err(AppError::InvalidInput)),
                "{body:?} should be invalid input"
            );
        }
    }

    #[test]
    fn test_non_json_content_type_is_invalid_input() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        let result = ChatRequest::parse(&headers, br#"{"prompt":"hi"}"#);
        assert!(matches!(result, Err(AppError::InvalidInput)));

        let result = ChatRequest::parse(&HeaderMap::new(), br#"{"prompt":"hi"}"#);
        assert!(matches!(result, Err(AppError::InvalidInput)));
    }

    #[test]
    fn test_json_content_type_with_charset_is_accepted() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(ChatRequest::parse(&headers, br#"{"prompt":"hi"}"#).is_ok());
    }

    #[test]
    fn test_malformed_json_is_internal_error() {
        let result = ChatRequest::parse(&json_headers(), b"{\"prompt\":");
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_non_string_session_id_is_ignored() {
        let request =
            ChatRequest::parse(&json_headers(), br#"{"prompt":"hi","sessionId":42}"#).unwrap();
        assert_eq!(request.session_id, None);
    }
}
