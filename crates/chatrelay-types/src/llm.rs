//! Upstream generation request/response types.
//!
//! These types model the single call-and-response contract the relay has with
//! the upstream model: a prompt plus sampling and safety configuration in, a
//! block of text out.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sampling parameters sent with every generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

/// Content category the upstream safety filter can block on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

/// Probability threshold at which the upstream blocks a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockLowAndAbove,
    BlockMediumAndAbove,
    BlockOnlyHigh,
    BlockNone,
}

/// One category/threshold pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// The four categories blocked at medium probability and above.
pub fn default_safety_settings() -> Vec<SafetySetting> {
    [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category,
        threshold: HarmBlockThreshold::BlockMediumAndAbove,
    })
    .collect()
}

/// Request to the upstream model. Only the current prompt is sent; stored
/// session history never reaches the upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub config: GenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

impl GenerationRequest {
    /// Build a request with the default sampling and safety configuration.
    pub fn for_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            config: GenerationConfig::default(),
            safety_settings: default_safety_settings(),
        }
    }
}

/// Text produced by the upstream model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub text: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Errors from upstream model calls.
///
/// The `Display` strings matter: [`ErrorClass::classify`] matches on them.
/// Status-based variants display the upstream message only, so the status
/// alone never decides the client-facing class.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    /// HTTP 401/403 from upstream.
    #[error("{0}")]
    AuthenticationFailed(String),

    /// HTTP 429 from upstream.
    #[error("{0}")]
    RateLimited(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("response blocked by safety filter: {0}")]
    Blocked(String),

    #[error("upstream returned no candidates")]
    EmptyResponse,
}

/// Client-facing classification of an upstream failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Authentication,
    RateLimit,
    Unexpected,
}

impl ErrorClass {
    /// Classify an upstream error message by substring.
    ///
    /// `API key` wins over `rate limit` when both appear.
    pub fn classify(message: &str) -> Self {
        if message.contains("API key") {
            ErrorClass::Authentication
        } else if message.contains("rate limit") {
            ErrorClass::RateLimit
        } else {
            ErrorClass::Unexpected
        }
    }

    /// The literal string returned to clients.
    pub fn public_message(&self) -> &'static str {
        match self {
            ErrorClass::Authentication => "API authentication failed",
            ErrorClass::RateLimit => "Rate limit exceeded. Please try again later",
            ErrorClass::Unexpected => "An unexpected error occurred",
        }
    }
}

impl From<&LlmError> for ErrorClass {
    fn from(err: &LlmError) -> Self {
        ErrorClass::classify(&err.to_string())
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.public_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_defaults() {
        let config = GenerationConfig::default();
        assert!((config.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.top_k, 40);
        assert!((config.top_p - 0.95).abs() < f64::EPSILON);
        assert_eq!(config.max_output_tokens, 1024);
    }

    #[test]
    fn test_default_safety_settings_cover_four_categories() {
        let settings = default_safety_settings();
        assert_eq!(settings.len(), 4);
        assert!(settings
            .iter()
            .all(|s| s.threshold == HarmBlockThreshold::BlockMediumAndAbove));
    }

    #[test]
    fn test_harm_category_wire_names() {
        let json = serde_json::to_string(&HarmCategory::HateSpeech).unwrap();
        assert_eq!(json, "\"HARM_CATEGORY_HATE_SPEECH\"");
        let json = serde_json::to_string(&HarmBlockThreshold::BlockMediumAndAbove).unwrap();
        assert_eq!(json, "\"BLOCK_MEDIUM_AND_ABOVE\"");
    }

    #[test]
    fn test_classify_by_substring() {
        assert_eq!(
            ErrorClass::classify("[400] API key not valid. Please pass a valid API key."),
            ErrorClass::Authentication
        );
        assert_eq!(
            ErrorClass::classify("quota exceeded: rate limit hit"),
            ErrorClass::RateLimit
        );
        assert_eq!(ErrorClass::classify("socket hang up"), ErrorClass::Unexpected);
        // Matching is case-sensitive.
        assert_eq!(ErrorClass::classify("api key missing"), ErrorClass::Unexpected);
        assert_eq!(ErrorClass::classify("Rate Limit"), ErrorClass::Unexpected);
    }

    #[test]
    fn test_error_variants_classify() {
        let auth = LlmError::AuthenticationFailed("API key expired".into());
        assert_eq!(ErrorClass::from(&auth), ErrorClass::Authentication);

        let rate = LlmError::RateLimited("per-minute rate limit hit".into());
        assert_eq!(ErrorClass::from(&rate), ErrorClass::RateLimit);

        assert_eq!(ErrorClass::from(&LlmError::EmptyResponse), ErrorClass::Unexpected);

        let passthrough = LlmError::Provider {
            message: "API key expired".into(),
        };
        assert_eq!(ErrorClass::from(&passthrough), ErrorClass::Authentication);
    }

    #[test]
    fn test_status_variants_classify_by_upstream_message_only() {
        let exhausted = LlmError::RateLimited("Resource has been exhausted".into());
        assert_eq!(exhausted.to_string(), "Resource has been exhausted");
        assert_eq!(ErrorClass::from(&exhausted), ErrorClass::Unexpected);

        let denied = LlmError::AuthenticationFailed("Permission denied".into());
        assert_eq!(ErrorClass::from(&denied), ErrorClass::Unexpected);
    }

    #[test]
    fn test_public_messages_are_literal() {
        assert_eq!(ErrorClass::Authentication.to_string(), "API authentication failed");
        assert_eq!(
            ErrorClass::RateLimit.to_string(),
            "Rate limit exceeded. Please try again later"
        );
        assert_eq!(ErrorClass::Unexpected.to_string(), "An unexpected error occurred");
    }
}
