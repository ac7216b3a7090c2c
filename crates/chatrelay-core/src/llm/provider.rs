//! LlmProvider trait definition.

use chatrelay_types::llm::{GenerationRequest, GenerationResponse, LlmError};

/// Trait for upstream generative model backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in chatrelay-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Short provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Send one prompt and wait for the full reply.
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl std::future::Future<Output = Result<GenerationResponse, LlmError>> + Send;
}
