//! Chat service: one prompt in, one sanitized reply out.
//!
//! ChatService coordinates the HistoryStore and the LlmProvider for a single
//! request: it loads the session history, calls the upstream with the prompt
//! alone, sanitizes the reply, and records the exchange.

use chatrelay_types::chat::Turn;
use chatrelay_types::llm::{GenerationRequest, LlmError};
use tracing::{Instrument, debug, info_span};

use crate::format::sanitize;
use crate::history::HistoryStore;
use crate::llm::LlmProvider;

/// Orchestrates a chat exchange.
///
/// Generic over `HistoryStore` and `LlmProvider` so chatrelay-core never
/// depends on chatrelay-infra.
pub struct ChatService<H: HistoryStore, P: LlmProvider> {
    history: H,
    provider: P,
}

impl<H: HistoryStore, P: LlmProvider> ChatService<H, P> {
    pub fn new(history: H, provider: P) -> Self {
        Self { history, provider }
    }

    /// Access the history store.
    pub fn history(&self) -> &H {
        &self.history
    }

    /// Access the upstream provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Answer `prompt` and record the exchange under `session_id`.
    ///
    /// The session's history is loaded but not sent upstream. On upstream
    /// failure nothing is recorded.
    pub async fn respond(
        &self,
        prompt: &str,
        session_id: Option<&str>,
    ) -> Result<String, LlmError> {
        if let Some(id) = session_id.filter(|id| !id.is_empty()) {
            let prior = self.history.get(id).await;
            debug!(session_id = %id, turns = prior.len(), "loaded session history");
        }

        let request = GenerationRequest::for_prompt(prompt);

        let span = info_span!(
            "gen_ai.generate",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %self.provider.model(),
            gen_ai.request.temperature = request.config.temperature,
            gen_ai.request.max_tokens = request.config.max_output_tokens,
            gen_ai.response.finish_reason = tracing::field::Empty,
        );

        let response = self
            .provider
            .generate(&request)
            .instrument(span.clone())
            .await?;

        if let Some(reason) = response.finish_reason.as_deref() {
            span.record("gen_ai.response.finish_reason", reason);
        }

        let reply = sanitize(&response.text);

        self.history
            .append(session_id, Turn::user(prompt), Turn::assistant(reply.clone()))
            .await;

        Ok(reply)
    }
}
