//! Application state wiring the relay together.
//!
//! AppState holds the concrete service instances used by the HTTP handlers.
//! `ChatService` is generic over the history store and upstream provider;
//! AppState pins it to the in-memory store and the Gemini client.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use chatrelay_core::chat::ChatService;
use chatrelay_core::history::InMemoryHistoryStore;
use chatrelay_infra::config::require_api_key;
use chatrelay_infra::llm::gemini::GeminiProvider;
use chatrelay_types::config::RelayConfig;

use crate::http::middleware::RateLimiter;

/// Concrete type alias for the chat service pinned to infra implementations.
pub type ConcreteChatService = ChatService<InMemoryHistoryStore, GeminiProvider>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub config: Arc<RelayConfig>,
}

impl AppState {
    /// Wire services from configuration. Fails when the API key is missing.
    pub fn from_config(config: RelayConfig) -> anyhow::Result<Self> {
        let api_key = SecretString::from(require_api_key(&config)?.to_string());

        let provider = GeminiProvider::new(
            api_key,
            config.model.clone(),
            Duration::from_secs(config.upstream_timeout_secs),
        )?
        .with_base_url(config.upstream_base_url.clone());

        let history = InMemoryHistoryStore::from_config(&config.history);
        let rate_limiter = RateLimiter::from_config(&config.rate_limit);

        Ok(Self {
            chat_service: Arc::new(ChatService::new(history, provider)),
            rate_limiter: Arc::new(rate_limiter),
            config: Arc::new(config),
        })
    }

    /// Start the periodic sweepers for idle sessions and stale rate-limit
    /// windows. They exit when `cancel` fires.
    pub fn spawn_maintenance(&self, cancel: CancellationToken) -> Vec<JoinHandle<()>> {
        let sweep_every = Duration::from_secs(self.config.history.sweep_interval_secs.max(1));

        let service = Arc::clone(&self.chat_service);
        let history_task = spawn_periodic(sweep_every, cancel.clone(), move || {
            let removed = service.history().purge_expired();
            if removed > 0 {
                tracing::debug!(removed, "history sweep");
            }
        });

        let limiter = Arc::clone(&self.rate_limiter);
        let limiter_every = limiter.window().max(Duration::from_secs(1));
        let limiter_task = spawn_periodic(limiter_every, cancel, move || {
            let removed = limiter.purge_stale();
            if removed > 0 {
                tracing::debug!(removed, "rate limiter sweep");
            }
        });

        vec![history_task, limiter_task]
    }
}

fn spawn_periodic<F>(every: Duration, cancel: CancellationToken, mut tick: F) -> JoinHandle<()>
where
    F: FnMut() + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately.
        interval.tick().await;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => tick(),
            }
        }
    })
}
