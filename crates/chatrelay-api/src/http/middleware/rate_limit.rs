//! Fixed-window request limiting per client address.
//!
//! Each client address gets a counter and a window start. The counter resets
//! once the window has elapsed; requests beyond the limit inside a window get
//! `429 Too Many Requests` with a `Retry-After` header.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;

use chatrelay_types::config::RateLimitConfig;

use crate::state::AppState;

pub const LIMITED_MESSAGE: &str = "Too many requests, please try again later.";

/// Key used when the peer address is unavailable.
const UNKNOWN_CLIENT: &str = "unknown";

/// Per-client fixed-window counter.
struct ClientWindow {
    count: u32,
    window_start: Instant,
}

/// Outcome of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: DashMap<String, ClientWindow>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: DashMap::new(),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_secs))
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Count one request from `client`.
    pub fn check(&self, client: &str) -> Decision {
        let mut entry = self
            .clients
            .entry(client.to_string())
            .or_insert_with(|| ClientWindow {
                count: 0,
                window_start: Instant::now(),
            });

        let counter = entry.value_mut();

        if counter.window_start.elapsed() >= self.window {
            counter.count = 0;
            counter.window_start = Instant::now();
        }

        if counter.count >= self.max_requests {
            let retry_after = self.window.saturating_sub(counter.window_start.elapsed());
            return Decision::Limited { retry_after };
        }

        counter.count += 1;
        Decision::Allowed {
            remaining: self.max_requests - counter.count,
        }
    }

    /// Drop counters whose window has elapsed. Returns how many were removed.
    pub fn purge_stale(&self) -> usize {
        let before = self.clients.len();
        self.clients
            .retain(|_, counter| counter.window_start.elapsed() < self.window);
        before.saturating_sub(self.clients.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("max_requests", &self.max_requests)
            .field("window", &self.window)
            .field("tracked_clients", &self.clients.len())
            .finish()
    }
}

fn client_key(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// Axum middleware enforcing the limiter held in [`AppState`].
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let limiter = &state.rate_limiter;
    let client = client_key(&request);

    match limiter.check(&client) {
        Decision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert("x-ratelimit-limit", HeaderValue::from(limiter.max_requests()));
            headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
            response
        }
        Decision::Limited { retry_after } => {
            // Round up so clients never retry inside the window.
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            tracing::warn!(%client, retry_after_secs = secs, "rate limit exceeded");
            (
                StatusCode::TOO_MANY_REQUESTS,
                [
                    (header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")),
                    (header::RETRY_AFTER, HeaderValue::from(secs)),
                ],
                LIMITED_MESSAGE,
            )
                .into_response()
        }
    }
}
