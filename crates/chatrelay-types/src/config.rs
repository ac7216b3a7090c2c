//! Relay configuration types.
//!
//! `RelayConfig` represents the optional `chatrelay.toml` plus the
//! environment overrides applied at startup. Every field has a default, so an
//! empty file (or no file at all) yields a usable configuration apart from
//! the upstream API key.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the relay. Read once at process start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// API key for the upstream model. Usually supplied via `GEMINI_API_KEY`.
    #[serde(default)]
    pub api_key: String,

    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deployment environment name, logged at startup.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Upstream model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the upstream generative-language API.
    #[serde(default = "default_upstream_base_url")]
    pub upstream_base_url: String,

    /// Overall timeout for one upstream call.
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,

    /// Directory holding the static front-end (`index.html` and assets).
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_upstream_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    300
}

fn default_static_dir() -> String {
    "front-end".to_string()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            model: default_model(),
            upstream_base_url: default_upstream_base_url(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
            static_dir: default_static_dir(),
            history: HistoryConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Bounds for the in-memory session history cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Turns retained per session (oldest dropped first).
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,
    /// Distinct sessions retained before least-recently-used eviction.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    /// Sessions idle longer than this are purged.
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
    /// How often the background sweeper purges idle sessions.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_max_turns() -> usize {
    10
}

fn default_max_sessions() -> usize {
    10_000
}

fn default_idle_ttl_secs() -> u64 {
    24 * 60 * 60
}

fn default_sweep_interval_secs() -> u64 {
    60
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            max_sessions: default_max_sessions(),
            idle_ttl_secs: default_idle_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

/// Fixed-window, per-client-address request limit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

fn default_max_requests() -> u32 {
    100
}

fn default_window_secs() -> u64 {
    15 * 60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_config_default_values() {
        let config = RelayConfig::default();
        assert!(config.api_key.is_empty());
        assert_eq!(config.port, 5000);
        assert_eq!(config.environment, "development");
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.history.max_turns, 10);
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window_secs, 900);
    }

    #[test]
    fn test_relay_config_deserialize_with_defaults() {
        let config: RelayConfig = toml::from_str("").unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.static_dir, "front-end");
        assert_eq!(config.history.max_sessions, 10_000);
    }

    #[test]
    fn test_relay_config_deserialize_with_values() {
        let toml_str = r#"
port = 8080
environment = "production"

[history]
max_turns = 4

[rate_limit]
max_requests = 5
window_secs = 60
"#;
        let config: RelayConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, "production");
        assert_eq!(config.history.max_turns, 4);
        // Unspecified nested fields keep their defaults.
        assert_eq!(config.history.idle_ttl_secs, 86_400);
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.rate_limit.window_secs, 60);
    }
}
