//! Relay configuration loader.
//!
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults ([`RelayConfig::default()`])
//! 2. `chatrelay.toml` (or the file given with `--config`)
//! 3. Process environment, after loading a `.env` file if one exists

use std::path::Path;

use chatrelay_types::config::RelayConfig;
use chatrelay_types::error::ConfigError;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "chatrelay.toml";

/// Load configuration from file and environment.
///
/// - `path = Some(p)`: `p` must exist and parse.
/// - `path = None`: `chatrelay.toml` is used if present, defaults otherwise.
///
/// A malformed file is an error, never silently replaced by defaults.
pub async fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    dotenv::dotenv().ok();

    let mut config = match path {
        Some(path) => read_config_file(path).await?,
        None => match read_config_file(Path::new(DEFAULT_CONFIG_FILE)).await {
            Err(ConfigError::Read { .. }) => {
                tracing::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                RelayConfig::default()
            }
            other => other?,
        },
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

async fn read_config_file(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    toml::from_str::<RelayConfig>(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts the environment so tests never touch process state.
/// Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = get("GEMINI_API_KEY") {
        config.api_key = key;
    }
    if let Some(host) = get("HOST") {
        config.host = host;
    }
    if let Some(port) = get("PORT") {
        config.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: "PORT".to_string(),
            value: port.clone(),
        })?;
    }
    if let Some(env) = get("APP_ENV") {
        config.environment = env;
    }
    if let Some(model) = get("GEMINI_MODEL") {
        config.model = model;
    }
    if let Some(url) = get("GEMINI_BASE_URL") {
        config.upstream_base_url = url;
    }
    if let Some(dir) = get("STATIC_DIR") {
        config.static_dir = dir;
    }

    Ok(())
}

/// Fail fast when the upstream API key is missing.
pub fn require_api_key(config: &RelayConfig) -> Result<&str, ConfigError> {
    let key = config.api_key.trim();
    if key.is_empty() {
        return Err(ConfigError::MissingApiKey);
    }
    Ok(key)
}
