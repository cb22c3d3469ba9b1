//! Configuration loader for chatlens.
//!
//! Reads `config.toml` from the data directory (`~/.chatlens/` in production)
//! and deserializes it into [`ChatlensConfig`]. Falls back to defaults when
//! the file is missing or malformed. Secrets only come from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;

use chatlens_core::analysis::AnalysisConfig;
use chatlens_types::config::ChatlensConfig;

use crate::sqlite::pool::database_url_in;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "CHATLENS_DATA_DIR";
/// Environment variable holding the OpenAI API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable holding the optional bridge bearer token.
pub const BRIDGE_TOKEN_ENV: &str = "CHATLENS_BRIDGE_TOKEN";

/// Resolve the chatlens data directory.
///
/// Priority: `CHATLENS_DATA_DIR`, then `~/.chatlens`, then `./.chatlens`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".chatlens");
    }

    PathBuf::from(".chatlens")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: returns [`ChatlensConfig::default()`].
/// - Unreadable or malformed file: logs a warning and returns the default.
pub async fn load_config(data_dir: &Path) -> ChatlensConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %config_path.display(), "no config.toml found, using defaults");
            return ChatlensConfig::default();
        }
        Err(err) => {
            tracing::warn!(path = %config_path.display(), error = %err, "failed to read config, using defaults");
            return ChatlensConfig::default();
        }
    };

    match toml::from_str::<ChatlensConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %config_path.display(), error = %err, "failed to parse config, using defaults");
            ChatlensConfig::default()
        }
    }
}

/// SQLite URL: the configured override, or `chatlens.db` in the data directory.
pub fn database_url(config: &ChatlensConfig, data_dir: &Path) -> String {
    config
        .database_url
        .clone()
        .unwrap_or_else(|| database_url_in(data_dir))
}

/// Outbound call timeout; `None` when `request_timeout_secs` is 0.
pub fn request_timeout(config: &ChatlensConfig) -> Option<Duration> {
    (config.request_timeout_secs > 0).then(|| Duration::from_secs(config.request_timeout_secs))
}

/// Pipeline tuning derived from the loaded configuration.
pub fn analysis_config(config: &ChatlensConfig) -> AnalysisConfig {
    AnalysisConfig {
        message_window: config.analysis.message_window,
        preview_window: config.analysis.preview_window,
        strict_persistence: config.analysis.strict_persistence,
        call_timeout: request_timeout(config),
        max_tokens: config.completion.max_tokens,
    }
}

/// Read a non-empty secret from the environment.
pub fn secret_from_env(var: &str) -> Option<SecretString> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}
