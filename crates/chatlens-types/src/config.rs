//! Configuration types for chatlens.
//!
//! `ChatlensConfig` mirrors the `config.toml` in the data directory. Every
//! field has a default so an empty or partial file is valid.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatlensConfig {
    pub server: ServerConfig,
    pub bridge: BridgeConfig,
    pub embedding: EmbeddingConfig,
    pub completion: CompletionConfig,
    pub analysis: AnalysisSettings,

    /// Timeout applied to every outbound call, in seconds. `0` disables it.
    pub request_timeout_secs: u64,

    /// SQLite URL override. Defaults to `{data_dir}/chatlens.db`.
    pub database_url: Option<String>,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Messaging bridge (the HTTP gateway in front of the messaging client).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub base_url: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3100".to_string(),
        }
    }
}

/// Embedding service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
        }
    }
}

/// Completion service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 2_048,
        }
    }
}

/// Analysis pipeline tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Messages fetched per embed request.
    pub message_window: usize,
    /// Messages returned by the message preview endpoint.
    pub preview_window: usize,
    /// Fail the embed request when the row cannot be stored.
    pub strict_persistence: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            message_window: 100,
            preview_window: 10,
            strict_persistence: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = ChatlensConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.embedding.model, "text-embedding-3-small");
        assert_eq!(config.completion.model, "gpt-4o-mini");
        assert_eq!(config.analysis.message_window, 100);
        assert_eq!(config.analysis.preview_window, 10);
        assert!(config.analysis.strict_persistence);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: ChatlensConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.request_timeout_secs, 0);
    }

    #[test]
    fn test_config_deserialize_partial_sections() {
        let toml_str = r#"
request_timeout_secs = 30

[server]
port = 8080

[analysis]
strict_persistence = false
"#;
        let config: ChatlensConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(!config.analysis.strict_persistence);
        assert_eq!(config.analysis.message_window, 100);
    }
}
