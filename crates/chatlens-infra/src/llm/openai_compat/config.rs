//! Configuration for OpenAI-compatible completion providers.

use secrecy::SecretString;

/// Default OpenAI base URL.
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for an OpenAI-compatible completion provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "openai").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.openai.com/v1").
    pub base_url: String,
    pub api_key: SecretString,
    /// Model used when a request leaves `model` empty.
    pub model: String,
}

/// Configuration for any OpenAI-compatible endpoint (proxies, self-hosted gateways).
pub fn compatible(base_url: &str, api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: if base_url.trim_end_matches('/') == OPENAI_BASE_URL {
            "openai".into()
        } else {
            "openai_compatible".into()
        },
        base_url: base_url.trim_end_matches('/').into(),
        api_key: SecretString::from(api_key),
        model: model.into(),
    }
}
