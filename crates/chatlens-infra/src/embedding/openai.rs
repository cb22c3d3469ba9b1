//! OpenAI embeddings client.
//!
//! Sends one `POST {base_url}/embeddings` per call and returns the first
//! vector in the response.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use chatlens_core::analysis::Embedder;
use chatlens_types::embedding::{EmbeddingOutput, EmbeddingUsage};
use chatlens_types::llm::LlmError;

/// Default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Embedder backed by the OpenAI `/embeddings` endpoint (or a compatible one).
///
/// Does NOT derive Debug; the API key lives in a `SecretString`.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
    encoding_format: &'static str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
    model: String,
    #[serde(default)]
    usage: Option<ResponseUsage>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ResponseUsage {
    prompt_tokens: u32,
    total_tokens: u32,
}

impl OpenAiEmbedder {
    pub fn new(
        client: reqwest::Client,
        api_key: SecretString,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn url(&self) -> String {
        format!("{}/embeddings", self.base_url)
    }
}

impl Embedder for OpenAiEmbedder {
    async fn embed(&self, input: &str) -> Result<EmbeddingOutput, LlmError> {
        let body = EmbeddingRequest {
            model: &self.model,
            input,
            encoding_format: "float",
        };

        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = retry_after_ms(&response);
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited { retry_after_ms },
                400 => LlmError::InvalidRequest(error_body),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let usage = parsed
            .usage
            .map(|u| EmbeddingUsage {
                prompt_tokens: u.prompt_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| LlmError::Deserialization("response contained no embeddings".into()))?;

        tracing::debug!(
            model = %parsed.model,
            dimensions = vector.len(),
            total_tokens = usage.total_tokens,
            "embedding received"
        );

        Ok(EmbeddingOutput {
            vector,
            usage,
            model: parsed.model,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// `Retry-After` in seconds, converted to milliseconds.
fn retry_after_ms(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs * 1000)
}
