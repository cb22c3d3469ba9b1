//! Stored conversation embeddings and analysis results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token accounting reported by the embedding service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingUsage {
    pub prompt_tokens: u32,
    pub total_tokens: u32,
}

/// Vector produced for one input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingOutput {
    pub vector: Vec<f32>,
    pub usage: EmbeddingUsage,
    pub model: String,
}

/// One persisted embedding of a chat's recent-message window.
///
/// Rows are append-only; a chat accumulates one row per embed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEmbedding {
    pub id: Uuid,
    pub chat_id: String,
    pub embedding: Vec<f32>,
    pub usage: EmbeddingUsage,
    pub model: String,
    /// The exact text that was embedded.
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl StoredEmbedding {
    /// New row stamped with a v7 id and the current time.
    pub fn new(chat_id: impl Into<String>, content: String, output: EmbeddingOutput) -> Self {
        Self {
            id: Uuid::now_v7(),
            chat_id: chat_id.into(),
            embedding: output.vector,
            usage: output.usage,
            model: output.model,
            content,
            created_at: Utc::now(),
        }
    }
}

/// LLM-written analysis of a chat. Returned to the caller, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub chat_id: String,
    /// Raw completion text, passed through without validation.
    pub analysis: String,
}
