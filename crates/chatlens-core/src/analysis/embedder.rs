//! Embedder trait for text-to-vector conversion.
//!
//! Implementations (e.g., the OpenAI embeddings endpoint) live in chatlens-infra.

use chatlens_types::embedding::EmbeddingOutput;
use chatlens_types::llm::LlmError;

/// Trait for converting text into an embedding vector.
pub trait Embedder: Send + Sync {
    /// Embed a single text with one service request.
    ///
    /// Empty input is still sent; rejecting it is the service's call.
    fn embed(
        &self,
        input: &str,
    ) -> impl std::future::Future<Output = Result<EmbeddingOutput, LlmError>> + Send;

    /// The model name used for embeddings (e.g., "text-embedding-3-small").
    fn model_name(&self) -> &str;
}
