//! LlmProvider trait definition.
//!
//! The analysis pipeline only needs single, non-streaming completions, so the
//! trait is limited to `complete`. Uses RPITIT like the other ports.

use chatlens_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for completion service backends (OpenAI and compatible APIs).
///
/// Implementations live in chatlens-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
