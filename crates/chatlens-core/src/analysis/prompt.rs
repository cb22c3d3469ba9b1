//! Pure text assembly for the analysis pipeline.
//!
//! Nothing here touches the network, so the exact payload sent to the
//! embedding and completion services can be asserted in tests.

use chatlens_types::chat::ChatMessage;
use chatlens_types::embedding::StoredEmbedding;
use chatlens_types::error::AnalysisError;
use chatlens_types::llm::{CompletionRequest, Message};

const DEFAULT_SYSTEM: &str = "You are an expert analyst of conversations exported from a \
personal messaging account. You read chat transcripts and their embeddings and report \
factual, concise statistics about them.";

const DEFAULT_INSTRUCTIONS: &str = "The following embeddings were generated from a chat \
conversation; the numbers encode the model's understanding of its content. Embeddings: \
{embeddings}. The original conversation text is: {content}. Analyze the conversation and \
answer with a JSON array of objects, each with a \"title\" and a \"description\" field, \
covering: the dominant topic of conversation, the peak activity period, trends in \
communication patterns, the most active participants, and the overall sentiment. Reply \
with the JSON array only.";

/// Prompt template for the analysis request.
///
/// `instructions` may reference `{embeddings}` and `{content}`; both are
/// substituted with JSON-encoded values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPrompt {
    pub system: String,
    pub instructions: String,
}

impl Default for AnalysisPrompt {
    fn default() -> Self {
        Self {
            system: DEFAULT_SYSTEM.to_string(),
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
        }
    }
}

/// Join message bodies with single spaces, in the order given.
///
/// Empty bodies still contribute a (blank) token.
pub fn concatenate_bodies(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| m.body.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reconstruct the aggregate conversation text from stored rows.
pub fn aggregate_content(rows: &[StoredEmbedding]) -> String {
    rows.iter()
        .map(|r| r.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the completion request for a chat's stored embeddings.
///
/// The model is left empty so the provider's configured default applies.
pub fn build_analysis_request(
    rows: &[StoredEmbedding],
    prompt: &AnalysisPrompt,
    max_tokens: u32,
) -> Result<CompletionRequest, AnalysisError> {
    let vectors: Vec<&[f32]> = rows.iter().map(|r| r.embedding.as_slice()).collect();
    let embeddings = serde_json::to_string(&vectors)
        .map_err(|e| AnalysisError::Upstream(format!("failed to encode embeddings: {e}")))?;
    let content = serde_json::to_string(&aggregate_content(rows))
        .map_err(|e| AnalysisError::Upstream(format!("failed to encode content: {e}")))?;

    // Content goes in last so text inside the conversation is never treated
    // as a placeholder.
    let user = prompt
        .instructions
        .replace("{embeddings}", &embeddings)
        .replace("{content}", &content);

    Ok(CompletionRequest {
        model: String::new(),
        system: Some(prompt.system.clone()),
        messages: vec![Message::user(user)],
        max_tokens,
        temperature: None,
    })
}
