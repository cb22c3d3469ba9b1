//! Conversation analysis pipeline.
//!
//! `embed` pulls a chat's recent messages from the linked session, embeds
//! their concatenated text with one service call, and appends the vector to
//! the repository. `analyze` reads back every stored row for the chat and
//! asks the completion service for a structured summary, returning its text
//! verbatim.
//!
//! No call is retried. Each outbound call may be bounded by `call_timeout`;
//! dropping the returned future abandons whatever call is in flight.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chatlens_types::chat::{ChatMessage, ChatSummary};
use chatlens_types::embedding::{AnalysisResult, StoredEmbedding};
use chatlens_types::error::AnalysisError;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::embedder::Embedder;
use super::prompt::{AnalysisPrompt, build_analysis_request, concatenate_bodies};
use super::store::EmbeddingRepository;
use crate::llm::LlmProvider;
use crate::messaging::ChatClient;
use crate::session::SessionController;

/// Tuning for [`AnalysisPipeline`].
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Messages fetched per embed request.
    pub message_window: usize,
    /// Messages returned by [`AnalysisPipeline::recent_messages`].
    pub preview_window: usize,
    /// Fail `embed` when the row cannot be stored.
    pub strict_persistence: bool,
    /// Upper bound for each outbound call.
    pub call_timeout: Option<Duration>,
    /// Completion token cap for `analyze`.
    pub max_tokens: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            message_window: 100,
            preview_window: 10,
            strict_persistence: true,
            call_timeout: None,
            max_tokens: 2_048,
        }
    }
}

/// Outcome of a successful `embed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReceipt {
    pub chat_id: String,
    /// Id of the stored row; `None` when a lenient store failed.
    pub row_id: Option<Uuid>,
    pub dimensions: usize,
}

/// Embeds and analyzes conversations of the linked session.
pub struct AnalysisPipeline<C, E, P, R>
where
    C: ChatClient,
    E: Embedder,
    P: LlmProvider,
    R: EmbeddingRepository,
{
    session: Arc<SessionController<C>>,
    embedder: E,
    provider: P,
    repo: R,
    prompt: AnalysisPrompt,
    config: AnalysisConfig,
}

impl<C, E, P, R> AnalysisPipeline<C, E, P, R>
where
    C: ChatClient,
    E: Embedder,
    P: LlmProvider,
    R: EmbeddingRepository,
{
    pub fn new(
        session: Arc<SessionController<C>>,
        embedder: E,
        provider: P,
        repo: R,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            session,
            embedder,
            provider,
            repo,
            prompt: AnalysisPrompt::default(),
            config,
        }
    }

    #[cfg(test)]
    fn session(&self) -> &Arc<SessionController<C>> {
        &self.session
    }

    #[cfg(test)]
    fn repo(&self) -> &R {
        &self.repo
    }

    fn require_session(&self) -> Result<(), AnalysisError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(AnalysisError::Unauthenticated)
        }
    }

    async fn bounded<T, CallErr>(
        &self,
        what: &str,
        call: impl Future<Output = Result<T, CallErr>>,
    ) -> Result<T, AnalysisError>
    where
        AnalysisError: From<CallErr>,
    {
        match self.config.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result.map_err(AnalysisError::from),
                Err(_) => Err(AnalysisError::Upstream(format!(
                    "{what} timed out after {}ms",
                    limit.as_millis()
                ))),
            },
            None => call.await.map_err(AnalysisError::from),
        }
    }

    /// Chats visible to the linked account.
    pub async fn list_conversations(&self) -> Result<Vec<ChatSummary>, AnalysisError> {
        self.require_session()?;
        self.bounded("chat listing", self.session.client().list_chats())
            .await
            .inspect_err(|e| error!(error = %e, "failed to list conversations"))
    }

    /// The last `preview_window` messages of a chat.
    pub async fn recent_messages(&self, chat_id: &str) -> Result<Vec<ChatMessage>, AnalysisError> {
        self.require_session()?;
        self.bounded(
            "message fetch",
            self.session
                .client()
                .fetch_messages(chat_id, self.config.preview_window),
        )
        .await
        .inspect_err(|e| error!(chat_id, error = %e, "failed to fetch messages"))
    }

    /// Embed the chat's recent-message window and store the vector.
    pub async fn embed(&self, chat_id: &str) -> Result<EmbedReceipt, AnalysisError> {
        self.require_session()?;
        self.embed_window(chat_id)
            .await
            .inspect_err(|e| error!(chat_id, error = %e, "embedding generation failed"))
    }

    async fn embed_window(&self, chat_id: &str) -> Result<EmbedReceipt, AnalysisError> {
        let messages = self
            .bounded(
                "message fetch",
                self.session
                    .client()
                    .fetch_messages(chat_id, self.config.message_window),
            )
            .await?;
        let text = concatenate_bodies(&messages);
        debug!(
            chat_id,
            messages = messages.len(),
            chars = text.len(),
            model = self.embedder.model_name(),
            "embedding chat window"
        );

        let output = self.bounded("embedding", self.embedder.embed(&text)).await?;
        let dimensions = output.vector.len();
        let row = StoredEmbedding::new(chat_id, text, output);

        let row_id = match self.bounded("embedding store", self.repo.append(&row)).await {
            Ok(()) => {
                info!(chat_id, row_id = %row.id, dimensions, "embedding stored");
                Some(row.id)
            }
            Err(e) if self.config.strict_persistence => return Err(e),
            Err(e) => {
                warn!(chat_id, error = %e, "embedding computed but not stored");
                None
            }
        };

        Ok(EmbedReceipt {
            chat_id: chat_id.to_string(),
            row_id,
            dimensions,
        })
    }

    /// Analyze everything stored for a chat.
    ///
    /// Works without a linked session so history stays analyzable after logout.
    pub async fn analyze(&self, chat_id: &str) -> Result<AnalysisResult, AnalysisError> {
        self.analyze_stored(chat_id).await.inspect_err(|e| match e {
            AnalysisError::NotFound(_) => debug!(chat_id, "no stored embeddings"),
            _ => error!(chat_id, error = %e, "chat analysis failed"),
        })
    }

    async fn analyze_stored(&self, chat_id: &str) -> Result<AnalysisResult, AnalysisError> {
        let rows = self
            .bounded("embedding lookup", self.repo.list_for_chat(chat_id))
            .await?;
        if rows.is_empty() {
            return Err(AnalysisError::NotFound(format!(
                "no embeddings stored for chat {chat_id}"
            )));
        }

        let request = build_analysis_request(&rows, &self.prompt, self.config.max_tokens)?;
        let response = self
            .bounded("completion", self.provider.complete(&request))
            .await?;
        info!(
            chat_id,
            rows = rows.len(),
            provider = self.provider.name(),
            output_tokens = response.usage.output_tokens,
            "chat analysis generated"
        );

        Ok(AnalysisResult {
            chat_id: chat_id.to_string(),
            analysis: response.content,
        })
    }
}
