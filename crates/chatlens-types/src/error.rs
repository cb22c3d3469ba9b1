use thiserror::Error;

use crate::llm::LlmError;

/// Errors from the session lifecycle controller.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The operation is not valid in the current lifecycle phase.
    #[error("invalid session state: {0}")]
    InvalidState(String),

    /// The messaging client failed.
    #[error("messaging client error: {0}")]
    Upstream(String),

    #[error("failed to render pairing code: {0}")]
    Render(#[from] RenderError),
}

/// Errors from the conversation analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The operation requires a linked session.
    #[error("not authenticated")]
    Unauthenticated,

    #[error("not found: {0}")]
    NotFound(String),

    /// A collaborator, provider, or datastore call failed.
    #[error("{0}")]
    Upstream(String),
}

impl From<ClientError> for AnalysisError {
    fn from(e: ClientError) -> Self {
        AnalysisError::Upstream(e.to_string())
    }
}

impl From<LlmError> for AnalysisError {
    fn from(e: LlmError) -> Self {
        AnalysisError::Upstream(e.to_string())
    }
}

impl From<RepositoryError> for AnalysisError {
    fn from(e: RepositoryError) -> Self {
        AnalysisError::Upstream(e.to_string())
    }
}

/// Errors from the messaging client collaborator.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("messaging client not ready")]
    NotReady,

    #[error("request failed: {0}")]
    Request(String),

    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("query error: {0}")]
    Query(String),
}

/// Errors turning a raw pairing code into an image.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pairing code could not be encoded: {0}")]
    Encode(String),
}
