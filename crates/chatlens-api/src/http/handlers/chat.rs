//! Conversation browsing endpoints (linked session required).

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use chatlens_types::chat::{ChatMessage, ChatSummary};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesResponse {
    pub chat_id: String,
    pub messages: Vec<ChatMessage>,
}

/// GET /conversations
pub async fn list_conversations(
    State(state): State<AppState>,
) -> Result<Json<Vec<ChatSummary>>, AppError> {
    Ok(Json(state.pipeline.list_conversations().await?))
}

/// GET /messages/{chat_id} - The most recent messages of one chat.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<MessagesResponse>, AppError> {
    let messages = state.pipeline.recent_messages(&chat_id).await?;
    Ok(Json(MessagesResponse { chat_id, messages }))
}
