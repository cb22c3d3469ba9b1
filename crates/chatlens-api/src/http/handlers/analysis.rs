//! Embedding and analysis endpoints.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use chatlens_types::embedding::AnalysisResult;

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /generate-embedding/{chat_id}
pub async fn generate_embedding(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let receipt = state.pipeline.embed(&chat_id).await?;
    Ok(Json(json!({ "chatId": receipt.chat_id })))
}

/// GET /chat-stats/{chat_id} - LLM analysis of everything stored for a chat.
pub async fn chat_stats(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<AnalysisResult>, AppError> {
    Ok(Json(state.pipeline.analyze(&chat_id).await?))
}
