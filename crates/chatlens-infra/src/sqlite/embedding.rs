//! SQLite embedding repository implementation.
//!
//! Implements `EmbeddingRepository` from `chatlens-core`. Vectors and usage
//! metadata are stored as JSON text; rows come back in insertion order.

use chatlens_core::analysis::EmbeddingRepository;
use chatlens_types::embedding::{EmbeddingUsage, StoredEmbedding};
use chatlens_types::error::RepositoryError;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `EmbeddingRepository`.
#[derive(Clone)]
pub struct SqliteEmbeddingRepository {
    pool: DatabasePool,
}

impl SqliteEmbeddingRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to `StoredEmbedding`.
struct EmbeddingRow {
    id: String,
    chat_id: String,
    embedding: String,
    usage: String,
    model: String,
    content: String,
    created_at: String,
}

impl EmbeddingRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            chat_id: row.try_get("chat_id")?,
            embedding: row.try_get("embedding")?,
            usage: row.try_get("usage")?,
            model: row.try_get("model")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_stored(self) -> Result<StoredEmbedding, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid embedding id: {e}")))?;
        let embedding: Vec<f32> = serde_json::from_str(&self.embedding)
            .map_err(|e| RepositoryError::Query(format!("invalid embedding vector: {e}")))?;
        let usage: EmbeddingUsage = serde_json::from_str(&self.usage)
            .map_err(|e| RepositoryError::Query(format!("invalid usage: {e}")))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))?;

        Ok(StoredEmbedding {
            id,
            chat_id: self.chat_id,
            embedding,
            usage,
            model: self.model,
            content: self.content,
            created_at,
        })
    }
}

impl EmbeddingRepository for SqliteEmbeddingRepository {
    async fn append(&self, row: &StoredEmbedding) -> Result<(), RepositoryError> {
        let embedding = serde_json::to_string(&row.embedding)
            .map_err(|e| RepositoryError::Query(format!("failed to encode vector: {e}")))?;
        let usage = serde_json::to_string(&row.usage)
            .map_err(|e| RepositoryError::Query(format!("failed to encode usage: {e}")))?;

        sqlx::query(
            r#"INSERT INTO chat_embeddings (id, chat_id, embedding, usage, model, content, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(row.id.to_string())
        .bind(&row.chat_id)
        .bind(embedding)
        .bind(usage)
        .bind(&row.model)
        .bind(&row.content)
        .bind(row.created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_for_chat(&self, chat_id: &str) -> Result<Vec<StoredEmbedding>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT id, chat_id, embedding, usage, model, content, created_at
               FROM chat_embeddings
               WHERE chat_id = ?
               ORDER BY created_at ASC, rowid ASC"#,
        )
        .bind(chat_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|r| {
                EmbeddingRow::from_row(r)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_stored()
            })
            .collect()
    }
}
