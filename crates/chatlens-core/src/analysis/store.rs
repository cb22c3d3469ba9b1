//! EmbeddingRepository trait definition.
//!
//! Append-only storage for chat embeddings. Multiple rows per chat are
//! expected and every one of them is returned on read.

use chatlens_types::embedding::StoredEmbedding;
use chatlens_types::error::RepositoryError;

/// Repository trait for stored chat embeddings.
///
/// Implementations live in chatlens-infra (e.g., `SqliteEmbeddingRepository`).
pub trait EmbeddingRepository: Send + Sync {
    /// Append one embedding row.
    fn append(
        &self,
        row: &StoredEmbedding,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All rows for a chat, in insertion order.
    fn list_for_chat(
        &self,
        chat_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<StoredEmbedding>, RepositoryError>> + Send;
}
