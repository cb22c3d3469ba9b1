//! ChatClient trait definition.
//!
//! The messaging client owns the wire protocol, credential storage, and
//! pairing flow. chatlens only drives its lifecycle and queries chats and
//! messages once the account is linked. Lifecycle callbacks are delivered
//! separately as [`LifecycleEvent`]s over a channel.
//!
//! [`LifecycleEvent`]: chatlens_types::session::LifecycleEvent

use chatlens_types::chat::{ChatMessage, ChatSummary};
use chatlens_types::error::ClientError;

/// Trait for the stateful messaging client collaborator.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in chatlens-infra (e.g., `BridgeChatClient`).
pub trait ChatClient: Send + Sync {
    /// Start (or restart) the client session. A fresh pairing code follows
    /// when no stored credentials are valid.
    fn initialize(&self) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Drop the linked credentials.
    fn logout(&self) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// List every chat visible to the linked account.
    fn list_chats(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ChatSummary>, ClientError>> + Send;

    /// Fetch up to `limit` of the most recent messages of a chat, oldest first.
    fn fetch_messages(
        &self,
        chat_id: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, ClientError>> + Send;
}
