//! Shared mocks for the core test modules.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chatlens_types::chat::{ChatMessage, ChatSummary};
use chatlens_types::error::{ClientError, RenderError};
use tokio::sync::Notify;

use crate::messaging::ChatClient;
use crate::session::PairingRenderer;

/// Messaging client double that counts calls and can be told to fail.
#[derive(Default)]
pub struct MockChatClient {
    pub initialize_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
    pub fail_logout: AtomicBool,
    pub fail_initialize: AtomicBool,
    pub fail_fetch: AtomicBool,
    /// When set, `logout` blocks until the gate is notified.
    pub logout_gate: Option<Notify>,
    pub messages: Mutex<Vec<ChatMessage>>,
    pub chats: Mutex<Vec<ChatSummary>>,
}

impl MockChatClient {
    pub fn with_messages(bodies: &[&str]) -> Self {
        let messages = bodies
            .iter()
            .enumerate()
            .map(|(i, body)| ChatMessage {
                from: format!("{i}@c.us"),
                body: (*body).to_string(),
                timestamp: 1_700_000_000 + i as i64,
            })
            .collect();
        Self {
            messages: Mutex::new(messages),
            ..Default::default()
        }
    }

    pub fn gated() -> Self {
        Self {
            logout_gate: Some(Notify::new()),
            ..Default::default()
        }
    }
}

impl ChatClient for MockChatClient {
    async fn initialize(&self) -> Result<(), ClientError> {
        self.initialize_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_initialize.load(Ordering::SeqCst) {
            return Err(ClientError::Request("browser crashed".to_string()));
        }
        Ok(())
    }

    async fn logout(&self) -> Result<(), ClientError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.logout_gate {
            gate.notified().await;
        }
        if self.fail_logout.load(Ordering::SeqCst) {
            return Err(ClientError::Request("logout rejected".to_string()));
        }
        Ok(())
    }

    async fn list_chats(&self) -> Result<Vec<ChatSummary>, ClientError> {
        Ok(self.chats.lock().unwrap().clone())
    }

    async fn fetch_messages(
        &self,
        _chat_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, ClientError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(ClientError::Request("chat not found".to_string()));
        }
        let messages = self.messages.lock().unwrap();
        let skip = messages.len().saturating_sub(limit);
        Ok(messages[skip..].to_vec())
    }
}

/// Renderer double: prefixes the raw code, fails on `"unrenderable"`.
pub struct StubRenderer;

impl PairingRenderer for StubRenderer {
    fn render(&self, raw: &str) -> Result<String, RenderError> {
        if raw == "unrenderable" {
            return Err(RenderError::Encode("too long".to_string()));
        }
        Ok(format!("img:{raw}"))
    }
}
