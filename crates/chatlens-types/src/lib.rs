//! Shared domain types for chatlens.
//!
//! Session lifecycle state, chat and message views, stored embeddings,
//! LLM request/response shapes, configuration, and the error enums used
//! across the workspace.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod session;
