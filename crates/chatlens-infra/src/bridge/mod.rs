//! HTTP bridge to the external messaging client.
//!
//! The messaging client runs out of process behind a small HTTP gateway.
//! [`BridgeChatClient`] implements the `ChatClient` port over its REST
//! endpoints and forwards its server-sent lifecycle events to the session
//! controller.

pub mod client;
pub mod events;

pub use client::BridgeChatClient;
pub use events::map_bridge_event;
