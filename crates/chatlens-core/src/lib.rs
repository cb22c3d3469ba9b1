//! Business logic and collaborator ports for chatlens.
//!
//! This crate defines the traits (messaging client, pairing renderer,
//! embedder, completion provider, embedding repository) that the
//! infrastructure layer implements, plus the session lifecycle controller,
//! the notification fan-out bus, and the conversation analysis pipeline.
//! It never depends on `chatlens-infra` or any HTTP/database crate.

pub mod analysis;
pub mod llm;
pub mod messaging;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
