//! Infrastructure layer for chatlens.
//!
//! Implementations of the ports defined in `chatlens-core`: the SQLite
//! embedding repository, the OpenAI embeddings client, the OpenAI-compatible
//! completion provider, the HTTP bridge to the messaging client, and the QR
//! pairing renderer. Also loads `config.toml` from the data directory.

pub mod bridge;
pub mod config;
pub mod embedding;
pub mod llm;
pub mod pairing;
pub mod sqlite;
