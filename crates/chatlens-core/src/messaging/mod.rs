//! Port for the external messaging client.

pub mod client;

pub use client::ChatClient;
