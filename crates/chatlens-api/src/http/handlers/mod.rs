//! Request handlers, grouped by concern.

pub mod analysis;
pub mod chat;
pub mod session;
pub mod ws;
