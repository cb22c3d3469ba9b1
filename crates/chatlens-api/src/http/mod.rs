//! HTTP and WebSocket surface for chatlens.
//!
//! Plain JSON bodies, a single error shape (`{code, message}`), and CORS
//! open to any origin.

pub mod error;
pub mod handlers;
pub mod router;
