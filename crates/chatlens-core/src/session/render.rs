//! Pairing code rendering port.

use chatlens_types::error::RenderError;

/// Turns the raw pairing string from the messaging client into something a
/// person can scan (a `data:` URL image in production).
pub trait PairingRenderer: Send + Sync {
    fn render(&self, raw: &str) -> Result<String, RenderError>;
}
