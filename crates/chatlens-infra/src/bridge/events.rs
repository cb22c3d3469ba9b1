//! Mapping of bridge server-sent events onto lifecycle events.

use chatlens_types::session::LifecycleEvent;

/// SSE event name carrying a fresh pairing code.
pub const EVENT_QR: &str = "qr";
/// SSE event name sent once the account is linked.
pub const EVENT_AUTHENTICATED: &str = "authenticated";
/// SSE event name sent when linking fails.
pub const EVENT_AUTH_FAILURE: &str = "auth_failure";

/// Translate one SSE frame into a lifecycle event.
///
/// Unknown event names return `None` and are ignored by the listener.
pub fn map_bridge_event(name: &str, data: &str) -> Option<LifecycleEvent> {
    match name {
        EVENT_QR => Some(LifecycleEvent::PairingCodeProduced {
            raw: data.to_string(),
        }),
        EVENT_AUTHENTICATED => Some(LifecycleEvent::Authenticated),
        EVENT_AUTH_FAILURE => {
            let reason = data.trim();
            Some(LifecycleEvent::AuthFailed {
                reason: (!reason.is_empty()).then(|| reason.to_string()),
            })
        }
        _ => None,
    }
}
