//! WebSocket push channel for session state.
//!
//! On connect the client receives `welcome`, the current `qr` (only when a
//! pairing image exists) and `authenticated`. Every later transition is
//! sent as a `qr` frame followed by an `authenticated` frame.
//!
//! Delivery is best effort: a client that falls behind the bus skips the
//! missed transitions and resumes with the next one.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use chatlens_types::session::PushMessage;

use crate::state::AppState;

/// Incoming command from a WebSocket client.
#[derive(Debug, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    /// Keep-alive ping. Server responds with `{"type":"pong"}`.
    Ping,
}

/// GET /ws - Upgrade to the session push channel.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state))
}

async fn handle_ws_connection(socket: WebSocket, state: AppState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let subscription = state.session.subscribe();
    let mut state_rx = subscription.receiver;
    tracing::debug!(
        subscribers = state.session.bus().subscriber_count(),
        "push subscriber connected"
    );

    if send_frames(&mut ws_sender, PushMessage::for_connect(&subscription.snapshot))
        .await
        .is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            state_result = state_rx.recv() => {
                match state_result {
                    Ok(snapshot) => {
                        if send_frames(&mut ws_sender, PushMessage::for_state(&snapshot)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "push subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg_result = ws_receiver.next() => {
                match msg_result {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = process_command(text.as_str()) {
                            if send_frames(&mut ws_sender, [reply]).await.is_err() {
                                break;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(error = %err, "WebSocket receive error");
                        break;
                    }
                    // Binary and protocol-level ping/pong frames
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::debug!("push subscriber disconnected");
}

/// Parse one client frame; malformed frames are logged and ignored.
fn process_command(text: &str) -> Option<PushMessage> {
    match serde_json::from_str::<WsCommand>(text) {
        Ok(WsCommand::Ping) => Some(PushMessage::Pong),
        Err(err) => {
            tracing::warn!(raw = %text, error = %err, "ignoring malformed WebSocket command");
            None
        }
    }
}

async fn send_frames(
    ws_sender: &mut (impl SinkExt<Message, Error = axum::Error> + Unpin),
    frames: impl IntoIterator<Item = PushMessage>,
) -> Result<(), axum::Error> {
    for frame in frames {
        match serde_json::to_string(&frame) {
            Ok(json) => ws_sender.send(Message::Text(json.into())).await?,
            Err(err) => tracing::warn!(error = %err, "failed to serialize push frame"),
        }
    }
    Ok(())
}
