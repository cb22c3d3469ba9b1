//! Session lifecycle types.
//!
//! `SessionState` is the snapshot pushed to subscribers and served to pull
//! clients. `SessionPhase` is the controller's state-machine position, and
//! `LifecycleEvent` is the normalized form of the messaging client's
//! pairing/authentication callbacks.

use serde::{Deserialize, Serialize};

/// Snapshot of the linked messaging session.
///
/// Invariant: `pairing_artifact` is only `Some` while `authenticated` is false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Displayable pairing image (`data:` URL) while a pairing is outstanding.
    pub pairing_artifact: Option<String>,
    /// Whether the messaging client currently holds valid credentials.
    pub authenticated: bool,
}

impl SessionState {
    /// True when the pairing invariant holds.
    pub fn is_consistent(&self) -> bool {
        !(self.authenticated && self.pairing_artifact.is_some())
    }
}

/// Position of the session in the pairing state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Unpaired,
    Pairing,
    Authenticated,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Unpaired => write!(f, "unpaired"),
            SessionPhase::Pairing => write!(f, "pairing"),
            SessionPhase::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// Lifecycle callbacks emitted by the messaging client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A new raw pairing code is available and must be rendered for scanning.
    PairingCodeProduced { raw: String },
    /// The account finished linking.
    Authenticated,
    /// Stored or freshly scanned credentials were rejected.
    AuthFailed { reason: Option<String> },
}

/// Answer to a pull query for the pairing artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingQuery {
    /// A pairing image is waiting to be scanned.
    Artifact(String),
    /// The session is already linked.
    Authenticated,
    /// Neither linked nor pairing (never paired, or mid-transition).
    Unavailable,
}

impl From<&SessionState> for PairingQuery {
    fn from(state: &SessionState) -> Self {
        match (&state.pairing_artifact, state.authenticated) {
            (Some(artifact), false) => PairingQuery::Artifact(artifact.clone()),
            (_, true) => PairingQuery::Authenticated,
            (None, false) => PairingQuery::Unavailable,
        }
    }
}

/// Messages written to push (WebSocket) subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PushMessage {
    /// Greeting sent once per connection.
    Welcome { message: String },
    /// Current pairing artifact (null once authenticated).
    Qr {
        #[serde(rename = "pairingArtifact")]
        pairing_artifact: Option<String>,
    },
    /// Current authentication flag.
    Authenticated { authenticated: bool },
    /// Reply to a client ping.
    Pong,
}

impl PushMessage {
    /// Frames describing a state transition, in wire order.
    pub fn for_state(state: &SessionState) -> [PushMessage; 2] {
        [
            PushMessage::Qr {
                pairing_artifact: state.pairing_artifact.clone(),
            },
            PushMessage::Authenticated {
                authenticated: state.authenticated,
            },
        ]
    }

    /// Frames sent to a freshly connected subscriber.
    ///
    /// The `qr` frame is only included when an artifact exists.
    pub fn for_connect(state: &SessionState) -> Vec<PushMessage> {
        let mut frames = vec![PushMessage::Welcome {
            message: "Connected to chatlens session feed".to_string(),
        }];
        if let Some(artifact) = &state.pairing_artifact {
            frames.push(PushMessage::Qr {
                pairing_artifact: Some(artifact.clone()),
            });
        }
        frames.push(PushMessage::Authenticated {
            authenticated: state.authenticated,
        });
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_state_serializes_camel_case() {
        let state = SessionState {
            pairing_artifact: Some("data:image/svg+xml;base64,AAA".to_string()),
            authenticated: false,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["pairingArtifact"], "data:image/svg+xml;base64,AAA");
        assert_eq!(json["authenticated"], false);
    }

    #[test]
    fn consistency_rejects_artifact_while_authenticated() {
        let bad = SessionState {
            pairing_artifact: Some("x".to_string()),
            authenticated: true,
        };
        assert!(!bad.is_consistent());
        assert!(SessionState::default().is_consistent());
    }

    #[test]
    fn pairing_query_from_state() {
        let pairing = SessionState {
            pairing_artifact: Some("img".to_string()),
            authenticated: false,
        };
        assert_eq!(PairingQuery::from(&pairing), PairingQuery::Artifact("img".to_string()));

        let linked = SessionState {
            pairing_artifact: None,
            authenticated: true,
        };
        assert_eq!(PairingQuery::from(&linked), PairingQuery::Authenticated);
        assert_eq!(
            PairingQuery::from(&SessionState::default()),
            PairingQuery::Unavailable
        );
    }

    #[test]
    fn push_message_wire_shapes() {
        let qr = serde_json::to_string(&PushMessage::Qr {
            pairing_artifact: None,
        })
        .unwrap();
        assert_eq!(qr, r#"{"type":"qr","pairingArtifact":null}"#);

        let auth = serde_json::to_string(&PushMessage::Authenticated {
            authenticated: true,
        })
        .unwrap();
        assert_eq!(auth, r#"{"type":"authenticated","authenticated":true}"#);

        assert_eq!(
            serde_json::to_string(&PushMessage::Pong).unwrap(),
            r#"{"type":"pong"}"#
        );
    }

    #[test]
    fn connect_frames_skip_missing_artifact() {
        let frames = PushMessage::for_connect(&SessionState::default());
        assert_eq!(frames.len(), 2);
        assert!(matches!(frames[0], PushMessage::Welcome { .. }));
        assert_eq!(
            frames[1],
            PushMessage::Authenticated {
                authenticated: false
            }
        );

        let pairing = SessionState {
            pairing_artifact: Some("img".to_string()),
            authenticated: false,
        };
        let frames = PushMessage::for_connect(&pairing);
        assert_eq!(frames.len(), 3);
        assert!(matches!(frames[1], PushMessage::Qr { .. }));
    }

    #[test]
    fn phase_display() {
        assert_eq!(SessionPhase::Pairing.to_string(), "pairing");
        assert_eq!(SessionPhase::default(), SessionPhase::Unpaired);
    }
}
