//! Session lifecycle controller.
//!
//! Normalizes messaging-client callbacks into the
//! `Unpaired -> Pairing -> Authenticated` state machine, owns the session
//! snapshot, and publishes every transition on the [`SessionBus`].
//!
//! All event-driven transitions go through [`SessionController::handle_event`],
//! a synchronous function holding the state lock for the whole transition
//! (including the publish), so a subscriber that connects concurrently sees
//! either the old snapshot plus the broadcast, or the new snapshot alone.
//!
//! Operator logout is serialized by an in-flight guard: a second logout
//! while one is running is rejected instead of tearing the client down twice.

use std::sync::{Mutex, MutexGuard};

use chatlens_types::error::SessionError;
use chatlens_types::session::{LifecycleEvent, PairingQuery, SessionPhase, SessionState};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::bus::{SessionBus, Subscription};
use super::render::PairingRenderer;
use crate::messaging::ChatClient;

#[derive(Debug, Default)]
struct Inner {
    state: SessionState,
    phase: SessionPhase,
}

/// Owner of the linked-session state for one messaging client.
pub struct SessionController<C: ChatClient> {
    client: C,
    renderer: Box<dyn PairingRenderer>,
    inner: Mutex<Inner>,
    bus: SessionBus,
    logout_guard: tokio::sync::Mutex<()>,
}

impl<C: ChatClient> SessionController<C> {
    /// Create a controller in the `Unpaired` phase with an empty snapshot.
    pub fn new(client: C, renderer: Box<dyn PairingRenderer>, bus: SessionBus) -> Self {
        Self {
            client,
            renderer,
            inner: Mutex::new(Inner::default()),
            bus,
            logout_guard: tokio::sync::Mutex::new(()),
        }
    }

    /// Access the messaging client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Access the notification bus.
    pub fn bus(&self) -> &SessionBus {
        &self.bus
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave Inner half-written:
        // every transition assigns whole fields.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Current state-machine phase.
    pub fn phase(&self) -> SessionPhase {
        self.lock().phase
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().state.authenticated
    }

    /// Pull query for the pairing artifact.
    pub fn pairing_status(&self) -> PairingQuery {
        PairingQuery::from(&self.lock().state)
    }

    /// Connect a push subscriber: the current snapshot plus every later transition.
    pub fn subscribe(&self) -> Subscription {
        let inner = self.lock();
        Subscription {
            snapshot: inner.state.clone(),
            receiver: self.bus.subscribe(),
        }
    }

    /// Apply one lifecycle event and broadcast the resulting state.
    ///
    /// A pairing code that cannot be rendered leaves the state untouched.
    pub fn handle_event(&self, event: LifecycleEvent) -> Result<SessionState, SessionError> {
        let mut inner = self.lock();
        let previous = inner.phase;

        match (event, previous) {
            (LifecycleEvent::PairingCodeProduced { raw }, phase) => {
                let artifact = self.renderer.render(&raw).map_err(|e| {
                    error!(error = %e, "failed to render pairing code");
                    SessionError::from(e)
                })?;
                if phase == SessionPhase::Authenticated {
                    warn!("pairing code received while authenticated, dropping session");
                }
                inner.state.pairing_artifact = Some(artifact);
                inner.state.authenticated = false;
                inner.phase = SessionPhase::Pairing;
            }
            (LifecycleEvent::Authenticated, _) => {
                inner.state.pairing_artifact = None;
                inner.state.authenticated = true;
                inner.phase = SessionPhase::Authenticated;
            }
            (LifecycleEvent::AuthFailed { reason }, phase) => {
                warn!(
                    from = %phase,
                    reason = reason.as_deref().unwrap_or("unspecified"),
                    "messaging client authentication failed"
                );
                inner.state.authenticated = false;
                inner.phase = SessionPhase::Unpaired;
            }
        }

        info!(from = %previous, to = %inner.phase, "session transition");
        let snapshot = inner.state.clone();
        self.bus.publish(snapshot.clone());
        Ok(snapshot)
    }

    /// Log the linked account out, then restart the client so a new pairing
    /// code is produced.
    ///
    /// Only valid while `Authenticated`. If the client rejects the logout,
    /// nothing changes. A pairing code or auth failure that arrives while the
    /// client is logging out is kept rather than reset. If the restart fails,
    /// the session stays `Unpaired` and the error is returned.
    pub async fn logout(&self) -> Result<SessionState, SessionError> {
        let _in_flight = self
            .logout_guard
            .try_lock()
            .map_err(|_| SessionError::InvalidState("logout already in progress".to_string()))?;

        let phase = self.phase();
        if phase != SessionPhase::Authenticated {
            debug!(%phase, "logout rejected");
            return Err(SessionError::InvalidState("no active session".to_string()));
        }

        self.client.logout().await.map_err(|e| {
            error!(error = %e, "messaging client logout failed");
            SessionError::Upstream(e.to_string())
        })?;

        let snapshot = {
            let mut inner = self.lock();
            // A lifecycle event during teardown already moved the session on.
            if inner.phase == SessionPhase::Authenticated {
                inner.state = SessionState::default();
                inner.phase = SessionPhase::Unpaired;
                self.bus.publish(inner.state.clone());
            } else {
                debug!(phase = %inner.phase, "session changed during logout, keeping newer state");
            }
            inner.state.clone()
        };
        info!("session logged out, restarting messaging client");

        self.client.initialize().await.map_err(|e| {
            error!(error = %e, "messaging client restart after logout failed");
            SessionError::Upstream(e.to_string())
        })?;

        Ok(snapshot)
    }

    /// Initialize the messaging client once at boot.
    pub async fn start(&self) -> Result<(), SessionError> {
        self.client
            .initialize()
            .await
            .map_err(|e| SessionError::Upstream(e.to_string()))
    }

    /// Feed lifecycle events into the state machine until the channel closes.
    pub async fn drive(&self, mut events: mpsc::Receiver<LifecycleEvent>) {
        while let Some(event) = events.recv().await {
            if let Err(e) = self.handle_event(event) {
                warn!(error = %e, "lifecycle event ignored");
            }
        }
        debug!("lifecycle event channel closed");
    }
}

impl<C: ChatClient> std::fmt::Debug for SessionController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("phase", &self.phase())
            .field("bus", &self.bus)
            .finish()
    }
}
