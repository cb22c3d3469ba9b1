//! REST + SSE client for the messaging bridge.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use reqwest_eventsource::{Event, EventSource};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use chatlens_core::messaging::ChatClient;
use chatlens_types::chat::{ChatMessage, ChatSummary};
use chatlens_types::error::ClientError;
use chatlens_types::session::LifecycleEvent;

use super::events::map_bridge_event;

/// First delay before reopening a closed event stream.
const INITIAL_RECONNECT_DELAY: Duration = Duration::from_millis(250);
/// Upper bound for the doubling reconnect delay.
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(30);

/// `ChatClient` implementation talking to the messaging bridge over HTTP.
///
/// Does NOT derive Debug; it may hold the bridge token.
#[derive(Clone)]
pub struct BridgeChatClient {
    base_url: Url,
    token: Option<SecretString>,
    http: reqwest::Client,
    /// Separate client without a request timeout for the long-lived event stream.
    stream_http: reqwest::Client,
}

#[derive(Deserialize)]
struct BridgeChat {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

impl BridgeChatClient {
    /// Create a client for the bridge at `base_url`.
    ///
    /// `timeout` bounds every REST call; the event stream is never bounded.
    pub fn new(
        base_url: &str,
        token: Option<SecretString>,
        timeout: Option<Duration>,
    ) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Protocol(format!("invalid bridge URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Protocol(format!(
                "bridge URL '{base_url}' cannot be a base"
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Request(format!("failed to build HTTP client: {e}")))?;
        let stream_http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            token,
            http,
            stream_http,
        })
    }

    /// Build an endpoint URL from percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Protocol("bridge URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ClientError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::CONFLICT | StatusCode::SERVICE_UNAVAILABLE => ClientError::NotReady,
            _ => ClientError::Request(format!("HTTP {status}: {body}")),
        })
    }

    fn open_event_source(&self, url: &Url) -> Result<EventSource, ClientError> {
        let request = self.authorize(self.stream_http.get(url.clone()));
        EventSource::new(request)
            .map_err(|e| ClientError::Request(format!("cannot open event stream: {e}")))
    }

    /// Spawn the task that forwards bridge lifecycle events into `events`.
    ///
    /// Runs until `cancel` fires, the receiving side is dropped, or the
    /// bridge rejects the stream credentials (401/403). Any other closed or
    /// rejected stream is reopened after a doubling delay.
    pub fn spawn_listener(
        &self,
        events: mpsc::Sender<LifecycleEvent>,
        cancel: CancellationToken,
    ) -> Result<JoinHandle<()>, ClientError> {
        let url = self.endpoint(&["events"])?;
        let mut source = self.open_event_source(&url)?;
        let client = self.clone();

        Ok(tokio::spawn(async move {
            tracing::info!(url = %url, "listening for bridge events");
            let mut delay = INITIAL_RECONNECT_DELAY;
            loop {
                match forward_events(&mut source, &events, &cancel).await {
                    StreamEnd::Stop => break,
                    StreamEnd::Reconnect { opened } => {
                        if opened {
                            delay = INITIAL_RECONNECT_DELAY;
                        }
                    }
                }
                source.close();

                tracing::warn!(
                    delay_ms = delay.as_millis() as u64,
                    "bridge event stream closed, reconnecting"
                );
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
                delay = (delay * 2).min(MAX_RECONNECT_DELAY);

                source = match client.open_event_source(&url) {
                    Ok(source) => source,
                    Err(e) => {
                        tracing::error!(error = %e, "cannot reopen bridge event stream");
                        break;
                    }
                };
            }
            source.close();
            tracing::info!("bridge event listener stopped");
        }))
    }
}

/// Why [`forward_events`] returned.
enum StreamEnd {
    /// Cancelled, receiver gone, or credentials rejected.
    Stop,
    /// The source closed; `opened` is true if it delivered an open event first.
    Reconnect { opened: bool },
}

async fn forward_events(
    source: &mut EventSource,
    events: &mpsc::Sender<LifecycleEvent>,
    cancel: &CancellationToken,
) -> StreamEnd {
    let mut opened = false;
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => return StreamEnd::Stop,
            next = source.next() => next,
        };

        match next {
            Some(Ok(Event::Open)) => {
                opened = true;
                tracing::debug!("bridge event stream open");
            }
            Some(Ok(Event::Message(message))) => {
                let Some(event) = map_bridge_event(&message.event, &message.data) else {
                    tracing::trace!(event = %message.event, "ignoring bridge event");
                    continue;
                };
                if events.send(event).await.is_err() {
                    tracing::debug!("lifecycle receiver dropped, stopping listener");
                    return StreamEnd::Stop;
                }
            }
            // The source retries ended streams and transport errors itself.
            Some(Err(reqwest_eventsource::Error::StreamEnded)) => {
                tracing::debug!("bridge event stream ended, reconnecting");
            }
            Some(Err(reqwest_eventsource::Error::InvalidStatusCode(status, _)))
                if is_credential_rejection(status) =>
            {
                tracing::error!(%status, "bridge rejected event stream credentials");
                return StreamEnd::Stop;
            }
            Some(Err(
                e @ (reqwest_eventsource::Error::InvalidStatusCode(..)
                | reqwest_eventsource::Error::InvalidContentType(..)),
            )) => {
                tracing::warn!(error = %e, "bridge refused event stream");
                return StreamEnd::Reconnect { opened };
            }
            Some(Err(e)) => tracing::warn!(error = %e, "bridge event stream error"),
            None => return StreamEnd::Reconnect { opened },
        }
    }
}

fn is_credential_rejection(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

impl ChatClient for BridgeChatClient {
    async fn initialize(&self) -> Result<(), ClientError> {
        let url = self.endpoint(&["session", "initialize"])?;
        self.send(self.http.post(url)).await?;
        Ok(())
    }

    async fn logout(&self) -> Result<(), ClientError> {
        let url = self.endpoint(&["session", "logout"])?;
        self.send(self.http.post(url)).await?;
        Ok(())
    }

    async fn list_chats(&self) -> Result<Vec<ChatSummary>, ClientError> {
        let url = self.endpoint(&["chats"])?;
        let chats: Vec<BridgeChat> = self
            .send(self.http.get(url))
            .await?
            .json()
            .await
            .map_err(|e| ClientError::Protocol(format!("invalid chat list: {e}")))?;

        Ok(chats
            .into_iter()
            .map(|c| ChatSummary::new(c.id, c.name))
            .collect())
    }

    async fn fetch_messages(
        &self,
        chat_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, ClientError> {
        let url = self.endpoint(&["chats", chat_id, "messages"])?;
        self.send(self.http.get(url).query(&[("limit", limit)]))
            .await?
            .json()
            .await
            .map_err(|e| ClientError::Protocol(format!("invalid message list: {e}")))
    }
}
