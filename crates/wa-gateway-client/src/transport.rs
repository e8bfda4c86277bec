//! Transport seam: connection lifecycle over the gateway API.

use crate::client::GatewayClient;
use crate::error::TransportError;
use crate::types::{ConnectionEvent, GatewayEvent, OutgoingMessage, SessionOptions};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_stream::Stream;
use tracing::{debug, error, warn};

/// Serial stream of lifecycle events for one connection.
pub type EventStream = Pin<Box<dyn Stream<Item = ConnectionEvent> + Send>>;

/// Receives credential-state mutations from the transport.
///
/// The transport invokes this on every key/credential change of the
/// in-progress handshake; the session store implements it.
#[async_trait]
pub trait CredentialSink: Send + Sync {
    async fn persist(&self, name: &str, bytes: &[u8]) -> std::io::Result<()>;
}

/// Operations available on a live connection.
#[async_trait]
pub trait ConnectionHandle: Send + Sync {
    /// Whether the session already holds registered credentials.
    fn is_registered(&self) -> bool;

    async fn request_pairing_code(&self, number: &str) -> Result<String, TransportError>;

    async fn send(&self, recipient: &str, message: OutgoingMessage)
        -> Result<(), TransportError>;
}

/// An opened connection: command handle plus its serial event stream.
pub struct OpenedConnection {
    pub handle: Arc<dyn ConnectionHandle>,
    pub events: EventStream,
}

/// Opens connections bound to a credential sink.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn open(
        &self,
        number: &str,
        sink: Arc<dyn CredentialSink>,
    ) -> Result<OpenedConnection, TransportError>;

    /// Reachability of the underlying service.
    async fn healthy(&self) -> bool {
        true
    }
}

/// Gateway-backed transport.
pub struct GatewayTransport {
    client: GatewayClient,
    options: SessionOptions,
    poll_interval: Duration,
}

impl GatewayTransport {
    pub fn new(client: GatewayClient, options: SessionOptions, poll_interval: Duration) -> Self {
        Self {
            client,
            options,
            poll_interval,
        }
    }
}

#[async_trait]
impl Transport for GatewayTransport {
    async fn open(
        &self,
        number: &str,
        sink: Arc<dyn CredentialSink>,
    ) -> Result<OpenedConnection, TransportError> {
        let session = self
            .client
            .create_session(number, self.options.clone())
            .await?;

        let handle = Arc::new(GatewayConnection {
            client: self.client.clone(),
            session_id: session.session_id.clone(),
            registered: session.registered,
        });

        let events = event_stream(
            self.client.clone(),
            session.session_id,
            sink,
            self.poll_interval,
        );

        Ok(OpenedConnection { handle, events })
    }

    async fn healthy(&self) -> bool {
        self.client.health_check().await
    }
}

struct GatewayConnection {
    client: GatewayClient,
    session_id: String,
    registered: bool,
}

#[async_trait]
impl ConnectionHandle for GatewayConnection {
    fn is_registered(&self) -> bool {
        self.registered
    }

    async fn request_pairing_code(&self, number: &str) -> Result<String, TransportError> {
        self.client
            .request_pairing_code(&self.session_id, number)
            .await
    }

    async fn send(
        &self,
        recipient: &str,
        message: OutgoingMessage,
    ) -> Result<(), TransportError> {
        self.client
            .send_message(&self.session_id, recipient, message)
            .await
    }
}

/// Poll gateway events until the connection closes.
///
/// Credential mutations are routed into the sink; only lifecycle events
/// reach the consumer. Poll errors back off and retry, except a gone
/// session, which ends the stream with a close event.
fn event_stream(
    client: GatewayClient,
    session_id: String,
    sink: Arc<dyn CredentialSink>,
    poll_interval: Duration,
) -> EventStream {
    Box::pin(async_stream::stream! {
        'poll: loop {
            match client.poll_events(&session_id).await {
                Ok(batch) => {
                    for event in batch {
                        match event {
                            GatewayEvent::Credentials { name, data } => {
                                let bytes = match BASE64.decode(data.as_bytes()) {
                                    Ok(bytes) => bytes,
                                    Err(err) => {
                                        warn!(name = %name, %err, "undecodable credential blob");
                                        continue;
                                    }
                                };
                                if let Err(err) = sink.persist(&name, &bytes).await {
                                    warn!(name = %name, %err, "failed to persist credential state");
                                }
                            }
                            GatewayEvent::Connecting => yield ConnectionEvent::Connecting,
                            GatewayEvent::Open => yield ConnectionEvent::Open,
                            GatewayEvent::Close { status } => {
                                yield ConnectionEvent::Close { status };
                                break 'poll;
                            }
                        }
                    }
                }
                Err(TransportError::ConnectionClosed(reason)) => {
                    debug!(session_id = %session_id, reason = %reason, "session gone, ending event stream");
                    yield ConnectionEvent::Close { status: None };
                    break 'poll;
                }
                Err(err) => {
                    error!(session_id = %session_id, "event poll error: {}", err);
                    sleep(Duration::from_secs(5)).await;
                    continue;
                }
            }

            sleep(poll_interval).await;
        }
    })
}
