//! Connection lifecycle state machine for one pairing session.
//!
//! Events are delivered serially by the transport, so a handler is never
//! re-entered for the same session. The two guards that matter live here:
//! `pairing_requested`, set synchronously before the pairing-code call so
//! repeated `Connecting` events can never issue a second request, and the
//! one-shot [`CodeResponder`], so no lifecycle event can answer the same
//! HTTP request twice.

use crate::error::PairError;
use crate::phone::PhoneIdentifier;
use crate::session::delivery;
use crate::session::store::SessionStore;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};
use wa_gateway_client::{ConnectionEvent, ConnectionHandle, EventStream};

/// Lifecycle states of one connection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    PairingIssued,
    Open,
    Closed,
}

/// One-shot responder for the pairing request.
///
/// The first resolution wins; later attempts are dropped.
pub struct CodeResponder {
    tx: Option<oneshot::Sender<Result<String, PairError>>>,
}

impl CodeResponder {
    pub fn new(tx: oneshot::Sender<Result<String, PairError>>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn is_resolved(&self) -> bool {
        self.tx.is_none()
    }

    pub fn resolve(&mut self, result: Result<String, PairError>) {
        match self.tx.take() {
            // The receiver may be gone if the caller hung up; the session's
            // side effects continue regardless.
            Some(tx) => {
                let _ = tx.send(result);
            }
            None => debug!("pairing response already sent, suppressing duplicate"),
        }
    }
}

/// One live pairing session bound to a store and a connection.
pub struct PairingSession {
    number: PhoneIdentifier,
    store: Arc<SessionStore>,
    connection: Arc<dyn ConnectionHandle>,
    responder: CodeResponder,
    state: SessionState,
    pairing_requested: bool,
}

impl PairingSession {
    pub fn new(
        number: PhoneIdentifier,
        store: Arc<SessionStore>,
        connection: Arc<dyn ConnectionHandle>,
        responder: CodeResponder,
    ) -> Self {
        Self {
            number,
            store,
            connection,
            responder,
            state: SessionState::Idle,
            pairing_requested: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Drive the session until the connection closes or the event stream
    /// ends. Dropping an unresolved responder surfaces to the waiting
    /// caller as a pairing failure.
    pub async fn run(mut self, mut events: EventStream) {
        while let Some(event) = events.next().await {
            self.handle_event(event).await;
            if self.state == SessionState::Closed {
                break;
            }
        }
    }

    /// Apply one lifecycle event.
    pub async fn handle_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Connecting => self.on_connecting().await,
            ConnectionEvent::Open => self.on_open().await,
            ConnectionEvent::Close { status } => self.on_close(status),
        }
    }

    async fn on_connecting(&mut self) {
        if self.state == SessionState::Idle {
            self.state = SessionState::Connecting;
        }
        if self.connection.is_registered() || self.pairing_requested {
            return;
        }
        // Set before the await: a later connecting event must find the
        // guard already up.
        self.pairing_requested = true;

        match self
            .connection
            .request_pairing_code(self.number.as_str())
            .await
        {
            Ok(code) => {
                let code = format_pairing_code(&code);
                self.state = SessionState::PairingIssued;
                info!(phone_number = %self.number, code = %code, "pairing code issued");
                self.responder.resolve(Ok(code));
            }
            Err(err) => {
                warn!(phone_number = %self.number, %err, "pairing code request failed");
                self.responder
                    .resolve(Err(PairError::PairingRequestFailed(err.to_string())));
            }
        }
    }

    async fn on_open(&mut self) {
        if self.state == SessionState::Open {
            return;
        }
        self.state = SessionState::Open;
        info!(phone_number = %self.number, "linked to the service");

        // Linkage already succeeded; a delivery failure neither reopens
        // nor alters the connection.
        if let Err(err) = delivery::deliver(&*self.connection, &self.store, &self.number).await {
            warn!(phone_number = %self.number, %err, "credential delivery failed");
        }
    }

    fn on_close(&mut self, status: Option<u16>) {
        self.state = SessionState::Closed;
        info!(phone_number = %self.number, status = ?status, "connection closed");
        // Single-shot session: no reconnect.
    }
}

/// Reformat a raw pairing code into 4-character groups joined by `-`.
pub fn format_pairing_code(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    chars
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("-")
}
