//! Gateway API types.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lifecycle event for one connection, delivered serially.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Connecting,
    Open,
    Close { status: Option<u16> },
}

/// Raw event envelope polled from the gateway.
///
/// Credential mutations travel on the same feed as lifecycle transitions;
/// the transport routes them into the session's credential sink instead of
/// surfacing them as `ConnectionEvent`s.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GatewayEvent {
    Connecting,
    Open,
    Close {
        #[serde(default)]
        status: Option<u16>,
    },
    /// Credential-state mutation; `data` is base64-encoded.
    Credentials { name: String, data: String },
}

/// Options applied when the gateway creates a session socket.
#[derive(Debug, Clone, Serialize)]
pub struct SessionOptions {
    /// Browser fingerprint label presented to the service.
    pub device_label: String,

    /// Whether the session marks itself online on connect.
    pub mark_online: bool,

    /// Socket keep-alive interval.
    #[serde(with = "humantime_serde")]
    pub keep_alive: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            device_label: "Chrome (Android)".into(),
            mark_online: false,
            keep_alive: Duration::from_secs(30),
        }
    }
}

/// Request to create a gateway session.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest {
    pub number: String,

    #[serde(flatten)]
    pub options: SessionOptions,
}

/// Gateway session handle returned at creation.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,

    /// Whether the session already holds registered credentials.
    #[serde(default)]
    pub registered: bool,
}

/// Request to issue a pairing code for a phone number.
#[derive(Debug, Clone, Serialize)]
pub struct PairingCodeRequest {
    pub number: String,
}

/// Response carrying the raw pairing code.
#[derive(Debug, Clone, Deserialize)]
pub struct PairingCodeResponse {
    pub code: String,
}

/// Outgoing message payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutgoingMessage {
    Text {
        text: String,
    },
    Document {
        /// Base64-encoded file content.
        data: String,
        mimetype: String,
        filename: String,
    },
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn document(bytes: &[u8], mimetype: impl Into<String>, filename: impl Into<String>) -> Self {
        Self::Document {
            data: BASE64.encode(bytes),
            mimetype: mimetype.into(),
            filename: filename.into(),
        }
    }

    /// Decoded document content, if this is a document message.
    pub fn document_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Self::Document { data, .. } => BASE64.decode(data.as_bytes()).ok(),
            Self::Text { .. } => None,
        }
    }
}

/// Request to send a message through a session.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub recipient: String,
    pub message: OutgoingMessage,
}
