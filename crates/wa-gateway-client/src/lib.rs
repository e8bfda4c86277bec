//! WhatsApp gateway transport client.
//!
//! The gateway sidecar owns the wire protocol to the messaging service;
//! this crate talks to its REST API and exposes the transport seam used by
//! the pairing service: a typed client, the `Transport`/`ConnectionHandle`
//! traits, and a polling lifecycle event stream per session.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::GatewayClient;
pub use error::TransportError;
pub use transport::{
    ConnectionHandle, CredentialSink, EventStream, GatewayTransport, OpenedConnection, Transport,
};
pub use types::{ConnectionEvent, GatewayEvent, OutgoingMessage, SessionOptions};
