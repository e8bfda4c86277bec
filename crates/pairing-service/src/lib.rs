//! WhatsApp pairing service - one-shot device pairing over a gateway.
//!
//! Exchanges a phone number for a pairing code and, once the device owner
//! approves the linkage, delivers the resulting credential artifact back
//! to the owning device. Sessions are single-shot: each request gets a
//! fresh credential store and one connection, and nothing reconnects
//! after close.

pub mod api;
pub mod config;
pub mod error;
pub mod fault;
pub mod phone;
pub mod session;

pub use config::Config;
pub use error::PairError;
pub use phone::PhoneIdentifier;
