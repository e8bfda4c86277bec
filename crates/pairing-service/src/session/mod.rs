//! Pairing session: store provisioning, connection lifecycle, credential
//! delivery.

pub mod delivery;
pub mod lifecycle;
pub mod store;

pub use lifecycle::{CodeResponder, PairingSession, SessionState};
pub use store::{SessionStore, SessionStores, StoreError};
