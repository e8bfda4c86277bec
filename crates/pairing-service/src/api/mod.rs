//! HTTP API for the pairing service.

mod handlers;
mod types;

pub use handlers::*;
pub use types::*;

use crate::session::store::SessionStores;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use wa_gateway_client::Transport;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Transport used to open connections to the messaging service
    pub transport: Arc<dyn Transport>,
    /// Session store provisioner
    pub stores: Arc<SessionStores>,
}

impl AppState {
    /// Create new application state.
    pub fn new(transport: Arc<dyn Transport>, stores: SessionStores) -> Self {
        Self {
            transport,
            stores: Arc::new(stores),
        }
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/pair", get(handlers::pair))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
