//! HTTP request handlers.

use super::types::{CodeResponse, HealthResponse, PairQuery};
use super::AppState;
use crate::error::PairError;
use crate::phone::PhoneIdentifier;
use crate::session::lifecycle::{CodeResponder, PairingSession};
use axum::extract::{Query, State};
use axum::Json;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::info;

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        gateway_healthy: state.transport.healthy().await,
    })
}

/// Exchange a phone number for a pairing code.
///
/// Provisions a fresh store, opens one connection bound to it, and waits
/// for the session to resolve the pairing code. The spawned session task
/// outlives the response: credential capture and delivery complete even
/// if the caller hangs up first.
pub async fn pair(
    State(state): State<AppState>,
    Query(query): Query<PairQuery>,
) -> Result<Json<CodeResponse>, PairError> {
    let raw = query.number.unwrap_or_default();
    let number = PhoneIdentifier::normalize(&raw)?;
    info!(phone_number = %number, "pairing request received");

    let store = Arc::new(state.stores.provision(&number).await?);

    let opened = state
        .transport
        .open(number.as_str(), store.clone())
        .await
        .map_err(|err| PairError::PairingRequestFailed(err.to_string()))?;

    let (tx, rx) = oneshot::channel();
    let session = PairingSession::new(number, store, opened.handle, CodeResponder::new(tx));
    tokio::spawn(session.run(opened.events));

    match rx.await {
        Ok(result) => result.map(|code| Json(CodeResponse { code })),
        Err(_) => Err(PairError::PairingRequestFailed(
            "connection closed before a pairing code was issued".into(),
        )),
    }
}
