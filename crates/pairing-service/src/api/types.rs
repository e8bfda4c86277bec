//! API request and response types.

use serde::{Deserialize, Serialize};

/// Query parameters for the pairing endpoint.
#[derive(Debug, Deserialize)]
pub struct PairQuery {
    /// Phone number in free-form digits/symbols
    pub number: Option<String>,
}

/// Successful pairing response.
#[derive(Debug, Serialize)]
pub struct CodeResponse {
    /// Pairing code formatted for manual entry
    pub code: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub gateway_healthy: bool,
}
