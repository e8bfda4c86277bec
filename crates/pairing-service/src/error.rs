//! Error types for the pairing service.

use crate::phone::PhoneError;
use crate::session::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Request-level pairing errors.
///
/// The display string doubles as the `code` field of the JSON error body,
/// so internal detail stays out of user-facing variants.
#[derive(Debug, Error)]
pub enum PairError {
    #[error("Phone number required")]
    MissingIdentifier,

    #[error("Invalid phone number. Use full international format without +")]
    InvalidIdentifier(String),

    #[error("Failed to request pairing code")]
    PairingRequestFailed(String),

    #[error("Session storage error: {0}")]
    Storage(#[from] StoreError),
}

impl From<PhoneError> for PairError {
    fn from(err: PhoneError) -> Self {
        match err {
            PhoneError::Missing => PairError::MissingIdentifier,
            PhoneError::Invalid(detail) => PairError::InvalidIdentifier(detail),
        }
    }
}

/// Error response body, mirroring the success shape.
#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
}

impl IntoResponse for PairError {
    fn into_response(self) -> Response {
        let status = match &self {
            PairError::MissingIdentifier | PairError::InvalidIdentifier(_) => {
                StatusCode::BAD_REQUEST
            }
            PairError::PairingRequestFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
            PairError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorBody {
            code: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
