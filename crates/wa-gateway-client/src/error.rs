//! Gateway client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("gateway API error: {0}")]
    Api(String),

    #[error("session conflict: {0}")]
    Conflict(String),

    #[error("rate limited by the service: {0}")]
    RateLimited(String),

    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    #[error("send failed: {0}")]
    SendFailed(String),
}
