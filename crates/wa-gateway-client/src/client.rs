//! WhatsApp gateway HTTP client.

use crate::error::TransportError;
use crate::types::*;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use urlencoding::encode;

/// Typed client for the gateway REST API.
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
}

impl GatewayClient {
    /// Create a new gateway client.
    pub fn new(
        base_url: impl Into<String>,
        connect_timeout: Duration,
        query_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(query_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Check if the gateway is healthy.
    pub async fn health_check(&self) -> bool {
        self.client
            .get(format!("{}/v1/health", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    /// Open a session socket for a phone number.
    #[instrument(skip(self, options))]
    pub async fn create_session(
        &self,
        number: &str,
        options: SessionOptions,
    ) -> Result<SessionInfo, TransportError> {
        let response = self
            .client
            .post(format!("{}/v1/sessions", self.base_url))
            .json(&CreateSessionRequest {
                number: number.to_string(),
                options,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let info: SessionInfo = response.json().await?;
        debug!(session_id = %info.session_id, "gateway session created");
        Ok(info)
    }

    /// Tear down a session socket.
    #[instrument(skip(self))]
    pub async fn delete_session(&self, session_id: &str) -> Result<(), TransportError> {
        let response = self
            .client
            .delete(format!(
                "{}/v1/sessions/{}",
                self.base_url,
                encode(session_id)
            ))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        debug!(session_id = %session_id, "gateway session deleted");
        Ok(())
    }

    /// Drain pending events for a session.
    pub async fn poll_events(&self, session_id: &str) -> Result<Vec<GatewayEvent>, TransportError> {
        let response = self
            .client
            .get(format!(
                "{}/v1/sessions/{}/events",
                self.base_url,
                encode(session_id)
            ))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let events: Vec<GatewayEvent> = response.json().await?;
        if !events.is_empty() {
            debug!(session_id = %session_id, count = events.len(), "gateway events received");
        }
        Ok(events)
    }

    /// Ask the service to issue a pairing code for the number.
    #[instrument(skip(self))]
    pub async fn request_pairing_code(
        &self,
        session_id: &str,
        number: &str,
    ) -> Result<String, TransportError> {
        let response = self
            .client
            .post(format!(
                "{}/v1/sessions/{}/pairing-code",
                self.base_url,
                encode(session_id)
            ))
            .json(&PairingCodeRequest {
                number: number.to_string(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let body: PairingCodeResponse = response.json().await?;
        debug!(session_id = %session_id, "pairing code received");
        Ok(body.code)
    }

    /// Send a message through a session.
    #[instrument(skip(self, message))]
    pub async fn send_message(
        &self,
        session_id: &str,
        recipient: &str,
        message: OutgoingMessage,
    ) -> Result<(), TransportError> {
        let response = self
            .client
            .post(format!(
                "{}/v1/sessions/{}/messages",
                self.base_url,
                encode(session_id)
            ))
            .json(&SendMessageRequest {
                recipient: recipient.to_string(),
                message,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let err = Self::api_error(response).await;
            return Err(match err {
                TransportError::Api(msg) => TransportError::SendFailed(msg),
                other => other,
            });
        }

        debug!(recipient = %recipient, "message sent");
        Ok(())
    }

    /// Map a non-success response to a classified transport error.
    async fn api_error(response: Response) -> TransportError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "gateway request failed");

        match status {
            StatusCode::CONFLICT => TransportError::Conflict(body),
            StatusCode::TOO_MANY_REQUESTS => TransportError::RateLimited(body),
            StatusCode::GONE => TransportError::ConnectionClosed(body),
            _ => TransportError::Api(format!("{} - {}", status, body)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: String) -> GatewayClient {
        GatewayClient::new(base_url, Duration::from_secs(5), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_create_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "session_id": "s1",
                "registered": false
            })))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let info = client
            .create_session("12025550173", SessionOptions::default())
            .await
            .unwrap();

        assert_eq!(info.session_id, "s1");
        assert!(!info.registered);
    }

    #[tokio::test]
    async fn test_request_pairing_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/sessions/s1/pairing-code"))
            .and(body_json(serde_json::json!({"number": "12025550173"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"code": "ABCD1234"})),
            )
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let code = client
            .request_pairing_code("s1", "12025550173")
            .await
            .unwrap();

        assert_eq!(code, "ABCD1234");
    }

    #[tokio::test]
    async fn test_conflict_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/sessions/s1/pairing-code"))
            .respond_with(ResponseTemplate::new(409).set_body_string("conflict"))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let err = client
            .request_pairing_code("s1", "12025550173")
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_rate_limit_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/sessions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate-overlimit"))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let err = client
            .create_session("12025550173", SessionOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::RateLimited(_)));
    }

    #[tokio::test]
    async fn test_send_failure_maps_to_send_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/sessions/s1/messages"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let err = client
            .send_message("s1", "12025550173@s.whatsapp.net", OutgoingMessage::text("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::SendFailed(_)));
    }

    #[tokio::test]
    async fn test_poll_events() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/sessions/s1/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"type": "connecting"},
                {"type": "open"}
            ])))
            .mount(&server)
            .await;

        let client = test_client(server.uri());
        let events = client.poll_events("s1").await.unwrap();

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], GatewayEvent::Connecting));
        assert!(matches!(events[1], GatewayEvent::Open));
    }
}
