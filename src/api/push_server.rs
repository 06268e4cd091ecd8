//! Push server client: registers this device's delivery token.
//!
//! The API key travels in the body, not in a header. The reply body is
//! ignored; a 2xx status is all that counts.

use serde::Serialize;
use std::sync::Arc;

use crate::error::{PushRegistrationError, TransportError};
use crate::traits::{json_headers, HttpClient};

const DEVICE_PATH: &str = "/v2/device/";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeviceRegistration<'a> {
    api_key: &'a str,
    device_id: &'a str,
    device_token: &'a str,
}

/// Client for the push server device endpoint.
#[derive(Clone)]
pub struct PushServerClient {
    http: Arc<dyn HttpClient>,
    endpoint: String,
    api_key: String,
}

impl std::fmt::Debug for PushServerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushServerClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl PushServerClient {
    /// `base_url` is the push server root, e.g. `https://push.example.com`.
    pub fn new(http: Arc<dyn HttpClient>, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), DEVICE_PATH),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Register `token` for the Base58 `device_id`.
    pub async fn register_token(&self, device_id: &str, token: &str) -> Result<(), PushRegistrationError> {
        let body = serde_json::to_string(&DeviceRegistration {
            api_key: &self.api_key,
            device_id,
            device_token: token,
        })?;

        let response = self
            .http
            .post(&self.endpoint, &body, &json_headers())
            .await
            .map_err(|cause| TransportError::new(&self.endpoint, cause))?;

        tracing::info!("{} {}", self.endpoint, response.status);

        if !response.is_success() {
            return Err(TransportError::status(&self.endpoint, response.status, &response.text_lossy()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use crate::traits::HttpError;
    use serde_json::json;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let mock = Arc::new(MockHttpClient::new());
        let a = PushServerClient::new(mock.clone(), "https://push.example.com/", "k");
        let b = PushServerClient::new(mock, "https://push.example.com", "k");
        assert_eq!(a.endpoint(), "https://push.example.com/v2/device/");
        assert_eq!(a.endpoint(), b.endpoint());
    }

    #[tokio::test]
    async fn test_register_sends_body_without_auth_header() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::json(200, json!({"anything": "ignored"})));
        let client = PushServerClient::new(Arc::new(mock.clone()), "https://push.example.com", "key-1");

        client.register_token("StV1DL6CwTryKyV", "fcm-token").await.unwrap();

        let requests = mock.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://push.example.com/v2/device/");
        assert_eq!(
            requests[0].json(),
            json!({"apiKey": "key-1", "deviceId": "StV1DL6CwTryKyV", "deviceToken": "fcm-token"})
        );
        assert!(!requests[0].headers.contains_key("Authorization"));
    }

    #[tokio::test]
    async fn test_response_body_is_not_parsed() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Success(crate::traits::Response::new(
            201,
            bytes::Bytes::from("not json at all"),
        )));
        let client = PushServerClient::new(Arc::new(mock), "https://push.example.com", "k");

        assert!(client.register_token("d", "t").await.is_ok());
    }

    #[tokio::test]
    async fn test_transport_errors_are_reported() {
        let mock = MockHttpClient::new();
        mock.set_default_response(MockResponse::Error(HttpError::Timeout("30s".to_string())));
        let client = PushServerClient::new(Arc::new(mock.clone()), "https://push.example.com", "k");

        let err = client.register_token("d", "t").await.unwrap_err();
        assert_eq!(err.error_code(), "NET_TIMEOUT");

        mock.set_default_response(MockResponse::json(500, json!({})));
        let err = client.register_token("d", "t").await.unwrap_err();
        assert_eq!(err.error_code(), "NET_HTTP_STATUS");
    }
}
