//! Auth server client: asks which logins have pending activity.
//!
//! One POST per run carrying every login id in a single batch:
//!
//! ```text
//! -> {"loginIds": ["L1", "L2"]}
//! <- {"status_code": 0, "results": [{"loginId": "L1", "pendingVouchers": [...], "otpResetPending": false}]}
//! ```
//!
//! A non-zero `status_code` rejects the whole reply.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::{AuthServerError, TransportError};
use crate::traits::{json_headers, HttpClient};

/// Default messages endpoint.
pub const DEFAULT_AUTH_SERVER_URL: &str = "https://auth.airbitz.co/api/v2/messages";

/// What the server reported for one login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerMessage {
    pub login_id: String,
    /// Devices waiting for approval under this login
    pub pending_voucher_count: usize,
    pub otp_reset_pending: bool,
}

impl ServerMessage {
    /// Whether this message needs the user's attention.
    pub fn needs_attention(&self) -> bool {
        self.pending_voucher_count > 0 || self.otp_reset_pending
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    #[serde(rename = "loginIds")]
    login_ids: &'a [String],
}

#[derive(Deserialize)]
struct MessagesReply {
    status_code: i64,
    #[serde(default)]
    results: Option<Vec<Value>>,
}

/// Read one result entry.
///
/// Only `loginId` is mandatory. A missing or mistyped `pendingVouchers` or
/// `otpResetPending` reads as nothing pending.
fn parse_result(entry: &Value) -> Option<ServerMessage> {
    let login_id = entry.get("loginId")?.as_str()?;
    Some(ServerMessage {
        login_id: login_id.to_string(),
        pending_voucher_count: entry
            .get("pendingVouchers")
            .and_then(Value::as_array)
            .map_or(0, |v| v.len()),
        otp_reset_pending: entry
            .get("otpResetPending")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}

/// Client for the auth server messages endpoint.
#[derive(Clone)]
pub struct AuthServerClient {
    http: Arc<dyn HttpClient>,
    url: String,
    api_key: String,
}

impl std::fmt::Debug for AuthServerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServerClient")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl AuthServerClient {
    pub fn new(http: Arc<dyn HttpClient>, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the status of `login_ids`.
    ///
    /// An empty batch returns immediately without touching the network.
    pub async fn fetch_status(&self, login_ids: &[String]) -> Result<Vec<ServerMessage>, AuthServerError> {
        if login_ids.is_empty() {
            return Ok(Vec::new());
        }

        let body = serde_json::to_string(&MessagesRequest { login_ids }).map_err(|e| {
            AuthServerError::InvalidResponse {
                uri: self.url.clone(),
                message: format!("cannot encode request: {}", e),
            }
        })?;

        let mut headers = json_headers();
        headers.insert("Authorization".to_string(), format!("Token {}", self.api_key));

        let response = self
            .http
            .post(&self.url, &body, &headers)
            .await
            .map_err(|cause| TransportError::new(&self.url, cause))?;

        tracing::info!("{} {}", self.url, response.status);

        if !response.is_success() {
            return Err(TransportError::status(&self.url, response.status, &response.text_lossy()).into());
        }

        let reply: MessagesReply = response.json().map_err(|e| AuthServerError::InvalidResponse {
            uri: self.url.clone(),
            message: e.to_string(),
        })?;

        if reply.status_code != 0 {
            return Err(AuthServerError::ServerRejected {
                uri: self.url.clone(),
                status_code: reply.status_code,
            });
        }

        let results = reply.results.ok_or_else(|| AuthServerError::InvalidResponse {
            uri: self.url.clone(),
            message: "missing results".to_string(),
        })?;

        results
            .iter()
            .map(|entry| {
                parse_result(entry).ok_or_else(|| AuthServerError::InvalidResponse {
                    uri: self.url.clone(),
                    message: "result entry without a string loginId".to_string(),
                })
            })
            .collect()
    }
}
