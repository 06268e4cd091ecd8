//! Errors from the auth and push servers.

use thiserror::Error;

use super::network::TransportError;
use crate::store::DeviceIdError;
use crate::traits::PushTokenError;

/// Failure of one auth server status fetch. Any variant fails the run.
#[derive(Debug, Error)]
pub enum AuthServerError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The envelope carried a non-zero `status_code`.
    #[error("auth server {uri} rejected the request with status_code {status_code}")]
    ServerRejected { uri: String, status_code: i64 },

    /// A 2xx reply that is not a valid envelope.
    #[error("invalid reply from auth server {uri}: {message}")]
    InvalidResponse { uri: String, message: String },
}

impl AuthServerError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthServerError::Transport(err) => err.error_code(),
            AuthServerError::ServerRejected { .. } => "AUTH_REJECTED",
            AuthServerError::InvalidResponse { .. } => "AUTH_INVALID_RESPONSE",
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            AuthServerError::Transport(err) => err.is_retryable(),
            AuthServerError::ServerRejected { .. } | AuthServerError::InvalidResponse { .. } => true,
        }
    }
}

/// Failure to register the push token. Logged, never escalated.
#[derive(Debug, Error)]
pub enum PushRegistrationError {
    #[error("cannot load device identifier: {0}")]
    DeviceId(#[from] DeviceIdError),

    #[error("cannot look up push token: {0}")]
    Token(#[from] PushTokenError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("cannot encode registration: {0}")]
    Encode(#[from] serde_json::Error),
}

impl PushRegistrationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            PushRegistrationError::DeviceId(_) => "PUSH_DEVICE_ID",
            PushRegistrationError::Token(_) => "PUSH_TOKEN",
            PushRegistrationError::Transport(err) => err.error_code(),
            PushRegistrationError::Encode(_) => "PUSH_ENCODE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::HttpError;

    #[test]
    fn test_auth_error_codes() {
        let rejected = AuthServerError::ServerRejected {
            uri: "https://a".to_string(),
            status_code: 1,
        };
        assert_eq!(rejected.error_code(), "AUTH_REJECTED");
        assert!(rejected.to_string().contains("status_code 1"));

        let transport: AuthServerError =
            TransportError::new("https://a", HttpError::ConnectionFailed("refused".to_string()))
                .into();
        assert_eq!(transport.error_code(), "NET_CONNECT");
        assert!(transport.is_retryable());
    }

    #[test]
    fn test_push_error_from_device_id() {
        let err: PushRegistrationError = DeviceIdError::Empty.into();
        assert_eq!(err.error_code(), "PUSH_DEVICE_ID");
        assert!(err.to_string().contains("clientId is empty"));
    }
}
