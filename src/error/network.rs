//! Transport failures.
//!
//! Everything that can go wrong between "request built" and "2xx response
//! received" collapses into one [`TransportError`] that remembers which URI
//! was being contacted.

use thiserror::Error;

use crate::traits::HttpError;

/// A request to `uri` did not produce a successful HTTP response.
#[derive(Debug, Clone, Error)]
#[error("could not reach {uri}: {cause}")]
pub struct TransportError {
    pub uri: String,
    #[source]
    pub cause: HttpError,
}

impl TransportError {
    pub fn new(uri: impl Into<String>, cause: HttpError) -> Self {
        Self {
            uri: uri.into(),
            cause,
        }
    }

    /// Build the error for a non-2xx reply.
    pub fn status(uri: impl Into<String>, status: u16, body: &str) -> Self {
        Self::new(
            uri,
            HttpError::ServerError {
                status,
                message: body.chars().take(200).collect(),
            },
        )
    }

    pub fn is_retryable(&self) -> bool {
        self.cause.is_retryable()
    }

    pub fn error_code(&self) -> &'static str {
        match self.cause {
            HttpError::ConnectionFailed(_) => "NET_CONNECT",
            HttpError::Timeout(_) => "NET_TIMEOUT",
            HttpError::ServerError { .. } => "NET_HTTP_STATUS",
            HttpError::InvalidUrl(_) => "NET_INVALID_URL",
            HttpError::Other(_) => "NET_OTHER",
        }
    }
}
