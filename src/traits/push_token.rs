//! Push token source trait abstraction.
//!
//! The push-messaging SDK owns the delivery token; this crate only asks for
//! the current value before registering it.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from looking up the push token.
#[derive(Debug, Error)]
pub enum PushTokenError {
    #[error("failed to read push token from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Provides the current push-delivery token.
#[async_trait]
pub trait PushTokenSource: Send + Sync {
    /// Returns `Ok(None)` when no token has been issued yet.
    async fn current_token(&self) -> Result<Option<String>, PushTokenError>;
}
