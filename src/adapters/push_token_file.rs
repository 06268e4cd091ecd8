//! File-based push token source.
//!
//! The push SDK of the host application drops its current token into a small
//! text file in the data directory. An environment override exists for
//! headless setups and debugging.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::traits::{PushTokenError, PushTokenSource};

/// Environment variable that overrides the token file.
pub const PUSH_TOKEN_ENV: &str = "LOGINWATCH_PUSH_TOKEN";

/// [`PushTokenSource`] reading `LOGINWATCH_PUSH_TOKEN`, then a token file.
#[derive(Debug, Clone)]
pub struct FilePushTokenSource {
    path: PathBuf,
}

impl FilePushTokenSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl PushTokenSource for FilePushTokenSource {
    async fn current_token(&self) -> Result<Option<String>, PushTokenError> {
        if let Ok(token) = std::env::var(PUSH_TOKEN_ENV) {
            let token = token.trim();
            if !token.is_empty() {
                return Ok(Some(token.to_string()));
            }
        }

        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PushTokenError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
