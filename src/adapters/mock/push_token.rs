//! Fixed push token source for testing.

use async_trait::async_trait;

use crate::traits::{PushTokenError, PushTokenSource};

/// [`PushTokenSource`] that always returns the same answer.
#[derive(Debug, Clone, Default)]
pub struct StaticPushToken {
    token: Option<String>,
}

impl StaticPushToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// A source that has no token yet.
    pub fn none() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl PushTokenSource for StaticPushToken {
    async fn current_token(&self) -> Result<Option<String>, PushTokenError> {
        Ok(self.token.clone())
    }
}
