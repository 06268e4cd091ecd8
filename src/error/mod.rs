//! Error types for loginwatch.
//!
//! | Error | Raised by | Effect on the run |
//! |-------|-----------|-------------------|
//! | [`crate::store::SkipReason`] | login scan | absorbed, file skipped |
//! | [`TransportError`] | HTTP clients | auth: run fails; push: logged |
//! | [`AuthServerError`] | auth client | run fails, alert untouched |
//! | [`PushRegistrationError`] | push client | logged only |
//! | [`RunError`] | periodic job | terminal `Failed` state |

mod network;
mod server;

pub use network::TransportError;
pub use server::{AuthServerError, PushRegistrationError};

use thiserror::Error;

use crate::traits::NotifyError;

/// Why a run ended in `Failed`.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    AuthServer(#[from] AuthServerError),

    #[error("failed to update notification: {0}")]
    Notify(#[from] NotifyError),
}

impl RunError {
    /// Short stable code for log lines.
    pub fn error_code(&self) -> &'static str {
        match self {
            RunError::AuthServer(err) => err.error_code(),
            RunError::Notify(_) => "NOTIFY_FAILED",
        }
    }

    /// Whether the next scheduled run may succeed without intervention.
    pub fn is_retryable(&self) -> bool {
        match self {
            RunError::AuthServer(err) => err.is_retryable(),
            RunError::Notify(_) => true,
        }
    }
}
