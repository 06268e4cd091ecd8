//! Notification sink trait abstraction.
//!
//! The OS notification subsystem owns the displayed alert. This crate only
//! writes to it: show (replacing whatever occupies the slot) or cancel. There
//! is no read-back, so both operations must be safe to repeat.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Stable identity of a notification. Showing into an occupied slot replaces
/// the previous alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationSlot {
    /// Channel (category) name shared by all alerts of one kind
    pub channel: &'static str,
    /// Notification id within the channel
    pub id: u32,
}

/// The slot used for pending-login alerts.
pub const PENDING_LOGINS_SLOT: NotificationSlot = NotificationSlot {
    channel: "pending-logins",
    id: 1,
};

/// A composed alert ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub body: String,
    /// Account names the alert is about, in display order.
    pub names: Vec<String>,
}

/// Notification sink errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to write alert {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode alert: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Write-only target for user-visible alerts.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Show `alert` in `slot`, replacing any alert already there.
    async fn show(&self, slot: NotificationSlot, alert: &Alert) -> Result<(), NotifyError>;

    /// Remove the alert in `slot`. Cancelling an empty slot is not an error.
    async fn cancel(&self, slot: NotificationSlot) -> Result<(), NotifyError>;
}
