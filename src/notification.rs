//! Presents the verdict as a single alert.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::traits::{Alert, NotificationSink, NotificationSlot, NotifyError, PENDING_LOGINS_SLOT};

/// Title used for every pending-login alert.
pub const ALERT_TITLE: &str = "Security alert";

/// Compose the alert for a non-empty set of usernames.
pub fn compose_alert(names: &BTreeSet<String>) -> Alert {
    let names: Vec<String> = names.iter().cloned().collect();
    let body = format!(
        "Another device is attempting to authenticate as: {}. \
         Approve or deny promptly to prevent unauthorized access.",
        names.join(", ")
    );
    Alert {
        title: ALERT_TITLE.to_string(),
        body,
        names,
    }
}

/// Keeps the pending-login slot in line with the latest verdict.
#[derive(Clone)]
pub struct NotificationPresenter {
    sink: Arc<dyn NotificationSink>,
    slot: NotificationSlot,
}

impl std::fmt::Debug for NotificationPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationPresenter")
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

impl NotificationPresenter {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            sink,
            slot: PENDING_LOGINS_SLOT,
        }
    }

    pub fn slot(&self) -> NotificationSlot {
        self.slot
    }

    /// Show an alert naming `names`, or cancel the alert when empty.
    ///
    /// Safe to call unconditionally every run.
    pub async fn present(&self, names: &BTreeSet<String>) -> Result<(), NotifyError> {
        if names.is_empty() {
            tracing::debug!("no pending logins, clearing alert");
            return self.sink.cancel(self.slot).await;
        }

        tracing::info!(accounts = names.len(), "showing pending login alert");
        self.sink.show(self.slot, &compose_alert(names)).await
    }
}
