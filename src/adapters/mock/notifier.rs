//! Recording notification sink for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{Alert, NotificationSink, NotificationSlot, NotifyError};

/// One call made against the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Show(NotificationSlot, Alert),
    Cancel(NotificationSlot),
}

/// In-memory [`NotificationSink`] that tracks the visible alert per slot and
/// records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    visible: Arc<Mutex<HashMap<NotificationSlot, Alert>>>,
    calls: Arc<Mutex<Vec<SinkCall>>>,
    fail: Arc<Mutex<bool>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `alert` already showing in `slot`.
    pub fn with_visible(slot: NotificationSlot, alert: Alert) -> Self {
        let sink = Self::new();
        sink.visible.lock().unwrap().insert(slot, alert);
        sink
    }

    /// Make every subsequent call fail with an I/O error.
    pub fn set_should_fail(&self, should_fail: bool) {
        *self.fail.lock().unwrap() = should_fail;
    }

    /// The alert currently visible in `slot`.
    pub fn visible(&self, slot: NotificationSlot) -> Option<Alert> {
        self.visible.lock().unwrap().get(&slot).cloned()
    }

    /// Number of occupied slots.
    pub fn visible_count(&self) -> usize {
        self.visible.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<(), NotifyError> {
        if *self.fail.lock().unwrap() {
            return Err(NotifyError::Io {
                path: "mock".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "sink unavailable"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn show(&self, slot: NotificationSlot, alert: &Alert) -> Result<(), NotifyError> {
        self.calls
            .lock()
            .unwrap()
            .push(SinkCall::Show(slot, alert.clone()));
        self.check_failure()?;
        self.visible.lock().unwrap().insert(slot, alert.clone());
        Ok(())
    }

    async fn cancel(&self, slot: NotificationSlot) -> Result<(), NotifyError> {
        self.calls.lock().unwrap().push(SinkCall::Cancel(slot));
        self.check_failure()?;
        self.visible.lock().unwrap().remove(&slot);
        Ok(())
    }
}
