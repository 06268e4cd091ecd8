//! File-backed notification slot.
//!
//! Each slot is one JSON file under the alerts directory, named after the
//! channel and id. Showing replaces the file atomically (write + rename), so
//! a reader never sees a half-written alert and re-showing never stacks.
//! Cancelling deletes the file.
//!
//! Optionally mirrors new alerts to a native banner. On macOS this goes
//! through `osascript`, which needs no bundle identifier or permissions when
//! run from a terminal. Elsewhere the banner is a no-op.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::traits::{Alert, NotificationSink, NotificationSlot, NotifyError};

/// What is persisted for an occupied slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAlert {
    pub channel: String,
    pub id: u32,
    #[serde(flatten)]
    pub alert: Alert,
    pub shown_at: DateTime<Utc>,
}

/// [`NotificationSink`] that persists the alert slot on disk.
#[derive(Debug, Clone)]
pub struct AlertFileSink {
    dir: PathBuf,
    desktop_banner: bool,
}

impl AlertFileSink {
    /// Create a sink storing slots under `dir`. The directory is created on
    /// first show.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            desktop_banner: false,
        }
    }

    /// Also raise a native banner when the alert text changes.
    pub fn with_desktop_banner(mut self, enabled: bool) -> Self {
        self.desktop_banner = enabled;
        self
    }

    /// Path of the file backing `slot`.
    pub fn slot_path(&self, slot: NotificationSlot) -> PathBuf {
        self.dir.join(format!("{}-{}.json", slot.channel, slot.id))
    }

    /// Read the alert currently in `slot`, if any.
    ///
    /// Used by the `status` command; the watcher itself never reads back.
    pub async fn read(&self, slot: NotificationSlot) -> Result<Option<StoredAlert>, NotifyError> {
        let path = self.slot_path(slot);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(serde_json::from_slice(&data)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(NotifyError::Io { path, source }),
        }
    }

    async fn write_atomic(path: &Path, data: &[u8]) -> Result<(), NotifyError> {
        let io_err = |source| NotifyError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_err)
    }
}

#[async_trait]
impl NotificationSink for AlertFileSink {
    async fn show(&self, slot: NotificationSlot, alert: &Alert) -> Result<(), NotifyError> {
        let path = self.slot_path(slot);

        // A failed read only costs a duplicate banner.
        let unchanged = matches!(self.read(slot).await, Ok(Some(ref prev)) if prev.alert == *alert);

        let stored = StoredAlert {
            channel: slot.channel.to_string(),
            id: slot.id,
            alert: alert.clone(),
            shown_at: Utc::now(),
        };
        let data = serde_json::to_vec_pretty(&stored)?;
        Self::write_atomic(&path, &data).await?;
        tracing::debug!(path = %path.display(), "alert slot written");

        if self.desktop_banner && !unchanged {
            send_banner(&alert.title, &alert.body).await;
        }
        Ok(())
    }

    async fn cancel(&self, slot: NotificationSlot) -> Result<(), NotifyError> {
        let path = self.slot_path(slot);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "alert slot cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(NotifyError::Io { path, source }),
        }
    }
}

#[cfg(target_os = "macos")]
async fn send_banner(title: &str, body: &str) {
    // Escape double quotes and backslashes for AppleScript string literals
    let escaped_title = title.replace('\\', "\\\\").replace('"', "\\\"");
    let escaped_body = body.replace('\\', "\\\\").replace('"', "\\\"");

    let script = format!(
        "display notification \"{}\" with title \"{}\" sound name \"Glass\"",
        escaped_body, escaped_title
    );

    match tokio::process::Command::new("osascript")
        .arg("-e")
        .arg(&script)
        .output()
        .await
    {
        Ok(output) if !output.status.success() => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!("osascript notification failed: {}", stderr.trim());
        }
        Err(e) => {
            tracing::warn!("Failed to spawn osascript: {}", e);
        }
        _ => {
            tracing::debug!("desktop banner sent");
        }
    }
}

#[cfg(not(target_os = "macos"))]
async fn send_banner(_title: &str, _body: &str) {
    tracing::debug!("desktop banners are not supported on this platform");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::PENDING_LOGINS_SLOT;
    use tempfile::TempDir;

    fn alert(names: &[&str]) -> Alert {
        Alert {
            title: "Security alert".to_string(),
            body: format!("names: {}", names.join(", ")),
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_show_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let sink = AlertFileSink::new(temp_dir.path().join("alerts"));

        sink.show(PENDING_LOGINS_SLOT, &alert(&["alice"])).await.unwrap();

        let stored = sink.read(PENDING_LOGINS_SLOT).await.unwrap().unwrap();
        assert_eq!(stored.channel, "pending-logins");
        assert_eq!(stored.id, 1);
        assert_eq!(stored.alert, alert(&["alice"]));
    }

    #[tokio::test]
    async fn test_show_replaces_instead_of_stacking() {
        let temp_dir = TempDir::new().unwrap();
        let sink = AlertFileSink::new(temp_dir.path());

        sink.show(PENDING_LOGINS_SLOT, &alert(&["alice"])).await.unwrap();
        sink.show(PENDING_LOGINS_SLOT, &alert(&["alice", "bob"])).await.unwrap();

        let stored = sink.read(PENDING_LOGINS_SLOT).await.unwrap().unwrap();
        assert_eq!(stored.alert.names, vec!["alice", "bob"]);

        let files: Vec<_> = std::fs::read_dir(temp_dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1, "one slot, one file, no leftover temp file");
    }

    #[tokio::test]
    async fn test_cancel_removes_alert() {
        let temp_dir = TempDir::new().unwrap();
        let sink = AlertFileSink::new(temp_dir.path());

        sink.show(PENDING_LOGINS_SLOT, &alert(&["alice"])).await.unwrap();
        sink.cancel(PENDING_LOGINS_SLOT).await.unwrap();

        assert!(sink.read(PENDING_LOGINS_SLOT).await.unwrap().is_none());
        assert!(!sink.slot_path(PENDING_LOGINS_SLOT).exists());
    }

    #[tokio::test]
    async fn test_cancel_empty_slot_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let sink = AlertFileSink::new(temp_dir.path().join("never-created"));

        sink.cancel(PENDING_LOGINS_SLOT).await.unwrap();
        sink.cancel(PENDING_LOGINS_SLOT).await.unwrap();
    }

    #[tokio::test]
    async fn test_slots_are_independent() {
        let temp_dir = TempDir::new().unwrap();
        let sink = AlertFileSink::new(temp_dir.path());
        let other = NotificationSlot {
            channel: "other",
            id: 7,
        };

        sink.show(PENDING_LOGINS_SLOT, &alert(&["alice"])).await.unwrap();
        sink.show(other, &alert(&["bob"])).await.unwrap();
        sink.cancel(other).await.unwrap();

        assert!(sink.read(PENDING_LOGINS_SLOT).await.unwrap().is_some());
        assert!(sink.read(other).await.unwrap().is_none());
    }
}
