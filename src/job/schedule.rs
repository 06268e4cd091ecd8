//! Periodic work registration.
//!
//! The host OS scheduler is abstracted behind [`Scheduler`]. Registration is
//! unique by name: enqueueing with [`ExistingWorkPolicy::Keep`] while a
//! registration exists leaves it untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// Unique name of the pending-login job.
pub const JOB_NAME: &str = "loginwatch-pending-logins";

/// How often the pending-login job runs.
pub const JOB_INTERVAL: Duration = Duration::from_secs(12 * 60 * 60);

/// A request to run work on a fixed cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicWorkRequest {
    pub unique_name: String,
    pub interval_secs: u64,
    /// Only run when a network connection is available
    pub requires_network: bool,
}

impl PeriodicWorkRequest {
    /// The 12 hour, network-constrained pending-login check.
    pub fn pending_logins() -> Self {
        Self {
            unique_name: JOB_NAME.to_string(),
            interval_secs: JOB_INTERVAL.as_secs(),
            requires_network: true,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// What to do when a registration with the same name exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistingWorkPolicy {
    Keep,
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Enqueued,
    KeptExisting,
    Replaced,
}

/// A stored registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    #[serde(flatten)]
    pub request: PeriodicWorkRequest,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("cannot access schedule at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("schedule at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Host scheduler seam.
pub trait Scheduler: Send + Sync {
    fn enqueue_unique_periodic(
        &self,
        request: &PeriodicWorkRequest,
        policy: ExistingWorkPolicy,
    ) -> Result<EnqueueOutcome, ScheduleError>;

    fn registration(&self, unique_name: &str) -> Result<Option<Registration>, ScheduleError>;
}

/// Register the pending-login job, keeping any existing registration.
///
/// Safe to call on every launch.
pub fn ensure_scheduled(scheduler: &dyn Scheduler) -> Result<EnqueueOutcome, ScheduleError> {
    let outcome =
        scheduler.enqueue_unique_periodic(&PeriodicWorkRequest::pending_logins(), ExistingWorkPolicy::Keep)?;
    tracing::info!(name = JOB_NAME, ?outcome, "periodic job registration");
    Ok(outcome)
}

fn apply(
    registrations: &mut BTreeMap<String, Registration>,
    request: &PeriodicWorkRequest,
    policy: ExistingWorkPolicy,
) -> EnqueueOutcome {
    let exists = registrations.contains_key(&request.unique_name);
    let outcome = match (exists, policy) {
        (true, ExistingWorkPolicy::Keep) => return EnqueueOutcome::KeptExisting,
        (true, ExistingWorkPolicy::Replace) => EnqueueOutcome::Replaced,
        (false, _) => EnqueueOutcome::Enqueued,
    };
    registrations.insert(
        request.unique_name.clone(),
        Registration {
            request: request.clone(),
            registered_at: Utc::now(),
        },
    );
    outcome
}

/// Registrations held in memory.
#[derive(Debug, Default)]
pub struct InMemoryScheduler {
    registrations: Mutex<BTreeMap<String, Registration>>,
}

impl InMemoryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.registrations.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Scheduler for InMemoryScheduler {
    fn enqueue_unique_periodic(
        &self,
        request: &PeriodicWorkRequest,
        policy: ExistingWorkPolicy,
    ) -> Result<EnqueueOutcome, ScheduleError> {
        let mut registrations = self.registrations.lock().unwrap_or_else(|p| p.into_inner());
        Ok(apply(&mut registrations, request, policy))
    }

    fn registration(&self, unique_name: &str) -> Result<Option<Registration>, ScheduleError> {
        let registrations = self.registrations.lock().unwrap_or_else(|p| p.into_inner());
        Ok(registrations.get(unique_name).cloned())
    }
}

/// Registrations persisted to a JSON file so they survive restarts.
#[derive(Debug)]
pub struct FileScheduleRegistry {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileScheduleRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ScheduleError {
        ScheduleError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// A missing file is an empty registry.
    fn load(&self) -> Result<BTreeMap<String, Registration>, ScheduleError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ScheduleError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, registrations: &BTreeMap<String, Registration>) -> Result<(), ScheduleError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let file = File::create(&tmp).map_err(|e| self.io_error(e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, registrations).map_err(|source| ScheduleError::Corrupt {
            path: tmp.clone(),
            source,
        })?;
        writer.flush().map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }
}

impl Scheduler for FileScheduleRegistry {
    fn enqueue_unique_periodic(
        &self,
        request: &PeriodicWorkRequest,
        policy: ExistingWorkPolicy,
    ) -> Result<EnqueueOutcome, ScheduleError> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        let mut registrations = self.load()?;
        let outcome = apply(&mut registrations, request, policy);
        if outcome != EnqueueOutcome::KeptExisting {
            self.save(&registrations)?;
        }
        Ok(outcome)
    }

    fn registration(&self, unique_name: &str) -> Result<Option<Registration>, ScheduleError> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        Ok(self.load()?.remove(unique_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_pending_logins_request() {
        let request = PeriodicWorkRequest::pending_logins();
        assert_eq!(request.unique_name, "loginwatch-pending-logins");
        assert_eq!(request.interval(), Duration::from_secs(43_200));
        assert!(request.requires_network);
    }

    #[test]
    fn test_ensure_scheduled_keeps_existing() {
        let scheduler = InMemoryScheduler::new();

        assert_eq!(ensure_scheduled(&scheduler).unwrap(), EnqueueOutcome::Enqueued);
        let first = scheduler.registration(JOB_NAME).unwrap().unwrap();

        assert_eq!(ensure_scheduled(&scheduler).unwrap(), EnqueueOutcome::KeptExisting);
        let second = scheduler.registration(JOB_NAME).unwrap().unwrap();

        assert_eq!(scheduler.len(), 1);
        assert_eq!(first.registered_at, second.registered_at);
    }

    #[test]
    fn test_replace_policy_overwrites() {
        let scheduler = InMemoryScheduler::new();
        ensure_scheduled(&scheduler).unwrap();

        let mut request = PeriodicWorkRequest::pending_logins();
        request.interval_secs = 60;
        let outcome = scheduler
            .enqueue_unique_periodic(&request, ExistingWorkPolicy::Replace)
            .unwrap();

        assert_eq!(outcome, EnqueueOutcome::Replaced);
        assert_eq!(scheduler.registration(JOB_NAME).unwrap().unwrap().request.interval_secs, 60);
    }

    #[test]
    fn test_file_registry_persists() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("schedule.json");

        let registry = FileScheduleRegistry::new(&path);
        assert!(registry.registration(JOB_NAME).unwrap().is_none());
        assert_eq!(ensure_scheduled(&registry).unwrap(), EnqueueOutcome::Enqueued);

        let reopened = FileScheduleRegistry::new(&path);
        assert_eq!(ensure_scheduled(&reopened).unwrap(), EnqueueOutcome::KeptExisting);
        let stored = reopened.registration(JOB_NAME).unwrap().unwrap();
        assert_eq!(stored.request, PeriodicWorkRequest::pending_logins());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_registry_corrupt() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("schedule.json");
        fs::write(&path, "{not json").unwrap();

        let registry = FileScheduleRegistry::new(&path);
        assert!(matches!(
            registry.registration(JOB_NAME),
            Err(ScheduleError::Corrupt { .. })
        ));
    }
}
