//! The pending-login job and how it is scheduled.

pub mod daemon;
pub mod periodic;
pub mod schedule;

pub use daemon::{network_available, run_daemon, run_daemon_with, NETWORK_RETRY};
pub use periodic::{run_once, run_with_config, JobSetupError, JobState, PeriodicJob, PushOutcome, PushSkip, RunReport};
pub use schedule::{
    ensure_scheduled, EnqueueOutcome, ExistingWorkPolicy, FileScheduleRegistry, InMemoryScheduler,
    PeriodicWorkRequest, Registration, ScheduleError, Scheduler, JOB_INTERVAL, JOB_NAME,
};
