//! `status` command: what the user currently sees and when the job runs.

use color_eyre::Result;

use crate::adapters::{AlertFileSink, StoredAlert};
use crate::config::WatchConfig;
use crate::job::{FileScheduleRegistry, Registration, Scheduler, JOB_NAME};
use crate::traits::PENDING_LOGINS_SLOT;

/// Collect and format the current status.
pub async fn status_report(config: &WatchConfig) -> Result<String> {
    let alert = AlertFileSink::new(config.alerts_dir()?)
        .read(PENDING_LOGINS_SLOT)
        .await?;
    let registration = FileScheduleRegistry::new(config.schedule_file()?).registration(JOB_NAME)?;
    Ok(format_status(alert.as_ref(), registration.as_ref()))
}

pub fn format_status(alert: Option<&StoredAlert>, registration: Option<&Registration>) -> String {
    let mut out = String::new();

    match alert {
        Some(stored) => {
            out.push_str(&format!(
                "alert: {} (since {})\n",
                stored.alert.title,
                stored.shown_at.format("%Y-%m-%d %H:%M UTC")
            ));
            out.push_str(&format!("  {}\n", stored.alert.body));
        }
        None => out.push_str("alert: none\n"),
    }

    match registration {
        Some(reg) => out.push_str(&format!(
            "schedule: {} every {}h{} (registered {})\n",
            reg.request.unique_name,
            reg.request.interval_secs / 3600,
            if reg.request.requires_network {
                ", network required"
            } else {
                ""
            },
            reg.registered_at.format("%Y-%m-%d %H:%M UTC")
        )),
        None => out.push_str("schedule: not registered\n"),
    }

    out
}
