//! Foreground runner for hosts without a system scheduler.
//!
//! Runs the job on the registered cadence until the shutdown future resolves.
//! A tick whose network constraint is unmet is deferred: the check is retried
//! every [`NETWORK_RETRY`] and the run starts as soon as it passes.

use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use super::periodic::PeriodicJob;
use super::schedule::PeriodicWorkRequest;

/// How often a deferred run re-checks the network.
pub const NETWORK_RETRY: Duration = Duration::from_secs(60);

/// Whether `url`'s host currently resolves.
pub async fn network_available(url: &str) -> bool {
    let Ok(parsed) = reqwest::Url::parse(url) else {
        return false;
    };
    let (Some(host), Some(port)) = (parsed.host_str(), parsed.port_or_known_default()) else {
        return false;
    };
    let host = host.trim_start_matches('[').trim_end_matches(']').to_string();

    let available = match tokio::net::lookup_host((host.as_str(), port)).await {
        Ok(mut addrs) => addrs.next().is_some(),
        Err(e) => {
            tracing::debug!("cannot resolve {}: {}", host, e);
            false
        }
    };
    available
}

/// Run `job` every `request.interval()` until `shutdown` completes.
///
/// The first run happens immediately. Network availability is checked by
/// resolving `check_url`'s host. Returns the number of runs executed.
pub async fn run_daemon<F>(job: &PeriodicJob, request: &PeriodicWorkRequest, check_url: &str, shutdown: F) -> usize
where
    F: Future<Output = ()>,
{
    run_daemon_with(job, request, NETWORK_RETRY, || network_available(check_url), shutdown).await
}

/// [`run_daemon`] with an injectable connectivity check.
pub async fn run_daemon_with<C, N, F>(
    job: &PeriodicJob,
    request: &PeriodicWorkRequest,
    retry: Duration,
    mut online: C,
    shutdown: F,
) -> usize
where
    C: FnMut() -> N,
    N: Future<Output = bool>,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut interval = tokio::time::interval(request.interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tracing::info!(
        name = %request.unique_name,
        interval_secs = request.interval_secs,
        "daemon started"
    );

    let mut runs = 0;
    'ticks: loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = interval.tick() => {}
        }

        if request.requires_network {
            let mut deferred = false;
            while !online().await {
                if !deferred {
                    tracing::info!(retry_secs = retry.as_secs(), "network unavailable, deferring run");
                    deferred = true;
                }
                tokio::select! {
                    biased;
                    _ = &mut shutdown => break 'ticks,
                    _ = tokio::time::sleep(retry) => {}
                }
            }
        }

        let report = job.run().await;
        runs += 1;
        tracing::info!(
            state = ?report.state,
            flagged = report.verdict.len(),
            "run {} finished",
            runs
        );
    }

    tracing::info!("daemon stopped after {} runs", runs);
    runs
}
