//! One run of the pending-login check.
//!
//! ```text
//! Idle -> Running -> Succeeded
//!                 \-> Failed
//! ```
//!
//! 1. scan the login store
//! 2. no logins: clear any stale alert, done
//! 3. fetch status from the auth server (failure: stop, alert untouched)
//! 4. reconcile
//! 5. present
//! 6. refresh the push token regardless of 1-5 (never fails the run)

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::adapters::{AlertFileSink, FilePushTokenSource, ReqwestHttpClient};
use crate::api::{AuthServerClient, PushServerClient};
use crate::config::{ConfigError, WatchConfig};
use crate::error::{PushRegistrationError, RunError};
use crate::notification::NotificationPresenter;
use crate::reconcile::reconcile;
use crate::store::{DeviceIdentifier, LocalLoginIndex, LoginStore};
use crate::traits::{HttpClient, HttpError, NotificationSink, PushTokenSource};

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}

/// Why the push token was not registered, when that is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushSkip {
    /// No push server URL configured
    NotConfigured,
    /// The push SDK has not issued a token yet
    NoToken,
}

/// Result of the push token refresh.
#[derive(Debug)]
pub enum PushOutcome {
    Registered,
    Skipped(PushSkip),
    Failed(PushRegistrationError),
}

/// Summary of one run.
#[derive(Debug)]
pub struct RunReport {
    /// Always terminal
    pub state: JobState,
    /// Set when `state` is `Failed`
    pub error: Option<RunError>,
    /// Authenticated logins found on disk
    pub logins: usize,
    /// Login files skipped during the scan
    pub skipped: usize,
    /// Usernames shown in the alert; empty when failed
    pub verdict: BTreeSet<String>,
    pub push: PushOutcome,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.state == JobState::Succeeded
    }
}

/// Errors building a job from configuration.
#[derive(Debug, Error)]
pub enum JobSetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot create HTTP client: {0}")]
    Http(#[from] HttpError),
}

/// The pending-login check with all of its collaborators.
#[derive(Clone)]
pub struct PeriodicJob {
    logins: LoginStore,
    auth: AuthServerClient,
    presenter: NotificationPresenter,
    push: Option<PushServerClient>,
    tokens: Arc<dyn PushTokenSource>,
    client_file: PathBuf,
}

impl std::fmt::Debug for PeriodicJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeriodicJob")
            .field("logins", &self.logins)
            .field("auth", &self.auth)
            .field("push", &self.push)
            .field("client_file", &self.client_file)
            .finish_non_exhaustive()
    }
}

impl PeriodicJob {
    pub fn new(
        logins: LoginStore,
        auth: AuthServerClient,
        presenter: NotificationPresenter,
        push: Option<PushServerClient>,
        tokens: Arc<dyn PushTokenSource>,
        client_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            logins,
            auth,
            presenter,
            push,
            tokens,
            client_file: client_file.into(),
        }
    }

    /// Wire up the production adapters described by `config`.
    pub fn from_config(config: &WatchConfig) -> Result<Self, JobSetupError> {
        config.validate()?;
        let api_key = config.api_key()?;

        let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::with_timeout(config.request_timeout)?);
        let sink: Arc<dyn NotificationSink> = Arc::new(
            AlertFileSink::new(config.alerts_dir()?).with_desktop_banner(config.desktop_banner),
        );

        let push = config
            .push_server_url
            .as_deref()
            .map(|url| PushServerClient::new(http.clone(), url, api_key));

        Ok(Self::new(
            LoginStore::new(config.logins_dir()?),
            AuthServerClient::new(http, &config.auth_server_url, api_key),
            NotificationPresenter::new(sink),
            push,
            Arc::new(FilePushTokenSource::new(config.push_token_file()?)),
            config.client_file()?,
        ))
    }

    /// Execute one run. Always returns a report in a terminal state.
    pub async fn run(&self) -> RunReport {
        let mut state = JobState::Idle;
        advance(&mut state, JobState::Running);

        let scan = self.logins.scan();
        tracing::info!(logins = scan.index.len(), skipped = scan.skipped, "scanned login store");

        let checked = self.check_logins(&scan.index).await;
        let push = self.refresh_push_token().await;

        let (verdict, error) = match checked {
            Ok(verdict) => {
                advance(&mut state, JobState::Succeeded);
                (verdict, None)
            }
            Err(err) => {
                tracing::warn!(
                    code = err.error_code(),
                    retryable = err.is_retryable(),
                    "pending login check failed: {}",
                    err
                );
                advance(&mut state, JobState::Failed);
                (BTreeSet::new(), Some(err))
            }
        };

        RunReport {
            state,
            error,
            logins: scan.index.len(),
            skipped: scan.skipped,
            verdict,
            push,
        }
    }

    /// Steps 2-5.
    async fn check_logins(&self, index: &LocalLoginIndex) -> Result<BTreeSet<String>, RunError> {
        if index.is_empty() {
            self.presenter.present(&BTreeSet::new()).await?;
            return Ok(BTreeSet::new());
        }

        let messages = self.auth.fetch_status(&index.login_ids()).await?;
        let verdict = reconcile(index, &messages);
        tracing::info!(
            messages = messages.len(),
            flagged = verdict.len(),
            "reconciled server messages"
        );

        self.presenter.present(&verdict).await?;
        Ok(verdict)
    }

    /// Step 6.
    async fn refresh_push_token(&self) -> PushOutcome {
        let Some(client) = &self.push else {
            tracing::debug!("push server not configured, skipping token refresh");
            return PushOutcome::Skipped(PushSkip::NotConfigured);
        };

        match self.register_push_token(client).await {
            Ok(true) => PushOutcome::Registered,
            Ok(false) => {
                tracing::debug!("no push token issued yet");
                PushOutcome::Skipped(PushSkip::NoToken)
            }
            Err(err) => {
                tracing::warn!(code = err.error_code(), "push token refresh failed: {}", err);
                PushOutcome::Failed(err)
            }
        }
    }

    async fn register_push_token(&self, client: &PushServerClient) -> Result<bool, PushRegistrationError> {
        let Some(token) = self.tokens.current_token().await? else {
            return Ok(false);
        };
        let device = DeviceIdentifier::load(&self.client_file)?;
        client.register_token(&device.to_base58(), &token).await?;
        Ok(true)
    }
}

fn advance(state: &mut JobState, next: JobState) {
    tracing::debug!(from = ?state, to = ?next, "job state");
    *state = next;
}

/// Run the job once using configuration from the environment.
///
/// This is the entry point for external schedulers: no arguments, no state
/// carried between calls.
pub async fn run_once() -> Result<RunReport, JobSetupError> {
    run_with_config(&WatchConfig::from_env()?).await
}

/// Build the production job from `config` and run it once.
pub async fn run_with_config(config: &WatchConfig) -> Result<RunReport, JobSetupError> {
    let job = PeriodicJob::from_config(config)?;
    Ok(job.run().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_terminal_states() {
        assert!(!JobState::Idle.is_terminal());
        assert!(!JobState::Running.is_terminal());
        assert!(JobState::Succeeded.is_terminal());
        assert!(JobState::Failed.is_terminal());
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = WatchConfig::new().with_data_dir("/tmp/loginwatch-test");
        assert!(matches!(
            PeriodicJob::from_config(&config),
            Err(JobSetupError::Config(ConfigError::MissingApiKey))
        ));
    }

    #[test]
    fn test_from_config_push_is_optional() {
        let base = WatchConfig::new()
            .with_data_dir("/tmp/loginwatch-test")
            .with_api_key("k");

        let job = PeriodicJob::from_config(&base).unwrap();
        assert!(job.push.is_none());

        let job = PeriodicJob::from_config(&base.with_push_server_url("https://push.example.com")).unwrap();
        assert_eq!(
            job.push.as_ref().map(|p| p.endpoint()),
            Some("https://push.example.com/v2/device/")
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_run_once_reads_environment() {
        let temp = TempDir::new().unwrap();
        std::env::set_var("LOGINWATCH_DATA_DIR", temp.path());
        std::env::set_var("LOGINWATCH_API_KEY", "k");
        std::env::set_var("LOGINWATCH_AUTH_SERVER", "http://127.0.0.1:1/messages");
        std::env::remove_var("LOGINWATCH_PUSH_SERVER");

        let report = run_once().await;

        std::env::remove_var("LOGINWATCH_DATA_DIR");
        std::env::remove_var("LOGINWATCH_API_KEY");
        std::env::remove_var("LOGINWATCH_AUTH_SERVER");

        // No logins on disk: succeeds without contacting the server
        let report = report.unwrap();
        assert_eq!(report.state, JobState::Succeeded);
        assert_eq!(report.logins, 0);
        assert!(matches!(report.push, PushOutcome::Skipped(PushSkip::NotConfigured)));
    }

    #[tokio::test]
    #[serial]
    async fn test_run_once_without_api_key_fails_setup() {
        let temp = TempDir::new().unwrap();
        std::env::set_var("LOGINWATCH_DATA_DIR", temp.path());
        std::env::remove_var("LOGINWATCH_API_KEY");

        let result = run_once().await;
        std::env::remove_var("LOGINWATCH_DATA_DIR");

        assert!(matches!(
            result,
            Err(JobSetupError::Config(ConfigError::MissingApiKey))
        ));
    }
}
