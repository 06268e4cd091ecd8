//! Runtime configuration.
//!
//! Everything is read from the environment so that an external scheduler can
//! start the watcher with no arguments.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `LOGINWATCH_DATA_DIR` | `~/.loginwatch` |
//! | `LOGINWATCH_AUTH_SERVER` | [`DEFAULT_AUTH_SERVER_URL`] |
//! | `LOGINWATCH_PUSH_SERVER` | unset (push refresh skipped) |
//! | `LOGINWATCH_API_KEY` | unset (required to run) |
//! | `LOGINWATCH_TIMEOUT_SECS` | 30 |
//! | `LOGINWATCH_LOG` | `info` |
//! | `LOGINWATCH_LOG_FORMAT` | `text` |
//! | `LOGINWATCH_DESKTOP_BANNER` | off |

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::adapters::reqwest_http::DEFAULT_TIMEOUT;
use crate::api::DEFAULT_AUTH_SERVER_URL;
use crate::logging::LogFormat;

/// The data directory name under the home directory.
const DATA_DIR: &str = ".loginwatch";

const LOGINS_DIR: &str = "logins";
const CLIENT_FILE: &str = "client.json";
const PUSH_TOKEN_FILE: &str = "push_token";
const ALERTS_DIR: &str = "alerts";
const SCHEDULE_FILE: &str = "schedule.json";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("LOGINWATCH_API_KEY is not set")]
    MissingApiKey,

    #[error("cannot determine home directory; set LOGINWATCH_DATA_DIR")]
    NoDataDir,

    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },
}

/// Watcher configuration.
///
/// # Example
///
/// ```ignore
/// use loginwatch::config::WatchConfig;
///
/// let config = WatchConfig::default()
///     .with_data_dir("/var/lib/wallet")
///     .with_api_key("secret");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WatchConfig {
    /// Root of the wallet core's files
    pub data_dir: Option<PathBuf>,
    /// Auth server messages endpoint
    pub auth_server_url: String,
    /// Push server root; push refresh is skipped when unset
    pub push_server_url: Option<String>,
    /// API key for both servers
    pub api_key: Option<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// tracing filter directive
    pub log_filter: String,
    pub log_format: LogFormat,
    /// Mirror alerts to a native banner
    pub desktop_banner: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::home_dir().map(|home| home.join(DATA_DIR)),
            auth_server_url: DEFAULT_AUTH_SERVER_URL.to_string(),
            push_server_url: None,
            api_key: None,
            request_timeout: DEFAULT_TIMEOUT,
            log_filter: "info".to_string(),
            log_format: LogFormat::Text,
            desktop_banner: false,
        }
    }
}

impl WatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_auth_server_url(mut self, url: impl Into<String>) -> Self {
        self.auth_server_url = url.into();
        self
    }

    pub fn with_push_server_url(mut self, url: impl Into<String>) -> Self {
        self.push_server_url = Some(url.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_desktop_banner(mut self, enabled: bool) -> Self {
        self.desktop_banner = enabled;
        self
    }

    /// Build from `LOGINWATCH_*` variables on top of the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(dir) = env_nonempty("LOGINWATCH_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = env_nonempty("LOGINWATCH_AUTH_SERVER") {
            config.auth_server_url = url;
        }
        config.push_server_url = env_nonempty("LOGINWATCH_PUSH_SERVER");
        config.api_key = env_nonempty("LOGINWATCH_API_KEY");

        if let Some(secs) = env_nonempty("LOGINWATCH_TIMEOUT_SECS") {
            let parsed = secs.parse::<u64>().ok().filter(|s| *s > 0);
            let secs = parsed.ok_or(ConfigError::InvalidValue {
                var: "LOGINWATCH_TIMEOUT_SECS",
                value: secs,
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(filter) = env_nonempty("LOGINWATCH_LOG") {
            config.log_filter = filter;
        }
        if let Some(format) = env_nonempty("LOGINWATCH_LOG_FORMAT") {
            config.log_format = format.parse().map_err(|_| ConfigError::InvalidValue {
                var: "LOGINWATCH_LOG_FORMAT",
                value: format,
            })?;
        }
        if let Some(flag) = env_nonempty("LOGINWATCH_DESKTOP_BANNER") {
            config.desktop_banner = matches!(flag.as_str(), "1" | "true" | "yes" | "on");
        }

        Ok(config)
    }

    /// Check the settings needed to contact the servers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.data_dir()?;
        self.api_key()?;
        Ok(())
    }

    pub fn data_dir(&self) -> Result<&PathBuf, ConfigError> {
        self.data_dir.as_ref().ok_or(ConfigError::NoDataDir)
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    pub fn logins_dir(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join(LOGINS_DIR))
    }

    pub fn client_file(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join(CLIENT_FILE))
    }

    pub fn push_token_file(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join(PUSH_TOKEN_FILE))
    }

    pub fn alerts_dir(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join(ALERTS_DIR))
    }

    pub fn schedule_file(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join(SCHEDULE_FILE))
    }
}

fn env_nonempty(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
