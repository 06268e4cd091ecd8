//! Read-only scan of the local login store.
//!
//! The login store is a directory of JSON files written by the wallet core,
//! one per login. Only three fields matter here: `loginId`, `username`, and
//! the presence of `loginAuthBox`, which marks a login that finished
//! authenticating on this device. Everything else in the file is opaque.
//!
//! The scan is rebuilt from disk on every run and never cached, so there is
//! nothing to invalidate when logins are added or removed between runs.

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Field whose presence marks a fully authenticated login.
const AUTH_MARKER_FIELD: &str = "loginAuthBox";
const LOGIN_ID_FIELD: &str = "loginId";
const USERNAME_FIELD: &str = "username";

/// One authenticated login found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRecord {
    /// Opaque server-assigned identifier
    pub login_id: String,
    /// Human-readable account name
    pub username: String,
}

/// Why a login file was left out of the index.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("unreadable: {0}")]
    Unreadable(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("not a json object")]
    NotAnObject,

    #[error("login is not authenticated")]
    NotAuthenticated,

    #[error("missing or non-string field `{0}`")]
    MissingField(&'static str),
}

impl LoginRecord {
    /// Parse one login file's contents.
    pub fn parse(contents: &str) -> Result<Self, SkipReason> {
        let value: Value = serde_json::from_str(contents)?;
        let object = value.as_object().ok_or(SkipReason::NotAnObject)?;

        if !object.contains_key(AUTH_MARKER_FIELD) {
            return Err(SkipReason::NotAuthenticated);
        }

        let field = |name: &'static str| {
            object
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(SkipReason::MissingField(name))
        };

        Ok(Self {
            login_id: field(LOGIN_ID_FIELD)?,
            username: field(USERNAME_FIELD)?,
        })
    }

    /// Read and parse one login file.
    pub fn read(path: &Path) -> Result<Self, SkipReason> {
        Self::parse(&fs::read_to_string(path)?)
    }
}

/// Mapping from login id to username for the logins on this device.
///
/// Keys are unique; inserting an existing id replaces its username.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalLoginIndex {
    logins: HashMap<String, String>,
}

impl LocalLoginIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a login, returning the username it replaced, if any.
    pub fn insert(&mut self, login_id: impl Into<String>, username: impl Into<String>) -> Option<String> {
        self.logins.insert(login_id.into(), username.into())
    }

    pub fn username(&self, login_id: &str) -> Option<&str> {
        self.logins.get(login_id).map(String::as_str)
    }

    /// All login ids, sorted.
    pub fn login_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.logins.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.logins.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.logins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logins.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for LocalLoginIndex {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut index = Self::new();
        for (login_id, username) in iter {
            index.insert(login_id, username);
        }
        index
    }
}

/// Result of one directory scan.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub index: LocalLoginIndex,
    /// Files that were skipped. Diagnostic only.
    pub skipped: usize,
}

/// Enumerates the login directory.
#[derive(Debug, Clone)]
pub struct LoginStore {
    dir: PathBuf,
}

impl LoginStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Build the login index from the current directory contents.
    ///
    /// A missing or empty directory gives an empty index. Bad files are
    /// skipped and counted; none of them stops the scan.
    pub fn scan(&self) -> ScanReport {
        let mut paths: Vec<PathBuf> = match fs::read_dir(&self.dir) {
            Ok(entries) => entries.filter_map(|e| e.ok().map(|e| e.path())).collect(),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(dir = %self.dir.display(), "cannot list login store: {}", e);
                }
                return ScanReport::default();
            }
        };
        // Deterministic "last write wins" for duplicate ids.
        paths.sort();

        paths
            .iter()
            .fold(ScanReport::default(), |mut report, path| {
                match LoginRecord::read(path) {
                    Ok(record) => {
                        report.index.insert(record.login_id, record.username);
                    }
                    Err(reason) => {
                        tracing::debug!(file = %path.display(), "skipping login file: {}", reason);
                        report.skipped += 1;
                    }
                }
                report
            })
    }
}
