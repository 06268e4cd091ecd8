//! Common test utilities for integration tests.
//!
//! [`WalletFixture`] lays out a throwaway data directory the way the wallet
//! core would, and [`JobHarness`] wires a `PeriodicJob` to mocks over it.
//!
//! # Example
//!
//! ```ignore
//! let harness = JobHarness::new();
//! harness.fixture.write_login("alice.json", "L1", "alice");
//! harness.http.set_response(AUTH_URL, auth_reply(&[pending("L1")]));
//! let report = harness.job().run().await;
//! ```

#![allow(dead_code, unused_imports)]

pub mod mocks;

pub use mocks::*;

use loginwatch::api::{AuthServerClient, PushServerClient};
use loginwatch::job::PeriodicJob;
use loginwatch::notification::NotificationPresenter;
use loginwatch::store::LoginStore;
use loginwatch::traits::PushTokenSource;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub const AUTH_URL: &str = "https://auth.test/api/v2/messages";
pub const PUSH_URL: &str = "https://push.test";
pub const PUSH_ENDPOINT: &str = "https://push.test/v2/device/";
pub const API_KEY: &str = "test-api-key";

/// Base64 `clientId` whose Base58 form is [`CLIENT_ID_BASE58`].
pub const CLIENT_ID_BASE64: &str = "AAECAw==";
pub const CLIENT_ID_BASE58: &str = "1Ldp";

/// A temporary wallet data directory.
pub struct WalletFixture {
    pub dir: TempDir,
}

impl WalletFixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("logins")).unwrap();
        Self { dir }
    }

    pub fn logins_dir(&self) -> PathBuf {
        self.dir.path().join("logins")
    }

    pub fn client_file(&self) -> PathBuf {
        self.dir.path().join("client.json")
    }

    /// Write an authenticated login file.
    pub fn write_login(&self, file: &str, login_id: &str, username: &str) {
        self.write_raw_login(
            file,
            &json!({
                "loginId": login_id,
                "username": username,
                "loginAuthBox": {"encryptionType": 0, "data_base64": "x", "iv_hex": "00"},
                "otpKey": "ignored"
            })
            .to_string(),
        );
    }

    /// Write a login that has not finished authenticating.
    pub fn write_unauthenticated_login(&self, file: &str, login_id: &str, username: &str) {
        self.write_raw_login(
            file,
            &json!({"loginId": login_id, "username": username}).to_string(),
        );
    }

    pub fn write_raw_login(&self, file: &str, contents: &str) {
        std::fs::write(self.logins_dir().join(file), contents).unwrap();
    }

    pub fn write_client_id(&self, client_id: &str) {
        std::fs::write(self.client_file(), json!({"clientId": client_id}).to_string()).unwrap();
    }
}

/// A job wired to mocks over a [`WalletFixture`].
pub struct JobHarness {
    pub fixture: WalletFixture,
    pub http: MockHttpClient,
    pub sink: RecordingSink,
    pub push_configured: bool,
    pub token: Arc<dyn PushTokenSource>,
}

impl JobHarness {
    pub fn new() -> Self {
        Self::with_sink(RecordingSink::new())
    }

    pub fn with_sink(sink: RecordingSink) -> Self {
        Self {
            fixture: WalletFixture::new(),
            http: MockHttpClient::new(),
            sink,
            push_configured: true,
            token: Arc::new(StaticPushToken::none()),
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Arc::new(StaticPushToken::new(token));
        self
    }

    pub fn without_push_server(mut self) -> Self {
        self.push_configured = false;
        self
    }

    pub fn job(&self) -> PeriodicJob {
        let http = Arc::new(self.http.clone());
        let push = self
            .push_configured
            .then(|| PushServerClient::new(http.clone(), PUSH_URL, API_KEY));

        PeriodicJob::new(
            LoginStore::new(self.fixture.logins_dir()),
            AuthServerClient::new(http, AUTH_URL, API_KEY),
            NotificationPresenter::new(Arc::new(self.sink.clone())),
            push,
            self.token.clone(),
            self.fixture.client_file(),
        )
    }
}
