//! Mock implementations and canned server replies.
//!
//! This module re-exports the mock implementations from
//! `loginwatch::adapters::mock` and builds the JSON bodies the auth server
//! would send.

pub use loginwatch::adapters::mock::http::MockResponse;
pub use loginwatch::adapters::mock::{MockHttpClient, RecordingSink, SinkCall, StaticPushToken};
pub use loginwatch::traits::{HttpError, Response};

use serde_json::{json, Value};

/// A result entry with one pending voucher.
pub fn pending(login_id: &str) -> Value {
    json!({
        "loginId": login_id,
        "pendingVouchers": [{"voucherId": "v1", "deviceDescription": "Pixel 7"}],
        "otpResetPending": false
    })
}

/// A result entry with an OTP reset in progress.
pub fn otp_reset(login_id: &str) -> Value {
    json!({"loginId": login_id, "pendingVouchers": [], "otpResetPending": true})
}

/// A result entry with nothing pending.
pub fn quiet(login_id: &str) -> Value {
    json!({"loginId": login_id, "pendingVouchers": [], "otpResetPending": false})
}

/// A successful messages reply.
pub fn auth_reply(results: &[Value]) -> MockResponse {
    MockResponse::json(200, json!({"status_code": 0, "results": results}))
}

/// A reply the server rejected at the application level.
pub fn auth_rejected(status_code: i64) -> MockResponse {
    MockResponse::json(200, json!({"status_code": status_code, "message": "bad key"}))
}

pub fn push_ok() -> MockResponse {
    MockResponse::json(200, json!({}))
}
