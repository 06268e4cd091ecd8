//! Mock implementations for testing.
//!
//! Test doubles for every trait in `crate::traits`, so the job can be
//! exercised without network access or a notification daemon.
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses
//! - [`RecordingSink`] - in-memory notification slots
//! - [`StaticPushToken`] - fixed push token

pub mod http;
pub mod notifier;
pub mod push_token;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use notifier::{RecordingSink, SinkCall};
pub use push_token::StaticPushToken;
