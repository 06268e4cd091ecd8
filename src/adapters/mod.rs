//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`AlertFileSink`] - notification slot persisted as a JSON file
//! - [`FilePushTokenSource`] - push token from env or a token file
//!
//! The [`mock`] submodule provides test doubles for all of them.

pub mod alert_file;
pub mod mock;
pub mod push_token_file;
pub mod reqwest_http;

pub use alert_file::{AlertFileSink, StoredAlert};
pub use mock::{MockHttpClient, RecordingSink, StaticPushToken};
pub use push_token_file::FilePushTokenSource;
pub use reqwest_http::ReqwestHttpClient;
