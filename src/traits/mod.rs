//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - JSON POST transport
//! - [`NotificationSink`] - write-only alert slot
//! - [`PushTokenSource`] - current push-delivery token

pub mod http;
pub mod notifier;
pub mod push_token;

pub use http::{json_headers, Headers, HttpClient, HttpError, Response};
pub use notifier::{Alert, NotificationSink, NotificationSlot, NotifyError, PENDING_LOGINS_SLOT};
pub use push_token::{PushTokenError, PushTokenSource};
