//! loginwatch - background check for pending logins from other devices
//!
//! Scans the locally stored logins, asks the auth server which of them have
//! a pending cross-device approval, and keeps a single alert naming the
//! affected accounts up to date.
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod api;
pub mod base58;
pub mod cli;
pub mod config;
pub mod error;
pub mod job;
pub mod logging;
pub mod notification;
pub mod reconcile;
pub mod store;
pub mod traits;
