//! Local, read-only stores owned by the wallet core.
//!
//! - [`LoginStore`] - per-login JSON files
//! - [`DeviceIdentifier`] - installation id from `client.json`

pub mod device;
pub mod logins;

pub use device::{DeviceIdError, DeviceIdentifier};
pub use logins::{LocalLoginIndex, LoginRecord, LoginStore, ScanReport, SkipReason};
