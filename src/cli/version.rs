//! `version` command.

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One-line version string.
pub fn version_line() -> String {
    format!("loginwatch {}", VERSION)
}
