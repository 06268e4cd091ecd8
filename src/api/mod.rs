//! Clients for the two remote servers.

pub mod auth_server;
pub mod push_server;

pub use auth_server::{AuthServerClient, ServerMessage, DEFAULT_AUTH_SERVER_URL};
pub use push_server::PushServerClient;
