//! Device identifier loaded from the wallet core's client file.
//!
//! `client.json` holds a base64 `clientId` generated once at install time.
//! This crate never creates or rotates it; it only reads it and renders it in
//! Base58 for the push server.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::base58;

/// Standard alphabet, padding optional. Line breaks are stripped beforehand.
const CLIENT_ID_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors loading the device identifier.
#[derive(Debug, Error)]
pub enum DeviceIdError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid client file: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("clientId is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("clientId is empty")]
    Empty,
}

#[derive(Deserialize)]
struct ClientFile {
    #[serde(rename = "clientId")]
    client_id: String,
}

/// Stable binary identifier of this installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentifier(Vec<u8>);

impl DeviceIdentifier {
    /// Decode a base64 `clientId`, ignoring embedded whitespace.
    pub fn from_base64(encoded: &str) -> Result<Self, DeviceIdError> {
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = CLIENT_ID_ENGINE.decode(compact)?;
        if bytes.is_empty() {
            return Err(DeviceIdError::Empty);
        }
        Ok(Self(bytes))
    }

    /// Load from a `client.json` file.
    pub fn load(path: &Path) -> Result<Self, DeviceIdError> {
        let contents = std::fs::read_to_string(path).map_err(|source| DeviceIdError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ClientFile = serde_json::from_str(&contents)?;
        Self::from_base64(&file.client_id)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The form sent to the push server.
    pub fn to_base58(&self) -> String {
        base58::encode(&self.0)
    }
}
